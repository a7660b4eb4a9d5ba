//! An in-memory member service.
//!
//! Behaves like the REST service: assigns ids on insert, replaces
//! records on update and scopes queries by status. Failures can be
//! injected to exercise the error paths of the roster.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use gym_data::{
    datetime, Delete, Insert, Member, MemberFilter, MemberId, MemberPayload, Query, Result,
    RosterError, Update,
};

#[derive(Debug, Default)]
struct State {
    last_id: u64,
    members: Vec<Member>,
    failures: VecDeque<Option<RosterError>>,
    requests: Vec<String>,
}

impl State {
    /// Record the request and hand out the next injected failure
    fn request(&mut self, request: String) -> Result<()> {
        self.requests.push(request);
        match self.failures.pop_front() {
            Some(Some(err)) => Err(err),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryConnection {
    state: Mutex<State>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a service already holding some members. Members without
    /// an id get one assigned.
    pub fn with_members(members: Vec<Member>) -> Self {
        let mut state = State::default();
        for mut member in members {
            state.last_id += 1;
            if member.id == MemberId::default() {
                member.id = MemberId::from(state.last_id);
            }
            state.members.push(member);
        }
        Self {
            state: Mutex::new(state),
        }
    }

    /// Let the next request fail with the given status
    pub async fn reject_next(&self, status: u16) {
        self.state.lock().await.failures.push_back(Some(RosterError::Rejected {
            status,
            body: String::new(),
        }));
    }

    /// Let the next request fail as if the service was unreachable
    pub async fn disconnect_next(&self) {
        self.disconnect_after(0).await;
    }

    /// Let the next `passing` requests through, then fail one
    /// as if the service was unreachable
    pub async fn disconnect_after(&self, passing: usize) {
        let mut state = self.state.lock().await;
        state.failures.extend((0..passing).map(|_| None));
        state
            .failures
            .push_back(Some(RosterError::transport("connection refused")));
    }

    /// All requests received so far, as `METHOD path`
    pub async fn requests(&self) -> Vec<String> {
        self.state.lock().await.requests.clone()
    }

    /// Current content of the service
    pub async fn members(&self) -> Vec<Member> {
        self.state.lock().await.members.clone()
    }
}

fn to_member(id: MemberId, payload: MemberPayload) -> Member {
    Member {
        id,
        name: payload.name,
        email: payload.email,
        phone: payload.phone,
        membership_start: payload.membership_start,
        membership_end: payload.membership_end,
    }
}

#[async_trait]
impl Query<Member> for MemoryConnection {
    type Filter = MemberFilter;

    async fn query(&self, filter: &Self::Filter) -> Result<Vec<Member>> {
        let mut state = self.state.lock().await;
        let request = match filter.status {
            Some(status) => format!("GET /members?status={}", status.as_str()),
            None => "GET /members".to_string(),
        };
        state.request(request)?;

        let now = datetime::now();
        let members = state
            .members
            .iter()
            .filter(|member| match filter.status {
                Some(status) => member.status_at(&now) == status,
                None => true,
            })
            .cloned()
            .collect();
        Ok(members)
    }
}

#[async_trait]
impl Insert<MemberPayload> for MemoryConnection {
    async fn insert(&self, member: MemberPayload) -> Result<()> {
        let mut state = self.state.lock().await;
        state.request("POST /members".to_string())?;
        state.last_id += 1;
        let id = MemberId::from(state.last_id);
        state.members.push(to_member(id, member));
        Ok(())
    }
}

#[async_trait]
impl Update<MemberPayload> for MemoryConnection {
    type Key = MemberId;

    async fn update(&self, id: &Self::Key, member: MemberPayload) -> Result<()> {
        let mut state = self.state.lock().await;
        state.request(format!("PUT /members/{}", id))?;
        let pos = state.members.iter().position(|m| &m.id == id);
        match pos {
            Some(pos) => {
                state.members[pos] = to_member(id.clone(), member);
                Ok(())
            }
            None => Err(RosterError::Rejected {
                status: 404,
                body: "not found".to_string(),
            }),
        }
    }
}

#[async_trait]
impl Delete<Member> for MemoryConnection {
    type Key = MemberId;

    async fn delete(&self, id: &Self::Key) -> Result<()> {
        let mut state = self.state.lock().await;
        state.request(format!("DELETE /members/{}", id))?;
        let before = state.members.len();
        state.members.retain(|m| &m.id != id);
        if state.members.len() == before {
            return Err(RosterError::Rejected {
                status: 404,
                body: "not found".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, Utc};
    use gym_data::MembershipStatus;

    fn payload(name: &str, days_left: i64) -> MemberPayload {
        let now = Utc::now();
        MemberPayload {
            name: name.to_string(),
            email: format!("{}@gym.test", name.to_lowercase()),
            phone: "555-0100".to_string(),
            membership_start: now - Duration::days(365),
            membership_end: now + Duration::days(days_left),
        }
    }

    #[tokio::test]
    async fn test_memory_insert_assigns_ids() {
        let db = MemoryConnection::new();
        db.insert(payload("Alice", 10)).await.unwrap();
        db.insert(payload("Bob", 10)).await.unwrap();

        let members = db.query(&MemberFilter::default()).await.unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].id, MemberId::from(1));
        assert_eq!(members[1].id, MemberId::from(2));
    }

    #[tokio::test]
    async fn test_memory_query_status() {
        let db = MemoryConnection::new();
        db.insert(payload("Alice", -10)).await.unwrap();
        db.insert(payload("Bob", 10)).await.unwrap();

        let expired = db
            .query(&MemberFilter::status(MembershipStatus::Expired))
            .await
            .unwrap();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].name, "Alice");
    }

    #[tokio::test]
    async fn test_memory_failures() {
        let db = MemoryConnection::new();
        db.reject_next(500).await;
        db.disconnect_next().await;

        let err = db.insert(payload("Alice", 10)).await.unwrap_err();
        assert!(matches!(err, RosterError::Rejected { status: 500, .. }));
        let err = db.query(&MemberFilter::default()).await.unwrap_err();
        assert!(matches!(err, RosterError::Transport(_)));

        assert!(db.members().await.is_empty());
        assert_eq!(db.requests().await, vec!["POST /members", "GET /members"]);
    }

    #[tokio::test]
    async fn test_memory_disconnect_after() {
        let db = MemoryConnection::new();
        db.disconnect_after(1).await;

        db.insert(payload("Alice", 10)).await.unwrap();
        let err = db.query(&MemberFilter::default()).await.unwrap_err();
        assert!(matches!(err, RosterError::Transport(_)));
        assert_eq!(db.query(&MemberFilter::default()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_memory_update_and_delete() {
        let db = MemoryConnection::new();
        db.insert(payload("Alice", 10)).await.unwrap();
        let id = MemberId::from(1);

        db.update(&id, payload("Alicia", 20)).await.unwrap();
        assert_eq!(db.members().await[0].name, "Alicia");

        db.delete(&id).await.unwrap();
        assert!(db.members().await.is_empty());

        let err = db.delete(&id).await.unwrap_err();
        assert!(matches!(err, RosterError::Rejected { status: 404, .. }));
    }
}

use async_trait::async_trait;
use tracing::debug;

use gym_data::{
    Delete, Insert, Member, MemberFilter, MemberId, MemberPayload, Query, Result, RosterError,
    Update,
};

use crate::connection::{check_status, Connection};

#[async_trait]
impl Query<Member> for Connection {
    type Filter = MemberFilter;

    /// Fetch the member collection, optionally scoped by status
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<Member>> {
        let url = self.endpoint(&["members"]);
        debug!(%url, status = ?filter.status, "GET members");
        let response = self
            .client()
            .get(url)
            .query(filter)
            .send()
            .await
            .map_err(RosterError::transport)?;
        let members: Vec<Member> = check_status(response)
            .await?
            .json()
            .await
            .map_err(RosterError::transport)?;
        debug!(count = members.len(), "received members");
        Ok(members)
    }
}

#[async_trait]
impl Insert<MemberPayload> for Connection {
    /// Create member. The response body is not used,
    /// the created record arrives with the next query.
    async fn insert(&self, member: MemberPayload) -> Result<()> {
        let url = self.endpoint(&["members"]);
        debug!(%url, name = %member.name, "POST member");
        let response = self
            .client()
            .post(url)
            .json(&member)
            .send()
            .await
            .map_err(RosterError::transport)?;
        check_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl Update<MemberPayload> for Connection {
    type Key = MemberId;

    /// Replace member
    async fn update(&self, id: &Self::Key, member: MemberPayload) -> Result<()> {
        let url = self.endpoint(&["members", id.as_str()]);
        debug!(%url, "PUT member");
        let response = self
            .client()
            .put(url)
            .json(&member)
            .send()
            .await
            .map_err(RosterError::transport)?;
        check_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl Delete<Member> for Connection {
    type Key = MemberId;

    /// Delete member
    async fn delete(&self, id: &Self::Key) -> Result<()> {
        let url = self.endpoint(&["members", id.as_str()]);
        debug!(%url, "DELETE member");
        let response = self
            .client()
            .delete(url)
            .send()
            .await
            .map_err(RosterError::transport)?;
        check_status(response).await?;
        Ok(())
    }
}

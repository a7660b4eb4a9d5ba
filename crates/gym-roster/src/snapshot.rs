use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::warn;

use gym_data::{Member, MemberId};

use crate::projection::{self, Row, ViewQuery};

/// The member collection as of the last successful refresh.
///
/// A snapshot is never changed after it was built; a refresh
/// replaces it as a whole.
#[derive(Debug, Default)]
pub struct Snapshot {
    sequence: u64,
    members: Vec<Member>,
    index: HashMap<MemberId, usize>,
}

impl Snapshot {
    /// Build a snapshot in service order. Of several records
    /// sharing an id only the first one is kept.
    pub fn new(sequence: u64, members: Vec<Member>) -> Self {
        let mut index = HashMap::with_capacity(members.len());
        let mut kept = Vec::with_capacity(members.len());
        for member in members {
            if index.contains_key(&member.id) {
                warn!(id = %member.id, name = %member.name, "dropping duplicate member id");
                continue;
            }
            index.insert(member.id.clone(), kept.len());
            kept.push(member);
        }
        Self {
            sequence,
            members: kept,
            index,
        }
    }

    /// Sequence number of the refresh this snapshot came from
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.members.iter()
    }

    pub fn get(&self, id: &MemberId) -> Option<&Member> {
        self.index.get(id).map(|&pos| &self.members[pos])
    }

    pub fn contains(&self, id: &MemberId) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Rows to display for a view query
    pub fn project(&self, query: &ViewQuery, now: &DateTime<Utc>) -> Vec<Row<'_>> {
        projection::project(&self.members, query, now)
    }
}

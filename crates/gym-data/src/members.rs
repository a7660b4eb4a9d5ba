use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{datetime, MembershipStatus, Result, RosterError};

/// Opaque member identifier, assigned by the member service.
///
/// The service may send it as a number or as a string,
/// it is only ever compared and put into request paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "WireId", into = "String")]
pub struct MemberId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Signed(i64),
    Unsigned(u64),
    Text(String),
}

impl From<WireId> for MemberId {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Signed(id) => MemberId(id.to_string()),
            WireId::Unsigned(id) => MemberId(id.to_string()),
            WireId::Text(id) => MemberId(id),
        }
    }
}

impl From<MemberId> for String {
    fn from(id: MemberId) -> Self {
        id.0
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        MemberId(id.to_string())
    }
}

impl From<u64> for MemberId {
    fn from(id: u64) -> Self {
        MemberId(id.to_string())
    }
}

impl FromStr for MemberId {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(MemberId(s.trim().to_string()))
    }
}

impl MemberId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server side scope of a member query
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MembershipStatus>,
}

impl MemberFilter {
    pub fn status(status: MembershipStatus) -> Self {
        Self {
            status: Some(status),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "phone_number")]
    pub phone: String,
    #[serde(with = "datetime::instant")]
    pub membership_start: DateTime<Utc>,
    #[serde(with = "datetime::instant")]
    pub membership_end: DateTime<Utc>,
}

impl Member {
    /// Derive the membership status at a given instant
    pub fn status_at(&self, now: &DateTime<Utc>) -> MembershipStatus {
        MembershipStatus::at(&self.membership_end, now)
    }

    // Check if member is active
    pub fn is_active(&self, now: &DateTime<Utc>) -> bool {
        self.status_at(now) == MembershipStatus::Active
    }

    /// The membership does not end after it starts.
    /// The service accepts such records, so we only flag them.
    pub fn has_inverted_term(&self) -> bool {
        self.membership_end <= self.membership_start
    }
}

/// Normalized request body for creating or replacing a member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(with = "datetime::instant")]
    pub membership_start: DateTime<Utc>,
    #[serde(with = "datetime::instant")]
    pub membership_end: DateTime<Utc>,
}

impl MemberPayload {
    pub fn has_inverted_term(&self) -> bool {
        self.membership_end <= self.membership_start
    }
}

/// A member being composed or edited. All fields hold
/// the text as entered; dates are parsed on submit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub membership_start: String,
    pub membership_end: String,
}

impl From<&Member> for MemberDraft {
    fn from(member: &Member) -> Self {
        Self {
            name: member.name.clone(),
            email: member.email.clone(),
            phone: member.phone.clone(),
            membership_start: datetime::to_draft_text(&member.membership_start),
            membership_end: datetime::to_draft_text(&member.membership_end),
        }
    }
}

fn required(value: &str, field: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(RosterError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

fn required_instant(value: &str, field: &str) -> Result<DateTime<Utc>> {
    let value = required(value, field)?;
    datetime::parse_instant(&value).ok_or_else(|| {
        RosterError::Validation(format!("{} {:?} is not a date", field, value))
    })
}

impl MemberDraft {
    pub fn is_empty(&self) -> bool {
        *self == MemberDraft::default()
    }

    /// Reset all fields
    pub fn clear(&mut self) {
        *self = MemberDraft::default();
    }

    /// Check the required fields and turn the entered dates into
    /// absolute instants.
    ///
    /// A membership ending before it starts is logged, but passed on
    /// unchanged.
    pub fn normalize(&self) -> Result<MemberPayload> {
        let payload = MemberPayload {
            name: required(&self.name, "name")?,
            email: required(&self.email, "email")?,
            phone: required(&self.phone, "phone")?,
            membership_start: required_instant(&self.membership_start, "membership start")?,
            membership_end: required_instant(&self.membership_end, "membership end")?,
        };
        if payload.has_inverted_term() {
            warn!(
                name = %payload.name,
                start = %payload.membership_start,
                end = %payload.membership_end,
                "membership does not end after it starts"
            );
        }
        Ok(payload)
    }
}

/// An open edit of an existing member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTarget {
    pub id: MemberId,
    pub draft: MemberDraft,
}

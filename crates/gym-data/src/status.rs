use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ParseStatusError;

/// Membership status, derived from the end of the membership.
/// It is never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    Active,
    Expired,
}

impl MembershipStatus {
    /// A membership is expired once its end lies strictly
    /// before `now`.
    pub fn at(membership_end: &DateTime<Utc>, now: &DateTime<Utc>) -> Self {
        if membership_end < now {
            MembershipStatus::Expired
        } else {
            MembershipStatus::Active
        }
    }

    /// Wire name, as used in `?status=` queries
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::Active => "active",
            MembershipStatus::Expired => "expired",
        }
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MembershipStatus::Active => write!(f, "Active"),
            MembershipStatus::Expired => write!(f, "Expired"),
        }
    }
}

impl FromStr for MembershipStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(MembershipStatus::Active),
            "expired" => Ok(MembershipStatus::Expired),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// Status filter of the roster view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Expired,
}

impl StatusFilter {
    pub fn matches(&self, status: MembershipStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => status == MembershipStatus::Active,
            StatusFilter::Expired => status == MembershipStatus::Expired,
        }
    }

    /// The status a filter narrows to, if any
    pub fn status(&self) -> Option<MembershipStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Active => Some(MembershipStatus::Active),
            StatusFilter::Expired => Some(MembershipStatus::Expired),
        }
    }
}

impl From<Option<MembershipStatus>> for StatusFilter {
    fn from(status: Option<MembershipStatus>) -> Self {
        match status {
            None => StatusFilter::All,
            Some(MembershipStatus::Active) => StatusFilter::Active,
            Some(MembershipStatus::Expired) => StatusFilter::Expired,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Active => write!(f, "active"),
            StatusFilter::Expired => write!(f, "expired"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(StatusFilter::All),
            other => other
                .parse::<MembershipStatus>()
                .map(|status| StatusFilter::from(Some(status)))
                .map_err(|_| ParseStatusError(s.to_string())),
        }
    }
}

use thiserror::Error as ThisError;

use crate::MemberId;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Roster errors
#[derive(Debug, ThisError)]
pub enum RosterError {
    /// The service could not be reached or answered with
    /// something that is not a member document.
    #[error("transport failure: {0}")]
    Transport(#[source] BoxError),

    #[error("rejected by service with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("invalid draft: {0}")]
    Validation(String),

    #[error("not logged in")]
    Unauthenticated,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("member {0} not found")]
    NotFound(MemberId),
}

impl RosterError {
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        RosterError::Transport(err.into())
    }

    /// Failures caused by the remote service rather than
    /// by the operator.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            RosterError::Transport(_) | RosterError::Rejected { .. }
        )
    }
}

/// Parsing a status or status filter failed
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("unknown status {0:?}, expected one of: all, active, expired")]
pub struct ParseStatusError(pub String);

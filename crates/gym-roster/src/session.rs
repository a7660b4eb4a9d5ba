use gym_data::{Result, RosterError};

pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "admin123";

/// The one username and password accepted by the roster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new(DEFAULT_USERNAME, DEFAULT_PASSWORD)
    }
}

/// Authentication state of the operator. Lives as long as
/// the process, nothing is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    operator: Option<String>,
}

impl Session {
    /// Check the given username and password against the
    /// expected credentials.
    pub fn login(credentials: &Credentials, username: &str, password: &str) -> Result<Session> {
        if !credentials.matches(username, password) {
            return Err(RosterError::InvalidCredentials);
        }
        Ok(Session {
            operator: Some(username.to_string()),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.operator.is_some()
    }

    pub fn operator(&self) -> Option<&str> {
        self.operator.as_deref()
    }

    pub fn ensure_authenticated(&self) -> Result<()> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(RosterError::Unauthenticated)
        }
    }
}

use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::{Client, Response, Url};
use tracing::debug;

use gym_data::RosterError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT: u64 = 30;

/// Where the member service lives and how long to wait for it
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Service base URL (e.g. "http://localhost:8000")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ConnectionConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// A connection to the member service
#[derive(Debug, Clone)]
pub struct Connection {
    client: Client,
    base_url: Url,
}

impl Connection {
    /// Open a connection to the member service.
    /// No request is made until the first operation.
    pub fn open(config: &ConnectionConfig) -> Result<Connection> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("{} can not be used as a base url", base_url));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        debug!(%base_url, timeout = config.timeout, "opened member service connection");
        Ok(Connection { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    /// Build an endpoint url below the base url. Segments are
    /// percent encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Any status outside of 2xx is a rejection, whatever the code.
pub(crate) async fn check_status(response: Response) -> Result<Response, RosterError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RosterError::Rejected {
        status: status.as_u16(),
        body,
    })
}

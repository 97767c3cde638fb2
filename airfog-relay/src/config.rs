use std::time::Duration;

use hyper::Uri;

use crate::error::{RelayError, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Process-wide relay settings, fixed at startup and read-only after:
/// where the backend lives, the static API key that authenticates
/// every call, and how long one attempt may take.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub endpoint: Uri,
    pub api_key: String,
    pub timeout: Duration,
}

impl RelayConfig {
    pub fn new(endpoint: &str, api_key: impl Into<String>) -> Result<RelayConfig> {
        let endpoint: Uri = endpoint
            .parse()
            .map_err(|e| RelayError::InvalidEndpoint(format!("{e}: {endpoint}")))?;
        if endpoint.scheme().is_none() || endpoint.authority().is_none() {
            return Err(RelayError::InvalidEndpoint(format!(
                "endpoint must be an absolute http(s) URL: {endpoint}"
            )));
        }
        Ok(RelayConfig {
            endpoint,
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> RelayConfig {
        self.timeout = timeout;
        self
    }
}

//! Client configuration.

use std::path::PathBuf;

/// API base URL used when `SATCHEL_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Where the API lives and where local session state is kept.
///
/// All fields have defaults suitable for a locally running server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the satchel server, without the `/api/v1` prefix.
    pub api_url: String,
    /// Overall per-request deadline in seconds. `None` keeps reqwest's
    /// default behavior (connect timeout only).
    pub request_timeout_secs: Option<u64>,
    /// JSON file holding tokens and flags between runs. `None` keeps
    /// state in memory only.
    pub state_file: Option<PathBuf>,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            request_timeout_secs: None,
            state_file: None,
        }
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                  |
    /// |------------------------|--------------------------|
    /// | `SATCHEL_API_URL`      | `http://localhost:8000`  |
    /// | `SATCHEL_TIMEOUT_SECS` | (no overall deadline)    |
    /// | `SATCHEL_STATE_FILE`   | (in-memory state)        |
    pub fn from_env() -> Self {
        let api_url = std::env::var("SATCHEL_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        let request_timeout_secs = std::env::var("SATCHEL_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok());
        let state_file = std::env::var("SATCHEL_STATE_FILE").ok().map(PathBuf::from);

        Self {
            api_url,
            request_timeout_secs,
            state_file,
        }
    }

    /// Cap every request at `secs` seconds.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    /// Persist session state to the given file.
    pub fn with_state_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_file = Some(path.into());
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

//! Environment-based configuration for the CLI.
//!
//! The credential and identifiers come from the environment, matching how the
//! tool runs in CI. Validation happens before any network or filesystem
//! activity so a misconfigured run fails fast with a distinct exit code.

use std::env;
use std::fmt;

/// Environment variable holding the remote service credential.
pub const API_KEY_VAR: &str = "SUITESYNC_API_KEY";

/// Environment variable holding the remote folder identifier (pull only).
pub const FOLDER_ID_VAR: &str = "SUITESYNC_FOLDER_ID";

/// Environment variable overriding the remote service base URL.
pub const API_URL_VAR: &str = "SUITESYNC_API_URL";

const DEFAULT_API_URL: &str = "https://api.ghostinspector.com/v1";

/// Resolved run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Remote service credential, passed as a request parameter.
    pub api_key: String,
    /// Remote folder whose suites are pulled. Required for pull, unused by
    /// push.
    pub folder_id: Option<String>,
    /// Remote service base URL.
    pub api_url: String,
}

impl Config {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, MissingConfig> {
        let api_key = non_empty_var(API_KEY_VAR).ok_or(MissingConfig(API_KEY_VAR))?;
        let folder_id = non_empty_var(FOLDER_ID_VAR);
        let api_url = non_empty_var(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Ok(Self {
            api_key,
            folder_id,
            api_url,
        })
    }

    /// The folder id, or a [`MissingConfig`] error for commands that need it.
    pub fn require_folder_id(&self) -> Result<&str, MissingConfig> {
        self.folder_id
            .as_deref()
            .ok_or(MissingConfig(FOLDER_ID_VAR))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

/// A required environment variable is unset or empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingConfig(pub &'static str);

impl fmt::Display for MissingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Missing {} environment variable", self.0)
    }
}

impl std::error::Error for MissingConfig {}

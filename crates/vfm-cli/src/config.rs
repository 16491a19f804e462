//! Configuration management for the vfm CLI
//!
//! Settings come from built-in defaults, overridden by environment variables
//! (a `.env` file is loaded by the binary before this runs).

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// CLI Configuration Constants
// ============================================================================

/// Per-request timeout for uploads, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 300;

/// Pause each batch worker takes after an upload, in milliseconds.
pub const DEFAULT_UPLOAD_DELAY_MS: u64 = 500;

/// Default number of concurrent batch workers.
pub const DEFAULT_CONCURRENCY: usize = 3;

/// Audit log location relative to the per-user state directory.
pub const AUDIT_LOG_RELATIVE_PATH: &str = "vtex-files-manager/uploads.jsonl";

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Override for the CMS admin base URL (`https://{account}.vtexcommercestable.com.br`)
    pub admin_url: Option<String>,

    /// Override for the GraphQL base URL (`https://{account}.myvtex.com`)
    pub graphql_url: Option<String>,

    /// Override for the public asset base URL (`https://{account}.vtexassets.com`)
    pub assets_url: Option<String>,

    /// Directory holding the VTEX CLI `session.json` and `workspace.json`
    pub session_dir: PathBuf,

    /// Append-only upload history file
    pub audit_log_path: PathBuf,

    /// Timeout applied to every HTTP request
    #[serde(with = "duration_secs")]
    pub http_timeout: Duration,

    /// Delay each batch worker waits between uploads
    #[serde(with = "duration_millis")]
    pub upload_delay: Duration,

    #[serde(default)]
    pub verbose: bool,
}

impl Config {
    /// Create a config with default values
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::config("Could not determine home directory"))?;

        Ok(Self {
            admin_url: None,
            graphql_url: None,
            assets_url: None,
            session_dir: home.join(".vtex").join("session"),
            audit_log_path: default_audit_log_path()?,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            upload_delay: Duration::from_millis(DEFAULT_UPLOAD_DELAY_MS),
            verbose: false,
        })
    }

    /// Load config from environment variables
    ///
    /// - `VFM_ADMIN_URL`, `VFM_GRAPHQL_URL`, `VFM_ASSETS_URL`: endpoint overrides
    /// - `VFM_SESSION_DIR`: VTEX CLI session directory
    /// - `VFM_LOG_FILE`: audit log path
    /// - `VFM_HTTP_TIMEOUT_SECS`: request timeout
    /// - `VFM_UPLOAD_DELAY_MS`: per-worker delay between uploads
    pub fn from_env() -> Result<Self> {
        let mut config = Self::new()?;

        if let Ok(url) = std::env::var("VFM_ADMIN_URL") {
            config.admin_url = Some(url);
        }

        if let Ok(url) = std::env::var("VFM_GRAPHQL_URL") {
            config.graphql_url = Some(url);
        }

        if let Ok(url) = std::env::var("VFM_ASSETS_URL") {
            config.assets_url = Some(url);
        }

        if let Ok(dir) = std::env::var("VFM_SESSION_DIR") {
            config.session_dir = PathBuf::from(dir);
        }

        if let Ok(path) = std::env::var("VFM_LOG_FILE") {
            config.audit_log_path = PathBuf::from(path);
        }

        if let Ok(secs) = std::env::var("VFM_HTTP_TIMEOUT_SECS") {
            let secs = secs
                .parse()
                .map_err(|_| CliError::config(format!("Invalid VFM_HTTP_TIMEOUT_SECS: '{}'", secs)))?;
            config.http_timeout = Duration::from_secs(secs);
        }

        if let Ok(ms) = std::env::var("VFM_UPLOAD_DELAY_MS") {
            let ms = ms
                .parse()
                .map_err(|_| CliError::config(format!("Invalid VFM_UPLOAD_DELAY_MS: '{}'", ms)))?;
            config.upload_delay = Duration::from_millis(ms);
        }

        Ok(config)
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Build the shared HTTP client with the configured timeout
    pub fn http_client(&self) -> Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .timeout(self.http_timeout)
            .user_agent(concat!("vfm/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(client)
    }
}

/// Default audit log path inside the per-user state directory
///
/// Linux uses `$XDG_STATE_HOME`; platforms without a state directory fall back
/// to the local data directory.
pub fn default_audit_log_path() -> Result<PathBuf> {
    let base = dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .ok_or_else(|| CliError::config("Could not determine state directory"))?;

    Ok(base.join(AUDIT_LOG_RELATIVE_PATH))
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

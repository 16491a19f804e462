//! Error types for the vfm CLI
//!
//! Every variant carries a user-facing message with the corrective action
//! where one exists. Validation and backend errors are normally captured in a
//! per-file [`UploadResult`](crate::upload::UploadResult) instead of being
//! propagated, so one bad file never aborts a batch.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// Path does not exist
    #[error("File does not exist: '{0}'")]
    NotFound(String),

    /// Path is a directory where a file was expected
    #[error("Path is a directory, not a file: '{0}'")]
    IsDirectory(String),

    /// File exceeds the upload size ceiling
    #[error("File size ({size} bytes) exceeds maximum allowed size ({max} bytes / 5MB): '{path}'")]
    TooLarge { path: String, size: u64, max: u64 },

    /// File has no content
    #[error("File is empty: '{0}'")]
    Empty(String),

    /// Extension is outside the supported set
    #[error("Unsupported file type: '{extension}' (images: jpg, jpeg, png, gif, svg, webp, bmp; docs: pdf, txt, json, xml; web: css, js)")]
    UnsupportedType { path: String, extension: String },

    /// No usable session is available
    #[error("No VTEX session available: {0}. Please run 'vtex login' first.")]
    AuthMissing(String),

    /// The backend rejected the session token
    #[error("Authentication failed: {0}. Your VTEX session has expired, please run 'vtex login' and try again.")]
    AuthExpired(String),

    /// The backend declined this particular file
    #[error("Upload rejected: {0}")]
    UploadRejected(String),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("Network request failed: {0}. Check your internet connection.")]
    Http(#[from] reqwest::Error),

    /// JSON encoding or decoding failed
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your environment variables.")]
    Config(String),

    /// Generic anyhow error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Create an auth-missing error
    pub fn auth_missing(msg: impl Into<String>) -> Self {
        Self::AuthMissing(msg.into())
    }

    /// Create an auth-expired error
    pub fn auth_expired(msg: impl Into<String>) -> Self {
        Self::AuthExpired(msg.into())
    }

    /// Create an upload-rejected error
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::UploadRejected(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Map a non-success HTTP status to the backend error taxonomy
    ///
    /// 401 and 403 mean the session token was refused; everything else is a
    /// rejection of the specific request.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => Self::auth_expired(format!("HTTP {}", status)),
            _ => Self::rejected(format!("status {}: {}", status, body.trim())),
        }
    }

    /// Whether the error invalidates the whole invocation rather than one file
    pub fn is_session_fatal(&self) -> bool {
        matches!(self, Self::AuthMissing(_) | Self::AuthExpired(_))
    }

    /// Whether the error was raised by local validation, before any network call
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::IsDirectory(_)
                | Self::TooLarge { .. }
                | Self::Empty(_)
                | Self::UnsupportedType { .. }
        )
    }
}

//! Audit log entry types
//!
//! Field names and the one-object-per-line framing are read by external
//! tooling; keep them stable.

use crate::backend::BackendKind;
use crate::error::CliError;
use crate::session::Session;
use crate::upload::UploadTask;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome recorded for an upload attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Success,
    Failed,
}

impl UploadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Success => "success",
            UploadStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the audit log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub timestamp: DateTime<Utc>,

    /// File name as sent to the backend
    pub file: String,

    /// Local source path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Size in bytes
    pub size: u64,

    /// Backend identifier
    pub method: BackendKind,

    pub account: String,
    pub workspace: String,
    pub status: UploadStatus,

    /// Public URL, successful uploads only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Error text, failed uploads only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditLogEntry {
    fn for_task(task: &UploadTask, method: BackendKind, session: &Session, status: UploadStatus) -> Self {
        Self {
            timestamp: Utc::now(),
            file: task.name().to_string(),
            path: Some(task.path().display().to_string()),
            size: task.size(),
            method,
            account: session.account.clone(),
            workspace: session.workspace.clone(),
            status,
            url: None,
            error: None,
        }
    }

    /// Entry for a successful upload
    pub fn success(task: &UploadTask, method: BackendKind, session: &Session, url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            ..Self::for_task(task, method, session, UploadStatus::Success)
        }
    }

    /// Entry for a failed upload
    pub fn failure(task: &UploadTask, method: BackendKind, session: &Session, error: &CliError) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::for_task(task, method, session, UploadStatus::Failed)
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == UploadStatus::Success
    }
}

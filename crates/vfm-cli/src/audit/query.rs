//! Filtering and summarizing upload history

use crate::audit::types::{AuditLogEntry, UploadStatus};
use crate::backend::BackendKind;

/// Criteria for selecting history entries; `None` matches everything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogFilter {
    pub status: Option<UploadStatus>,
    pub method: Option<BackendKind>,
}

impl LogFilter {
    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        self.status.map_or(true, |s| entry.status == s)
            && self.method.map_or(true, |m| entry.method == m)
    }

    /// Keep matching entries, preserving order
    pub fn apply(&self, entries: Vec<AuditLogEntry>) -> Vec<AuditLogEntry> {
        entries.into_iter().filter(|e| self.matches(e)).collect()
    }
}

/// The last `limit` entries; a limit of 0 keeps all of them
pub fn tail(mut entries: Vec<AuditLogEntry>, limit: usize) -> Vec<AuditLogEntry> {
    if limit > 0 && entries.len() > limit {
        entries.drain(..entries.len() - limit);
    }
    entries
}

/// Counts by status and by backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogSummary {
    pub success: usize,
    pub failed: usize,
    pub cms: usize,
    pub graphql: usize,
}

impl LogSummary {
    pub fn from_entries(entries: &[AuditLogEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut summary, entry| {
            match entry.status {
                UploadStatus::Success => summary.success += 1,
                UploadStatus::Failed => summary.failed += 1,
            }
            match entry.method {
                BackendKind::Cms => summary.cms += 1,
                BackendKind::Graphql => summary.graphql += 1,
            }
            summary
        })
    }

    pub fn total(&self) -> usize {
        self.success + self.failed
    }
}

//! Upload history
//!
//! Every backend upload attempt, successful or not, is appended to a local
//! JSON-lines file. The file is a plain local record: it can be edited or
//! cleared by the user and is not tamper-evident.

pub mod logger;
pub mod query;
pub mod types;

pub use logger::{AuditLog, JsonlAuditLog};
pub use query::{tail, LogFilter, LogSummary};
pub use types::{AuditLogEntry, UploadStatus};

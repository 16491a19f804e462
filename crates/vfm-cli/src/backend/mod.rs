//! Upload backends
//!
//! Two remote protocols share one capability contract, [`UploadBackend`]:
//!
//! - [`CmsBackend`]: legacy CMS FilePicker form upload, gated by a
//!   single-use request token. Supports existence checks.
//! - [`GraphqlBackend`]: GraphQL multipart upload. Remote-generated names, no
//!   existence check.
//!
//! The scheduler and commands only ever hold an `Arc<dyn UploadBackend>`.

pub mod cms;
pub mod endpoints;
pub mod graphql;

pub use cms::CmsBackend;
pub use endpoints::Endpoints;
pub use graphql::GraphqlBackend;

use crate::audit::{AuditLog, AuditLogEntry};
use crate::error::{CliError, Result};
use crate::session::Session;
use crate::upload::{UploadResult, UploadTask};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};
use vfm_common::policy::{self, ExtensionClass};

/// Which upload protocol to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Legacy CMS FilePicker (stable `/arquivos/{name}` URLs)
    Cms,
    /// GraphQL API (`/assets/.../{generated}` URLs)
    Graphql,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Cms => "cms",
            BackendKind::Graphql => "graphql",
        }
    }

    /// Whether the remote service is known to accept this extension
    ///
    /// Informational only: local validation does not filter by backend.
    pub fn accepts_extension(&self, ext: &str) -> bool {
        match policy::classify(ext) {
            Some(ExtensionClass::Universal) => true,
            Some(ExtensionClass::Restricted) => *self == BackendKind::Cms,
            None => false,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BackendKind {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "cms" => Ok(BackendKind::Cms),
            "graphql" => Ok(BackendKind::Graphql),
            _ => Err(CliError::config(format!(
                "invalid method: {} (must be 'graphql' or 'cms')",
                s
            ))),
        }
    }
}

/// Capability shared by all upload backends
#[async_trait]
pub trait UploadBackend: Send + Sync {
    /// Identifier written to the audit log
    fn kind(&self) -> BackendKind;

    /// Upload one file
    ///
    /// Never returns an error: failures are captured in the result, and the
    /// attempt is recorded in the audit log before returning.
    async fn upload(&self, task: &UploadTask) -> UploadResult;

    /// Whether [`exists`](UploadBackend::exists) queries the remote store
    fn supports_exists(&self) -> bool {
        false
    }

    /// Whether an asset with this name already exists at the destination
    async fn exists(&self, _name: &str) -> Result<bool> {
        Ok(false)
    }
}

/// Dependencies shared by every backend instance
#[derive(Clone)]
pub struct BackendContext {
    pub session: Arc<Session>,
    pub endpoints: Endpoints,
    pub client: reqwest::Client,
    pub audit: Arc<dyn AuditLog>,
}

impl BackendContext {
    pub fn new(
        session: Arc<Session>,
        endpoints: Endpoints,
        client: reqwest::Client,
        audit: Arc<dyn AuditLog>,
    ) -> Self {
        Self {
            session,
            endpoints,
            client,
            audit,
        }
    }

    /// Turn an upload outcome into a result and record it
    ///
    /// The result is fixed before the audit write; a failed write is only
    /// logged.
    pub(crate) async fn finish(
        &self,
        kind: BackendKind,
        task: &UploadTask,
        outcome: Result<String>,
    ) -> UploadResult {
        let (entry, result) = match outcome {
            Ok(url) => (
                AuditLogEntry::success(task, kind, &self.session, &url),
                UploadResult::succeeded(task.name(), url),
            ),
            Err(err) => (
                AuditLogEntry::failure(task, kind, &self.session, &err),
                UploadResult::failed(task.name(), err),
            ),
        };

        if let Err(e) = self.audit.append(&entry).await {
            warn!(error = %e, file = task.name(), "Failed to record upload in audit log");
        }

        result
    }
}

/// Build the backend selected by `kind`
pub fn create_backend(kind: BackendKind, ctx: BackendContext) -> Arc<dyn UploadBackend> {
    match kind {
        BackendKind::Cms => Arc::new(CmsBackend::new(ctx)),
        BackendKind::Graphql => Arc::new(GraphqlBackend::new(ctx)),
    }
}

/// Read a response body, mapping non-2xx statuses to backend errors
pub(crate) async fn checked_body(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;

    debug!(status = status.as_u16(), bytes = body.len(), "Backend response");

    if !status.is_success() {
        return Err(CliError::from_status(status.as_u16(), &body));
    }

    Ok(body)
}

//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function.

pub mod batch;
pub mod logs;
pub mod upload;

use crate::audit::{AuditLog, JsonlAuditLog};
use crate::backend::{create_backend, BackendContext, BackendKind, Endpoints, UploadBackend};
use crate::config::Config;
use crate::error::Result;
use crate::session::Session;
use colored::Colorize;
use std::sync::Arc;
use tracing::debug;

/// Everything an upload command needs once the session is known good
pub(crate) struct UploadSetup {
    pub session: Arc<Session>,
    pub endpoints: Endpoints,
    pub backend: Arc<dyn UploadBackend>,
}

/// Load the session and build the selected backend
pub(crate) fn prepare_upload(config: &Config, kind: BackendKind) -> Result<UploadSetup> {
    let session = Session::load(&config.session_dir)?;
    session.validate_token()?;
    debug!(session = ?session, method = %kind, "Session loaded");

    let session = Arc::new(session);
    let endpoints = Endpoints::from_config(config, &session.account);
    let audit: Arc<dyn AuditLog> = Arc::new(JsonlAuditLog::new(config.audit_log_path.clone()));
    let ctx = BackendContext::new(
        Arc::clone(&session),
        endpoints.clone(),
        config.http_client()?,
        audit,
    );

    Ok(UploadSetup {
        session,
        endpoints,
        backend: create_backend(kind, ctx),
    })
}

/// Print the account block shared by the upload commands
pub(crate) fn print_session_header(title: &str, session: &Session, kind: BackendKind) {
    println!();
    println!("{}", format!("=== {} ===", title).cyan().bold());
    println!("Account:       {}", session.account);
    println!("Workspace:     {}", session.workspace);
    println!("User:          {}", session.login);
    println!("Method:        {}", kind);
}

/// Ask a yes/no question, defaulting to no
///
/// Anything other than an explicit yes, including a closed or non-interactive
/// stdin, counts as no.
pub(crate) fn confirm(prompt: &str) -> bool {
    match inquire::Confirm::new(prompt).with_default(false).prompt() {
        Ok(answer) => answer,
        Err(e) => {
            debug!(error = %e, "Confirmation prompt unavailable, treating as no");
            false
        }
    }
}

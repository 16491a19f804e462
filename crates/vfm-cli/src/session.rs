//! VTEX CLI session loading
//!
//! The `vtex` toolbelt keeps the current login in `~/.vtex/session/`:
//! `session.json` holds the account, login and token, `workspace.json` the
//! active workspace. This module only reads those files; logging in and token
//! refresh stay with the toolbelt.

use crate::error::{CliError, Result};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Header carrying the session token on every backend request.
pub const AUTH_HEADER: &str = "VtexIdclientAutCookie";

/// Tokens shorter than this are placeholders, not real credentials.
const MIN_TOKEN_LEN: usize = 10;

#[derive(Debug, Deserialize)]
struct SessionFile {
    #[serde(default)]
    account: String,
    #[serde(default)]
    login: String,
    #[serde(default)]
    token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkspaceFile {
    #[serde(default)]
    current_workspace: String,
}

/// Read-only credentials for one invocation
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub account: String,
    pub workspace: String,
    pub login: String,
    pub token: String,
}

impl Session {
    pub fn new(
        account: impl Into<String>,
        workspace: impl Into<String>,
        login: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            workspace: workspace.into(),
            login: login.into(),
            token: token.into(),
        }
    }

    /// Load the session from a VTEX CLI session directory
    pub fn load(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(CliError::auth_missing(format!(
                "session directory '{}' not found",
                dir.display()
            )));
        }

        let session: SessionFile = read_json(&dir.join("session.json"))?;
        let workspace: WorkspaceFile = read_json(&dir.join("workspace.json"))?;

        if session.account.is_empty() {
            return Err(CliError::auth_missing("no account found in session"));
        }
        if session.token.is_empty() {
            return Err(CliError::auth_missing("no token found in session"));
        }
        if workspace.current_workspace.is_empty() {
            return Err(CliError::auth_missing(
                "no workspace found in session, run 'vtex use <workspace>'",
            ));
        }

        Ok(Self {
            account: session.account,
            workspace: workspace.current_workspace,
            login: session.login,
            token: session.token,
        })
    }

    /// Basic sanity check on the token before any network call
    pub fn validate_token(&self) -> Result<()> {
        if self.token.is_empty() {
            return Err(CliError::auth_missing("no authentication token found"));
        }
        if self.token.len() < MIN_TOKEN_LEN {
            return Err(CliError::auth_missing(
                "authentication token appears to be invalid (too short)",
            ));
        }
        Ok(())
    }

    /// Attach the session token to a request
    pub fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header(AUTH_HEADER, &self.token)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("account", &self.account)
            .field("workspace", &self.workspace)
            .field("login", &self.login)
            .field("token", &"<redacted>")
            .finish()
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        CliError::auth_missing(format!("failed to read '{}': {}", path.display(), e))
    })?;

    serde_json::from_str(&raw).map_err(|e| {
        CliError::auth_missing(format!("failed to parse '{}': {}", path.display(), e))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_session(dir: &Path, session: &str, workspace: &str) {
        fs::write(dir.join("session.json"), session).unwrap();
        fs::write(dir.join("workspace.json"), workspace).unwrap();
    }

    #[test]
    fn test_load_session() {
        let dir = TempDir::new().unwrap();
        write_session(
            dir.path(),
            r#"{"account":"acme","login":"dev@acme.com","token":"eyJhbGciOi.token","lastAccount":"acme"}"#,
            r#"{"currentWorkspace":"master","lastWorkspace":"dev"}"#,
        );

        let session = Session::load(dir.path()).unwrap();
        assert_eq!(session.account, "acme");
        assert_eq!(session.workspace, "master");
        assert_eq!(session.login, "dev@acme.com");
        assert!(session.validate_token().is_ok());
    }

    #[test]
    fn test_missing_directory_is_auth_missing() {
        let dir = TempDir::new().unwrap();
        let err = Session::load(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, CliError::AuthMissing(_)));
    }

    #[test]
    fn test_missing_fields_are_auth_missing() {
        let dir = TempDir::new().unwrap();
        write_session(dir.path(), r#"{"account":"acme"}"#, r#"{"currentWorkspace":"master"}"#);
        assert!(matches!(Session::load(dir.path()), Err(CliError::AuthMissing(_))));

        write_session(dir.path(), r#"{"account":"acme","token":"0123456789abc"}"#, r#"{}"#);
        assert!(matches!(Session::load(dir.path()), Err(CliError::AuthMissing(_))));
    }

    #[test]
    fn test_short_token_rejected() {
        let session = Session::new("acme", "master", "dev", "short");
        assert!(matches!(session.validate_token(), Err(CliError::AuthMissing(_))));
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::new("acme", "master", "dev", "super-secret-token");
        let debug = format!("{:?}", session);
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains("acme"));
    }
}

//! Upload task and result types

use crate::error::{CliError, Result};
use crate::upload::validate::validate_file;
use std::path::{Path, PathBuf};
use vfm_common::policy;

/// One file destined for upload
///
/// Built once by discovery or the single-file command and consumed by the
/// scheduler; fields are private so a task cannot change after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTask {
    path: PathBuf,
    name: String,
    size: u64,
    extension: String,
}

impl UploadTask {
    /// Describe the file at `path`
    ///
    /// Never fails: a missing file yields a task with size 0, and the problem
    /// is reported when the task is validated.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        let extension = policy::extension_of(&path).unwrap_or_default();

        Self {
            path,
            name,
            size,
            extension,
        }
    }

    /// Absolute path of the source file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name shown to the user and sent to the backend
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size in bytes at the time the task was created
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Lower-cased extension without the dot, empty when there is none
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Run the local upload policy against the file as it is now
    pub fn validate(&self) -> Result<()> {
        validate_file(&self.path)
    }
}

/// Outcome of one upload task
#[derive(Debug)]
pub struct UploadResult {
    file_name: String,
    url: Option<String>,
    error: Option<CliError>,
}

impl UploadResult {
    pub fn succeeded(file_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            url: Some(url.into()),
            error: None,
        }
    }

    pub fn failed(file_name: impl Into<String>, error: CliError) -> Self {
        Self {
            file_name: file_name.into(),
            url: None,
            error: Some(error),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Public URL of the uploaded asset, present iff the upload succeeded
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn error(&self) -> Option<&CliError> {
        self.error.as_ref()
    }

    /// Convert into a `Result`, for callers handling a single file
    pub fn into_result(self) -> Result<String> {
        match (self.url, self.error) {
            (_, Some(err)) => Err(err),
            (Some(url), None) => Ok(url),
            (None, None) => Err(CliError::rejected("upload returned no URL")),
        }
    }
}

//! Candidate file discovery
//!
//! Walks a directory and yields files whose lower-cased extension is in the
//! supported set. Results keep the directory enumeration order.

use crate::error::Result;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use vfm_common::policy;
use walkdir::WalkDir;

/// Find uploadable files under `root`
///
/// Non-recursive mode only looks at direct children. Directories and files
/// with unsupported extensions are skipped silently. Fails if `root` (or, in
/// recursive mode, any directory below it) cannot be read.
pub fn discover_files(root: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(root)?;
    if !metadata.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{}' is not a directory", root.display()),
        )
        .into());
    }

    let mut walker = WalkDir::new(root).min_depth(1);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(io::Error::from)?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        if policy::is_supported_path(path) {
            files.push(path.to_path_buf());
        } else {
            debug!(path = %path.display(), "Skipping unsupported file");
        }
    }

    debug!(root = %root.display(), recursive, found = files.len(), "Discovery finished");
    Ok(files)
}

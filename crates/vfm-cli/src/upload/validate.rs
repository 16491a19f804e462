//! Local upload policy checks
//!
//! Runs before any network call. Only size, existence and the known
//! extension set are enforced here; whether a backend accepts a given format
//! is discovered remotely.

use crate::error::{CliError, Result};
use std::io::ErrorKind;
use std::path::Path;
use vfm_common::policy::{self, MAX_FILE_SIZE};

/// Check `path` against the upload policy
///
/// Checks run in a fixed order: existence, directory, size ceiling, empty
/// file, extension.
pub fn validate_file(path: &Path) -> Result<()> {
    let display = path.display().to_string();

    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(CliError::NotFound(display)),
        Err(e) => return Err(CliError::Io(e)),
    };

    if metadata.is_dir() {
        return Err(CliError::IsDirectory(display));
    }

    let size = metadata.len();
    if size > MAX_FILE_SIZE {
        return Err(CliError::TooLarge {
            path: display,
            size,
            max: MAX_FILE_SIZE,
        });
    }

    if size == 0 {
        return Err(CliError::Empty(display));
    }

    match policy::extension_of(path) {
        Some(ext) if policy::is_supported(&ext) => Ok(()),
        ext => Err(CliError::UnsupportedType {
            path: display,
            extension: ext.map(|e| format!(".{}", e)).unwrap_or_default(),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn file_of_size(dir: &TempDir, name: &str, size: u64) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let file = fs::File::create(&path).unwrap();
        file.set_len(size).unwrap();
        path
    }

    #[test]
    fn test_accepts_supported_file() {
        let dir = TempDir::new().unwrap();
        assert!(validate_file(&file_of_size(&dir, "logo.png", 10 * 1024)).is_ok());
        assert!(validate_file(&file_of_size(&dir, "styles.CSS", 12)).is_ok());
    }

    #[test]
    fn test_accepts_extension_only_name() {
        let dir = TempDir::new().unwrap();
        assert!(validate_file(&file_of_size(&dir, ".png", 64)).is_ok());

        let err = validate_file(&file_of_size(&dir, ".env", 64)).unwrap_err();
        assert!(matches!(err, CliError::UnsupportedType { ref extension, .. } if extension == ".env"));
    }

    #[test]
    fn test_not_found() {
        let dir = TempDir::new().unwrap();
        let err = validate_file(&dir.path().join("ghost.png")).unwrap_err();
        assert!(matches!(err, CliError::NotFound(_)));
    }

    #[test]
    fn test_directory() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("images.png");
        fs::create_dir(&sub).unwrap();
        assert!(matches!(validate_file(&sub), Err(CliError::IsDirectory(_))));
    }

    #[test]
    fn test_size_boundaries() {
        let dir = TempDir::new().unwrap();

        let at_limit = file_of_size(&dir, "exact.jpg", MAX_FILE_SIZE);
        assert!(validate_file(&at_limit).is_ok());

        let over = file_of_size(&dir, "over.jpg", MAX_FILE_SIZE + 1);
        match validate_file(&over) {
            Err(CliError::TooLarge { size, max, .. }) => {
                assert_eq!(size, MAX_FILE_SIZE + 1);
                assert_eq!(max, MAX_FILE_SIZE);
            }
            other => panic!("expected TooLarge, got {other:?}"),
        }

        let empty = file_of_size(&dir, "empty.jpg", 0);
        assert!(matches!(validate_file(&empty), Err(CliError::Empty(_))));
    }

    #[test]
    fn test_unsupported_type() {
        let dir = TempDir::new().unwrap();

        match validate_file(&file_of_size(&dir, "movie.MP4", 100)) {
            Err(CliError::UnsupportedType { extension, .. }) => assert_eq!(extension, ".mp4"),
            other => panic!("expected UnsupportedType, got {other:?}"),
        }

        let no_ext = file_of_size(&dir, "Makefile", 100);
        assert!(matches!(validate_file(&no_ext), Err(CliError::UnsupportedType { .. })));
    }

    #[test]
    fn test_too_large_checked_before_extension() {
        let dir = TempDir::new().unwrap();
        let path = file_of_size(&dir, "huge.exe", MAX_FILE_SIZE * 2);
        assert!(matches!(validate_file(&path), Err(CliError::TooLarge { .. })));
    }
}

//! Pre-flight existence gate
//!
//! Before a destructive upload the caller asks the backend which names are
//! already taken, so the user can decline an overwrite. Backends without an
//! existence check skip the gate entirely.

use crate::backend::UploadBackend;
use crate::upload::task::UploadTask;
use tracing::{debug, warn};

/// Outcome of the existence gate for a set of tasks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreflightReport {
    /// Whether the backend was able to run the check at all
    pub checked: bool,
    /// Names that already exist at the destination, in task order
    pub existing: Vec<String>,
    /// Names whose check failed and were treated as absent
    pub unchecked: Vec<String>,
}

impl PreflightReport {
    pub fn has_conflicts(&self) -> bool {
        !self.existing.is_empty()
    }
}

/// Ask `backend` which task names already exist
///
/// Checks run one at a time, before any upload starts. A failed check is
/// logged and counted as "does not exist".
pub async fn check_existing(backend: &dyn UploadBackend, tasks: &[UploadTask]) -> PreflightReport {
    if !backend.supports_exists() {
        debug!(backend = %backend.kind(), "Backend has no existence check, skipping pre-flight");
        return PreflightReport::default();
    }

    let mut report = PreflightReport {
        checked: true,
        ..PreflightReport::default()
    };

    for task in tasks {
        match backend.exists(task.name()).await {
            Ok(true) => report.existing.push(task.name().to_string()),
            Ok(false) => {}
            Err(e) => {
                warn!(file = task.name(), error = %e, "Existence check failed, assuming file is new");
                report.unchecked.push(task.name().to_string());
            }
        }
    }

    debug!(
        checked = tasks.len(),
        existing = report.existing.len(),
        unchecked = report.unchecked.len(),
        "Pre-flight complete"
    );

    report
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::backend::BackendKind;
    use crate::error::{CliError, Result};
    use crate::upload::UploadResult;
    use async_trait::async_trait;
    use std::collections::HashSet;

    struct StubBackend {
        supports: bool,
        taken: HashSet<&'static str>,
        broken: HashSet<&'static str>,
    }

    #[async_trait]
    impl UploadBackend for StubBackend {
        fn kind(&self) -> BackendKind {
            BackendKind::Cms
        }

        async fn upload(&self, task: &UploadTask) -> UploadResult {
            UploadResult::failed(task.name(), CliError::rejected("uploads are not expected here"))
        }

        fn supports_exists(&self) -> bool {
            self.supports
        }

        async fn exists(&self, name: &str) -> Result<bool> {
            if self.broken.contains(name) {
                return Err(CliError::rejected("HTTP 502"));
            }
            Ok(self.taken.contains(name))
        }
    }

    fn tasks(names: &[&str]) -> Vec<UploadTask> {
        names.iter().map(|n| UploadTask::from_path(n)).collect()
    }

    #[tokio::test]
    async fn test_reports_existing_names_in_order() {
        let backend = StubBackend {
            supports: true,
            taken: ["c.png", "a.png"].into_iter().collect(),
            broken: HashSet::new(),
        };

        let report = check_existing(&backend, &tasks(&["a.png", "b.png", "c.png"])).await;
        assert!(report.checked);
        assert!(report.has_conflicts());
        assert_eq!(report.existing, vec!["a.png", "c.png"]);
        assert!(report.unchecked.is_empty());
    }

    #[tokio::test]
    async fn test_failed_check_degrades_to_absent() {
        let backend = StubBackend {
            supports: true,
            taken: HashSet::new(),
            broken: ["b.png"].into_iter().collect(),
        };

        let report = check_existing(&backend, &tasks(&["a.png", "b.png"])).await;
        assert!(!report.has_conflicts());
        assert_eq!(report.unchecked, vec!["b.png"]);
    }

    #[tokio::test]
    async fn test_skipped_without_exists_support() {
        let backend = StubBackend {
            supports: false,
            taken: ["a.png"].into_iter().collect(),
            broken: HashSet::new(),
        };

        let report = check_existing(&backend, &tasks(&["a.png"])).await;
        assert_eq!(report, PreflightReport::default());
    }
}

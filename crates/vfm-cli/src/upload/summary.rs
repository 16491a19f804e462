//! Batch outcome tally

use crate::error::CliError;
use crate::upload::task::UploadResult;

/// Totals for a finished batch plus the error text of each failure
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Failures rejected by local validation, without reaching a backend
    pub skipped: usize,
    /// `(file name, error text)` for every failed task
    pub failures: Vec<(String, String)>,
}

impl BatchSummary {
    pub fn from_results(results: &[UploadResult]) -> Self {
        let failures: Vec<(String, String)> = results
            .iter()
            .filter_map(|r| {
                r.error()
                    .map(|e| (r.file_name().to_string(), e.to_string()))
            })
            .collect();
        let skipped = results
            .iter()
            .filter(|r| r.error().is_some_and(CliError::is_validation))
            .count();

        Self {
            total: results.len(),
            succeeded: results.len() - failures.len(),
            failed: failures.len(),
            skipped,
            failures,
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

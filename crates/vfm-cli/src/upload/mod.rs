//! Local side of uploading: finding files, checking them against the upload
//! policy, and driving a backend over a batch.

pub mod discovery;
pub mod preflight;
pub mod scheduler;
pub mod summary;
pub mod task;
pub mod validate;

pub use discovery::discover_files;
pub use preflight::{check_existing, PreflightReport};
pub use scheduler::{run_batch, BatchObserver, NoopObserver, SchedulerConfig};
pub use summary::BatchSummary;
pub use task::{UploadResult, UploadTask};
pub use validate::validate_file;

//! VFM Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared building blocks for the vfm workspace members:
//!
//! - **Logging**: tracing subscriber setup shared by binaries
//! - **Policy**: upload size limit, supported extensions and MIME table

pub mod logging;
pub mod policy;

pub use policy::{ExtensionClass, MAX_FILE_SIZE};

//! VFM CLI Library
//!
//! Command-line tool for uploading files to a VTEX account's asset storage.
//!
//! # Overview
//!
//! - **Single upload**: validate, preview the destination and upload one file (`vfm upload`)
//! - **Batch upload**: upload a directory with a bounded worker pool (`vfm batch`)
//! - **History**: inspect or clear the local upload log (`vfm logs`)
//!
//! Two backends are available: the legacy CMS FilePicker (`cms`), which keeps
//! the file name and can detect overwrites, and the GraphQL API (`graphql`),
//! which generates the asset name remotely.

pub mod audit;
pub mod backend;
pub mod commands;
pub mod config;
pub mod error;
pub mod progress;
pub mod session;
pub mod upload;

// Re-export commonly used types
pub use backend::{BackendKind, UploadBackend};
pub use config::Config;
pub use error::{CliError, Result};
pub use session::Session;

use audit::UploadStatus;
use clap::{Parser, Subcommand};
use config::DEFAULT_CONCURRENCY;
use std::path::PathBuf;

/// VFM - VTEX Files Manager
#[derive(Parser, Debug)]
#[command(name = "vfm")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload a single file
    Upload {
        /// File to upload
        file: PathBuf,

        /// Upload method
        #[arg(short, long, value_enum)]
        method: BackendKind,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Upload every supported file in a directory
    Batch {
        /// Directory to scan
        directory: PathBuf,

        /// Upload method
        #[arg(short, long, value_enum)]
        method: BackendKind,

        /// Number of concurrent uploads
        #[arg(short = 'c', long = "concurrent", default_value_t = DEFAULT_CONCURRENCY)]
        concurrent: usize,

        /// Include subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show or clear the upload history
    Logs {
        /// Maximum number of entries to show (0 shows all)
        #[arg(short, long, default_value = "50")]
        limit: usize,

        /// Only show entries with this status
        #[arg(short, long, value_enum)]
        status: Option<UploadStatus>,

        /// Only show entries uploaded with this method
        #[arg(short, long, value_enum)]
        method: Option<BackendKind>,

        /// Delete all entries (asks for confirmation)
        #[arg(short, long)]
        clear: bool,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_batch() {
        let cli = Cli::try_parse_from(["vfm", "batch", "./images", "-m", "cms", "-c", "5", "-r"]).unwrap();
        match cli.command {
            Commands::Batch {
                directory,
                method,
                concurrent,
                recursive,
                yes,
            } => {
                assert_eq!(directory, PathBuf::from("./images"));
                assert_eq!(method, BackendKind::Cms);
                assert_eq!(concurrent, 5);
                assert!(recursive);
                assert!(!yes);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_logs_defaults() {
        let cli = Cli::try_parse_from(["vfm", "logs", "-s", "failed"]).unwrap();
        match cli.command {
            Commands::Logs {
                limit,
                status,
                method,
                clear,
                ..
            } => {
                assert_eq!(limit, 50);
                assert_eq!(status, Some(UploadStatus::Failed));
                assert_eq!(method, None);
                assert!(!clear);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_method_is_required() {
        assert!(Cli::try_parse_from(["vfm", "upload", "logo.png"]).is_err());
        assert!(Cli::try_parse_from(["vfm", "upload", "logo.png", "-m", "s3"]).is_err());
    }
}

//! `vfm upload` command implementation
//!
//! Uploads a single file after showing where it will land and, for the CMS
//! backend, whether it would overwrite an existing asset.

use crate::backend::BackendKind;
use crate::commands::{confirm, prepare_upload, print_session_header};
use crate::config::Config;
use crate::error::Result;
use crate::progress::{create_spinner, format_bytes};
use crate::upload::{check_existing, validate_file, UploadTask};
use colored::Colorize;
use std::path::Path;
use tracing::info;

/// Upload one file
pub async fn run(config: &Config, file: &Path, method: BackendKind, yes: bool) -> Result<()> {
    let setup = prepare_upload(config, method)?;

    validate_file(file)?;
    let task = UploadTask::from_path(file);

    let destination = match method {
        BackendKind::Cms => setup.endpoints.arquivos_url(task.name()),
        BackendKind::Graphql => setup.endpoints.generated_asset_placeholder(),
    };

    let preflight = check_existing(setup.backend.as_ref(), std::slice::from_ref(&task)).await;
    if config.is_verbose() {
        for name in &preflight.unchecked {
            println!("{}", format!("Warning: could not check if {} exists", name).yellow());
        }
    }

    print_session_header("VTEX File Upload", &setup.session, method);
    println!("File:          {} ({})", task.name(), format_bytes(task.size()));
    println!("Destination:   {}", destination);

    if !method.accepts_extension(task.extension()) {
        println!();
        println!(
            "{}",
            format!(
                "⚠  .{} files are usually rejected by the {} backend; consider '--method cms'",
                task.extension(),
                method
            )
            .yellow()
        );
    }

    if preflight.has_conflicts() {
        println!();
        println!("{}", "⚠  WARNING: File already exists and will be OVERWRITTEN!".yellow());
    }
    println!();

    if !yes {
        let prompt = if preflight.has_conflicts() {
            "File exists. Overwrite?"
        } else {
            "Proceed with upload?"
        };
        if !confirm(prompt) {
            println!("{}", "Upload cancelled.".yellow());
            return Ok(());
        }
        println!();
    }

    let spinner = create_spinner(&format!("Uploading {}...", task.name()));
    let result = setup.backend.upload(&task).await;
    spinner.finish_and_clear();

    match result.into_result() {
        Ok(url) => {
            info!(file = task.name(), url = %url, "Upload complete");
            println!("{}", "✓ Upload successful!".green().bold());
            println!("File URL: {}", url);
            println!();
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "✗ Upload failed:".red().bold(), e);
            Err(e)
        }
    }
}

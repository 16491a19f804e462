//! `vfm batch` command implementation
//!
//! Uploads every supported file in a directory through the worker pool.

use crate::backend::BackendKind;
use crate::commands::{confirm, prepare_upload, print_session_header};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::progress::{create_batch_progress, format_bytes};
use crate::upload::{
    check_existing, discover_files, run_batch, BatchObserver, BatchSummary, SchedulerConfig,
    UploadResult, UploadTask,
};
use colored::Colorize;
use indicatif::ProgressBar;
use std::path::Path;
use std::sync::Arc;

/// Files listed before the rest are collapsed
const FILE_DISPLAY_LIMIT: usize = 10;

/// Existing files listed in the overwrite warning
const EXISTING_DISPLAY_LIMIT: usize = 5;

/// Prints per-file lines above a shared progress bar
struct ConsoleObserver {
    bar: ProgressBar,
}

impl ConsoleObserver {
    // A hidden bar swallows println, so fall back to stdout off a terminal.
    fn line(&self, msg: String) {
        if self.bar.is_hidden() {
            println!("{}", msg);
        } else {
            self.bar.println(msg);
        }
    }
}

impl BatchObserver for ConsoleObserver {
    fn on_start(&self, worker_id: usize, task: &UploadTask) {
        self.line(format!("[Worker {}] Uploading: {}", worker_id, task.name()));
    }

    fn on_finish(&self, _worker_id: usize, result: &UploadResult) {
        match (result.url(), result.error()) {
            (_, Some(err)) => {
                self.line(format!("  {} {}: {}", "✗ Failed".red(), result.file_name(), err))
            }
            (Some(url), None) => self.line(format!("  {} {}", "✓ Success:".green(), url)),
            (None, None) => {}
        }
        self.bar.inc(1);
    }
}

/// Upload a directory of files
pub async fn run(
    config: &Config,
    directory: &Path,
    method: BackendKind,
    concurrency: usize,
    recursive: bool,
    yes: bool,
) -> Result<()> {
    let scheduler = SchedulerConfig::new(concurrency, config.upload_delay);
    if scheduler.workers == 0 {
        return Err(CliError::config("--concurrent must be at least 1"));
    }

    let setup = prepare_upload(config, method)?;

    let files = discover_files(directory, recursive)?;
    if files.is_empty() {
        println!(
            "{}",
            format!("No supported files found in {}", directory.display()).yellow()
        );
        return Ok(());
    }

    let tasks: Vec<UploadTask> = files.iter().map(UploadTask::from_path).collect();
    let total_size: u64 = tasks.iter().map(UploadTask::size).sum();

    let preflight = check_existing(setup.backend.as_ref(), &tasks).await;
    if config.is_verbose() {
        for name in &preflight.unchecked {
            println!("{}", format!("Warning: could not check if {} exists", name).yellow());
        }
    }

    print_session_header("VTEX Batch Upload", &setup.session, method);
    println!("Directory:     {}", directory.display());
    println!(
        "Files found:   {} ({} total)",
        tasks.len(),
        format_bytes(total_size)
    );
    println!("Concurrency:   {} workers", scheduler.workers);
    println!();

    println!("Files to upload:");
    for (i, task) in tasks.iter().take(FILE_DISPLAY_LIMIT).enumerate() {
        println!("  {}. {} ({})", i + 1, task.name(), format_bytes(task.size()));
    }
    if tasks.len() > FILE_DISPLAY_LIMIT {
        println!("  ... ({} more)", tasks.len() - FILE_DISPLAY_LIMIT);
    }
    println!();

    let rejected_here: Vec<&str> = tasks
        .iter()
        .filter(|t| !method.accepts_extension(t.extension()))
        .map(UploadTask::name)
        .collect();
    if !rejected_here.is_empty() {
        println!(
            "{}",
            format!(
                "⚠  {} file(s) have types the {} backend usually rejects; consider '--method cms'",
                rejected_here.len(),
                method
            )
            .yellow()
        );
        println!();
    }

    if preflight.has_conflicts() {
        println!(
            "{}",
            format!(
                "⚠  WARNING: {} file(s) already exist and will be OVERWRITTEN:",
                preflight.existing.len()
            )
            .yellow()
        );
        for name in preflight.existing.iter().take(EXISTING_DISPLAY_LIMIT) {
            println!("  • {}", name);
        }
        if preflight.existing.len() > EXISTING_DISPLAY_LIMIT {
            println!(
                "  ... and {} more",
                preflight.existing.len() - EXISTING_DISPLAY_LIMIT
            );
        }
        println!();
    }

    if !yes {
        let prompt = if preflight.has_conflicts() {
            format!(
                "{} file(s) will be overwritten. Continue?",
                preflight.existing.len()
            )
        } else {
            "Proceed with upload?".to_string()
        };
        if !confirm(&prompt) {
            println!("{}", "Upload cancelled.".yellow());
            return Ok(());
        }
        println!();
    }

    let bar = create_batch_progress(tasks.len() as u64);
    let observer = Arc::new(ConsoleObserver { bar: bar.clone() });
    let results = run_batch(tasks, Arc::clone(&setup.backend), scheduler, observer).await?;
    bar.finish_and_clear();

    print_summary(&BatchSummary::from_results(&results));

    // Every task still gets its attempt; an expired session fails the run.
    match results
        .into_iter()
        .filter_map(|r| r.into_result().err())
        .find(CliError::is_session_fatal)
    {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn print_summary(summary: &BatchSummary) {
    println!();
    println!("{}", "=== Upload Summary ===".cyan().bold());
    println!("Total files:     {}", summary.total);
    println!("{}", format!("Successful:      {}", summary.succeeded).green());
    if summary.failed > 0 {
        println!("{}", format!("Failed:          {}", summary.failed).red());
    } else {
        println!("Failed:          {}", summary.failed);
    }
    if summary.skipped > 0 {
        println!(
            "{}",
            format!("  ({} skipped before upload: invalid file)", summary.skipped).yellow()
        );
    }
    println!();

    if !summary.all_succeeded() {
        println!("{}", "Failed uploads:".yellow());
        for (name, error) in &summary.failures {
            println!("  • {}: {}", name, error);
        }
        println!();
    }
}

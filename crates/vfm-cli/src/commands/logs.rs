//! `vfm logs` command implementation
//!
//! Shows or clears the local upload history.

use crate::audit::{tail, AuditLog, AuditLogEntry, JsonlAuditLog, LogFilter, LogSummary, UploadStatus};
use crate::backend::BackendKind;
use crate::commands::confirm;
use crate::config::Config;
use crate::error::Result;
use crate::progress::format_bytes;
use colored::Colorize;

/// Options for `vfm logs`
#[derive(Debug, Clone, Copy)]
pub struct LogsOptions {
    pub limit: usize,
    pub status: Option<UploadStatus>,
    pub method: Option<BackendKind>,
    pub clear: bool,
    pub yes: bool,
}

/// Execute logs command
pub async fn run(config: &Config, options: LogsOptions) -> Result<()> {
    let log = JsonlAuditLog::new(config.audit_log_path.clone());

    if options.clear {
        return clear(&log, options.yes).await;
    }

    list(&log, options).await
}

async fn list(log: &dyn AuditLog, options: LogsOptions) -> Result<()> {
    let entries = log.read_all().await?;
    let location = log.location().display();

    if entries.is_empty() {
        println!("{}", "No upload logs found.".yellow());
        println!();
        println!("Log file location: {}", location);
        return Ok(());
    }

    let total = entries.len();
    let filter = LogFilter {
        status: options.status,
        method: options.method,
    };
    let filtered = filter.apply(entries);

    if filtered.is_empty() {
        println!("{}", "No entries match the specified filters.".yellow());
        println!();
        println!("Total entries in log: {}", total);
        println!("Log file location: {}", location);
        return Ok(());
    }

    let summary = LogSummary::from_entries(&filtered);
    let shown = tail(filtered, options.limit);

    println!();
    println!("{}", "=== VTEX Upload Logs ===".cyan().bold());
    let filtered_note = if filter == LogFilter::default() { "" } else { " (filtered)" };
    println!("Showing {} of {} entries{}", shown.len(), total, filtered_note);
    println!("Log file: {}", location);
    println!();

    for (i, entry) in shown.iter().enumerate() {
        print_entry(i + 1, entry);
    }

    print_summary(&summary);
    Ok(())
}

fn print_entry(index: usize, entry: &AuditLogEntry) {
    let status = match entry.status {
        UploadStatus::Success => "✓ SUCCESS".green(),
        UploadStatus::Failed => "✗ FAILED".red(),
    };
    let timestamp = entry
        .timestamp
        .with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M:%S");

    println!("[{}] {} | {}", index, timestamp, status);
    println!("    File:      {} ({})", entry.file, format_bytes(entry.size));
    if let Some(ref path) = entry.path {
        println!("    Path:      {}", path);
    }
    println!("    Method:    {}", entry.method);
    println!("    Account:   {}", entry.account);
    println!("    Workspace: {}", entry.workspace);

    match (&entry.url, &entry.error) {
        (Some(url), _) if entry.is_success() => println!("    URL:       {}", url),
        (_, Some(error)) => println!("    Error:     {}", error.red()),
        _ => {}
    }
    println!();
}

fn print_summary(summary: &LogSummary) {
    println!("{}", "=== Summary ===".cyan().bold());
    println!("Total:         {} uploads", summary.total());
    println!("{}", format!("Successful:    {}", summary.success).green());
    if summary.failed > 0 {
        println!("{}", format!("Failed:        {}", summary.failed).red());
    } else {
        println!("Failed:        {}", summary.failed);
    }
    println!("CMS uploads:   {}", summary.cms);
    println!("GraphQL:       {}", summary.graphql);
    println!();
}

async fn clear(log: &dyn AuditLog, yes: bool) -> Result<()> {
    let entries = log.read_all().await?;
    if entries.is_empty() {
        println!("{}", "No logs to clear.".yellow());
        return Ok(());
    }

    if !yes {
        println!();
        println!("{}", "⚠  WARNING: This will permanently delete all upload logs!".yellow());
        println!("Log file: {}", log.location().display());
        println!("Total entries: {}", entries.len());
        println!();

        if !confirm("Are you sure you want to clear all logs?") {
            println!("{}", "Operation cancelled.".yellow());
            return Ok(());
        }
    }

    log.clear().await?;
    println!("{}", "✓ Logs cleared successfully!".green());
    Ok(())
}

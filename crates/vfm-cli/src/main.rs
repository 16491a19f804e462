//! VFM CLI - Main entry point

use clap::Parser;
use colored::Colorize;
use std::process;
use tracing::error;
use vfm_cli::commands::logs::LogsOptions;
use vfm_cli::{Cli, Commands, Config};
use vfm_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Load .env before anything reads the environment
    let _ = dotenvy::dotenv();

    let log_config = LogConfig::builder()
        .level(if cli.verbose { LogLevel::Debug } else { LogLevel::Warn })
        .output(LogOutput::Console)
        .log_file_prefix("vfm")
        .build();

    // Environment variables take precedence over flags
    let log_config = log_config.clone().with_env_overrides().unwrap_or(log_config);

    // The CLI works without logging, so a setup failure is not fatal
    let guard = init_logging(&log_config).ok().flatten();

    let result = execute_command(&cli).await;

    if let Err(e) = result {
        error!(error = %e, "Command failed");
        eprintln!("{} {}", "Error:".red().bold(), e);
        drop(guard);
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> vfm_cli::Result<()> {
    let mut config = Config::from_env()?;
    config.set_verbose(cli.verbose);

    match &cli.command {
        Commands::Upload { file, method, yes } => {
            vfm_cli::commands::upload::run(&config, file, *method, *yes).await
        }

        Commands::Batch {
            directory,
            method,
            concurrent,
            recursive,
            yes,
        } => {
            vfm_cli::commands::batch::run(&config, directory, *method, *concurrent, *recursive, *yes)
                .await
        }

        Commands::Logs {
            limit,
            status,
            method,
            clear,
            yes,
        } => {
            let options = LogsOptions {
                limit: *limit,
                status: *status,
                method: *method,
                clear: *clear,
                yes: *yes,
            };
            vfm_cli::commands::logs::run(&config, options).await
        }
    }
}

//! Command implementations for the CSV adapter CLI
//!
//! Wires argument parsing to the batch processor: logging setup,
//! configuration loading with overrides, and the end-of-run console summary.

use crate::cli::args::{CheckArgs, RunArgs, log_level};
use crate::config::SchemaConfig;
use crate::models::RunSummary;
use crate::processor::BatchProcessor;

use anyhow::{Context, Result};
use colored::*;
use indicatif::HumanDuration;
use tracing::{debug, info};

/// Execute the run command: adapt every file and write the results
pub fn run(args: &RunArgs) -> Result<RunSummary> {
    setup_logging(args.verbose, args.quiet);
    debug!("Command line arguments: {:?}", args);

    let config = load_config(&args.schema_file, args.separator)?;
    info!(
        "Adapting '{}' -> '{}'",
        args.input_dir.display(),
        args.output_dir.display()
    );

    let summary = BatchProcessor::new(args.input_dir.clone(), args.output_dir.clone(), config)
        .with_invalid_dir(args.invalid_dir.clone())
        .run()?;

    print_summary(&summary, false);
    Ok(summary)
}

/// Execute the check command: report planned actions, write nothing
pub fn check(args: &CheckArgs) -> Result<RunSummary> {
    setup_logging(args.verbose, args.quiet);
    debug!("Command line arguments: {:?}", args);

    let config = load_config(&args.schema_file, args.separator)?;
    info!("Checking '{}' (dry run)", args.input_dir.display());

    // The output directory is never touched on a dry run.
    let summary = BatchProcessor::new(args.input_dir.clone(), args.input_dir.clone(), config)
        .check()?;

    print_summary(&summary, true);
    Ok(summary)
}

/// Load the schema configuration and apply CLI overrides
fn load_config(
    schema_file: &std::path::Path,
    separator_override: Option<char>,
) -> Result<SchemaConfig> {
    let mut config = SchemaConfig::from_file(schema_file).with_context(|| {
        format!(
            "failed to load schema configuration from '{}'",
            schema_file.display()
        )
    })?;

    if let Some(separator) = separator_override {
        config.target_separator = separator;
        config
            .validate()
            .context("invalid separator override")?;
    }

    Ok(config)
}

/// Set up structured logging based on CLI verbosity flags
fn setup_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let level = log_level(verbose, quiet);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("csv_adapter={level}")));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    debug!("Logging initialized at level: {}", level);
}

/// Print the end-of-run summary to the console
fn print_summary(summary: &RunSummary, dry_run: bool) {
    let title = if dry_run {
        "Check Summary"
    } else {
        "Adapter Summary"
    };
    println!("\n{}", title.bright_green().bold());
    println!(
        "  {} {}",
        "Time elapsed:".bright_cyan(),
        HumanDuration(summary.elapsed)
    );
    println!(
        "  {} {}",
        "Valid files:".bright_cyan(),
        summary.valid_files.len().to_string().bright_white().bold()
    );
    if summary.files_failed > 0 {
        println!(
            "  {} {}",
            "Files skipped:".bright_red(),
            summary.files_failed.to_string().bright_red().bold()
        );
    }

    if !summary.valid_files.is_empty() {
        println!("\n{}", "Valid files:".bright_cyan());
        for file_name in &summary.valid_files {
            println!("  {file_name}");
        }
    }
    println!();
}

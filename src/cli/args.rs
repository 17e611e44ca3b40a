//! Command-line argument definitions for the CSV adapter
//!
//! Defines the CLI interface using the clap derive API: a `run` subcommand
//! for full adaptation and a `check` subcommand for a dry run.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the CSV adapter
///
/// Normalizes heterogeneous CSV files into the canonical column schema
/// expected by a downstream batch processor.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "csv-adapter",
    version,
    about = "Normalize heterogeneous CSV files to a canonical column schema",
    long_about = "Adapts every CSV file in an input directory to a reference schema: columns the \
                  schema does not know are dropped, aliases are renamed to their canonical names, \
                  surviving columns are reordered, and the output is re-emitted with the target \
                  separator. Files that cannot be adapted are skipped and reported."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for the CSV adapter
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Adapt CSV files and write them to the output directory
    Run(RunArgs),
    /// Report the actions each file would need without writing anything
    Check(CheckArgs),
}

/// Arguments for the run command (full adaptation)
#[derive(Debug, Clone, Parser)]
pub struct RunArgs {
    /// Directory containing the CSV files to adapt
    #[arg(
        short = 'i',
        long = "input",
        value_name = "DIR",
        help = "Directory containing the CSV files to adapt"
    )]
    pub input_dir: PathBuf,

    /// Directory the adapted files are written to
    ///
    /// Created if it does not exist. Each adapted file keeps its original
    /// name; files from earlier runs are overwritten.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Directory the adapted files are written to"
    )]
    pub output_dir: PathBuf,

    /// Path to the schema configuration file
    ///
    /// JSON file with the reference header, the rename map, and the target
    /// separator.
    #[arg(
        short = 's',
        long = "schema",
        value_name = "FILE",
        help = "Path to the schema configuration file (JSON)"
    )]
    pub schema_file: PathBuf,

    /// Override the target separator from the schema file
    #[arg(
        long = "separator",
        value_name = "CHAR",
        help = "Override the target separator from the schema file"
    )]
    pub separator: Option<char>,

    /// Copy files that cannot be adapted into this directory
    ///
    /// Skipped files are left untouched in the input directory either way;
    /// this keeps an extra copy for later inspection.
    #[arg(
        long = "invalid-dir",
        value_name = "DIR",
        help = "Copy files that cannot be adapted into this directory"
    )]
    pub invalid_dir: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the check command (dry run)
#[derive(Debug, Clone, Parser)]
pub struct CheckArgs {
    /// Directory containing the CSV files to examine
    #[arg(
        short = 'i',
        long = "input",
        value_name = "DIR",
        help = "Directory containing the CSV files to examine"
    )]
    pub input_dir: PathBuf,

    /// Path to the schema configuration file
    #[arg(
        short = 's',
        long = "schema",
        value_name = "FILE",
        help = "Path to the schema configuration file (JSON)"
    )]
    pub schema_file: PathBuf,

    /// Override the target separator from the schema file
    #[arg(
        long = "separator",
        value_name = "CHAR",
        help = "Override the target separator from the schema file"
    )]
    pub separator: Option<char>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Map verbosity flags onto a tracing filter level
pub fn log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

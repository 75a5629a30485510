//! Command line interface definition

use clap::{Parser, Subcommand};
use sheetcheck_types::ColorChoice;
use std::path::PathBuf;

/// sheetcheck - Spreadsheet validation with content-based document versioning
#[derive(Parser)]
#[command(name = "sheetcheck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Validate submitted spreadsheets and track document versions")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Use alternate result database
    #[arg(long, global = true, value_name = "PATH")]
    pub database: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Validate every spreadsheet in a directory
    Run {
        /// Directory to scan (defaults to the configured input directory)
        dir: Option<PathBuf>,

        /// Re-run checks on content that was already validated
        #[arg(long)]
        force: bool,

        /// Number of documents processed at once
        #[arg(short = 'j', long)]
        concurrency: Option<usize>,

        /// Run checks without storing results
        #[arg(long)]
        dry_run: bool,

        /// Business case number attached to every result
        #[arg(long, value_name = "CASE")]
        business_case: Option<String>,

        /// Reporting year attached to every result
        #[arg(long, value_name = "YEAR")]
        reporting_year: Option<i32>,
    },

    /// Show whether a file's current content has been validated
    Status {
        /// Spreadsheet file
        file: PathBuf,

        /// Entity identifier (derived from the file name when omitted)
        #[arg(long, value_name = "ID")]
        entity: Option<String>,
    },

    /// List stored check results for an entity
    Results {
        /// Entity identifier
        entity: String,

        /// Only show results for this document version
        #[arg(long)]
        version: Option<u32>,
    },

    /// Show version history statistics
    #[command(name = "cache-stats")]
    CacheStats,
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;
use crate::readers::SourceOptions;
use crate::types::{ReportMode, ScanOptions, DEFAULT_NAMES_FILE, DEFAULT_PROGRESS_EVERY};

/// Audit tabular data files for columns holding patient-identifiable information
#[derive(Parser, Debug)]
#[command(name = "phi-finder")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a data file and report columns that may hold identifiers
    Scan(ScanArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct ScanArgs {
    /// Input file path (.csv, .tsv, .xlsx, .xls, .ods ...)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Newline-separated list of names to look for
    #[arg(short, long, default_value = DEFAULT_NAMES_FILE)]
    pub names: PathBuf,

    /// Field delimiter for delimited files (defaults by extension)
    #[arg(short, long)]
    pub delimiter: Option<char>,

    /// Comma-separated columns to scan (all columns if not specified)
    #[arg(short, long, value_delimiter = ',')]
    pub columns: Option<Vec<String>>,

    /// Worksheet to scan in a workbook (first sheet if not specified)
    #[arg(long)]
    pub sheet: Option<String>,

    /// Report every matching row instead of the first per category
    #[arg(long, default_value_t = false)]
    pub all_matches: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Output file path (stdout if not specified)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Skip the SHA-256 of the input in JSON output
    #[arg(long, default_value_t = false)]
    pub no_hash: bool,

    /// Log progress every N rows (0 disables)
    #[arg(long, default_value_t = DEFAULT_PROGRESS_EVERY)]
    pub progress_every: u64,
}

impl ScanArgs {
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            columns: self.columns.clone(),
            progress_every: self.progress_every,
            reference_date: None,
        }
    }

    pub fn source_options(&self) -> crate::types::Result<SourceOptions> {
        let delimiter = match self.delimiter {
            Some(c) if c.is_ascii() => Some(c as u8),
            Some(c) => {
                return Err(crate::error::Error::InvalidInput(format!(
                    "delimiter must be a single ASCII character, got {:?}",
                    c
                )))
            }
            None => None,
        };

        Ok(SourceOptions {
            delimiter,
            sheet: self.sheet.clone(),
        })
    }

    pub fn report_mode(&self) -> ReportMode {
        if self.all_matches {
            ReportMode::AllMatches
        } else {
            ReportMode::FirstMatch
        }
    }
}

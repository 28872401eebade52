//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sheetcheck: validate CSV and Excel uploads column by column
#[derive(Parser)]
#[command(name = "sheetcheck")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a file against per-column rules
    Validate {
        /// Path to the data file (CSV/XLSX/XLS)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Rule for a column, e.g. "0=aadhaar" (repeatable)
        #[arg(short, long = "rule", value_name = "COL=RULE", required = true)]
        rules: Vec<String>,

        /// Display name for a column, e.g. "1=Phone" (repeatable)
        #[arg(short, long = "name", value_name = "COL=NAME")]
        names: Vec<String>,

        /// Validate the first row too instead of treating it as a header
        #[arg(long)]
        no_skip_header: bool,

        /// Maximum accepted file size (e.g. 5MB, 512KB, 1048576)
        #[arg(long, default_value = "5MB")]
        max_size: ByteSize,

        /// Field delimiter for CSV files (a single character, or "tab")
        #[arg(short, long, default_value = ",")]
        delimiter: Delimiter,

        /// Guess the CSV delimiter from the first lines
        #[arg(long, conflicts_with = "delimiter")]
        detect_delimiter: bool,

        /// Output the full result as JSON
        #[arg(long)]
        json: bool,

        /// Maximum number of errors to list in text output
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Check a file's size and type without decoding it
    Check {
        /// Path to the data file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Maximum accepted file size (e.g. 5MB, 512KB, 1048576)
        #[arg(long, default_value = "5MB")]
        max_size: ByteSize,
    },

    /// List the built-in rules
    Rules {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// A size in bytes, written with an optional KB/MB/GB suffix (powers of 1024).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ByteSize(pub u64);

impl std::str::FromStr for ByteSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        let (digits, multiplier) = if let Some(n) = upper.strip_suffix("GB") {
            (n, 1024 * 1024 * 1024)
        } else if let Some(n) = upper.strip_suffix("MB") {
            (n, 1024 * 1024)
        } else if let Some(n) = upper.strip_suffix("KB") {
            (n, 1024)
        } else if let Some(n) = upper.strip_suffix('B') {
            (n, 1)
        } else {
            (upper.as_str(), 1)
        };

        digits
            .trim()
            .parse::<u64>()
            .ok()
            .and_then(|n| n.checked_mul(multiplier))
            .map(ByteSize)
            .ok_or_else(|| format!("Invalid size: {}. Use e.g. 5MB, 512KB, or 1048576.", s))
    }
}

impl std::fmt::Display for ByteSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} bytes", self.0)
    }
}

/// A single-byte CSV delimiter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Delimiter(pub u8);

impl std::str::FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tab" | "\\t" | "\t" => Ok(Delimiter(b'\t')),
            _ if s.len() == 1 && s.is_ascii() => Ok(Delimiter(s.as_bytes()[0])),
            _ => Err(format!(
                "Invalid delimiter: {:?}. Use a single ASCII character or \"tab\".",
                s
            )),
        }
    }
}

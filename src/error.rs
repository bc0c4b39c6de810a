use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// ReportError – every failure a user-facing request can produce
// ---------------------------------------------------------------------------

/// Errors surfaced to the presentation layer. None of them are fatal: the UI
/// turns each into a status message and waits for a corrected request.
#[derive(Error, Debug)]
pub enum ReportError {
    /// No cached tables found, or the spreadsheet / cache path does not exist.
    #[error("{reason}: {}", .path.display())]
    MissingFile { path: PathBuf, reason: &'static str },

    /// Zero columns chosen where at least one is required, a column absent
    /// from the table, or an otherwise malformed request.
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    /// The pivot aggregation rejected its input.
    #[error("aggregation failed: {0}")]
    AggregationFailure(String),

    /// Chart columns could not be placed on a plot.
    #[error("cannot render chart: {0}")]
    RenderFailure(String),

    /// Table construction violated the column invariants.
    #[error("invalid table: {0}")]
    InvalidTable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl ReportError {
    pub fn missing_file(path: impl Into<PathBuf>, reason: &'static str) -> Self {
        ReportError::MissingFile {
            path: path.into(),
            reason,
        }
    }

    /// Shorthand for an `InvalidSelection` naming a column missing from the table.
    pub fn unknown_column(name: &str) -> Self {
        ReportError::InvalidSelection(format!("column '{name}' not found"))
    }

    /// True for the errors that mean "nothing to show" rather than a failure.
    pub fn is_no_data(&self) -> bool {
        matches!(self, ReportError::RenderFailure(msg) if msg == NO_DATA)
    }
}

/// Message carried by a `RenderFailure` when a distribution has no values.
pub const NO_DATA: &str = "no data";

pub type Result<T> = std::result::Result<T, ReportError>;

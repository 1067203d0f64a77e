//! Error types for loading statistics and producing the report.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop a report run.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("column '{column}' not found in input")]
    MissingColumn { column: String },

    /// `row` is 1-based and counts data rows only (the header is not a row).
    #[error("column '{column}', row {row}: '{value}' is not a number")]
    Parse {
        column: String,
        row: usize,
        value: String,
    },

    #[error("unsupported output format for {} (expected .png or .svg)", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("rendering failed: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;


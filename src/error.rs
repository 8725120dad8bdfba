//! Error types for Trueno-AB
//!
//! Every error aborts only the hypothesis under evaluation. Nothing here is
//! retried: the statistics are deterministic.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Trueno-AB error types
#[derive(Error, Debug)]
pub enum Error {
    /// Requested KPI or feature column is not in the dataset
    #[error("Unknown column: '{column}' does not exist in the dataset")]
    UnknownColumn {
        /// Name of the missing column
        column: String,
    },

    /// A segmentation mask selected zero rows
    #[error("Segmentation resulted in empty group(s) for feature '{feature}'")]
    EmptySegment {
        /// Feature the segmentation was performed on
        feature: String,
    },

    /// Test statistic cannot be computed (zero denominator, too few samples)
    #[error("Undefined statistic: {0}")]
    UndefinedStatistic(String),

    /// Invalid caller input (misaligned masks, non-numeric KPI, bad alpha)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Storage error (batch concatenation, schema mismatch)
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for [`Error::UnknownColumn`]
    pub(crate) fn unknown_column(column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            column: column.into(),
        }
    }
}

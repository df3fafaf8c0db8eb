//! Error types for the rankratioviz library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum RrvError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid abundance value '{value}' at row {row}, column {col}")]
    InvalidAbundance {
        value: String,
        row: usize,
        col: usize,
    },

    #[error("Malformed ordination file: {0}")]
    OrdinationFormat(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Duplicate ID '{0}'")]
    DuplicateId(String),

    #[error("Missing column '{0}'")]
    MissingColumn(String),

    #[error("Duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Incomplete installation: {0}")]
    MissingAsset(String),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, RrvError>;

//! Error types for term-stats.
//!
//! Every fallible operation in the crate returns [`Result<T>`]. Errors are raised
//! at the point of detection and propagated to the caller unchanged; no operation
//! returns a partial result alongside an error.

use thiserror::Error;

/// Result type used throughout term-stats.
pub type Result<T> = std::result::Result<T, StatsError>;

/// Errors produced by partitioning, summarizing, testing and formatting.
#[derive(Error, Debug)]
pub enum StatsError {
    /// A referenced column is absent from the dataset schema.
    #[error("Column '{column}' not found in dataset schema")]
    InvalidColumn { column: String },

    /// Column values are not of the expected numeric or categorical kind.
    #[error("Column '{column}' has type {found}, expected {expected}")]
    TypeMismatch {
        column: String,
        expected: String,
        found: String,
    },

    /// A required computation has zero eligible rows.
    #[error("No eligible rows: {context}")]
    EmptyPartition { context: String },

    /// A structurally invalid argument.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A test was requested on a table shape it is not defined for.
    #[error("{test} requires a 2x2 table, got {rows}x{columns}")]
    UnsupportedShape {
        test: String,
        rows: usize,
        columns: usize,
    },

    /// Arrow kernel failure while reading column values.
    #[error("Arrow computation failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// A probability distribution rejected its parameters.
    #[error("Distribution error: {0}")]
    Distribution(String),

    /// Serialization of a result failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StatsError {
    /// Creates an invalid column error for the given column name.
    pub fn invalid_column(column: impl Into<String>) -> Self {
        Self::InvalidColumn {
            column: column.into(),
        }
    }

    /// Creates an empty partition error with the given context.
    pub fn empty_partition(context: impl Into<String>) -> Self {
        Self::EmptyPartition {
            context: context.into(),
        }
    }

    /// Creates an invalid input error with the given message.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Creates a distribution error with the given message.
    pub fn distribution(msg: impl Into<String>) -> Self {
        Self::Distribution(msg.into())
    }

    /// Returns true if this error was caused by a reference to an unknown column.
    pub fn is_invalid_column(&self) -> bool {
        matches!(self, Self::InvalidColumn { .. })
    }
}

impl From<serde_json::Error> for StatsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

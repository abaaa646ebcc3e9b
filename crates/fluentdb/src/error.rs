//! Error types for fluentdb

use thiserror::Error;

/// Result type alias for fluentdb operations
pub type DbResult<T> = Result<T, DbError>;

/// Error types for query building and execution
#[derive(Debug, Error)]
pub enum DbError {
    /// Malformed clause input (e.g. a `between` operand that is not a pair)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A result accessor was called on a statement that did not succeed
    #[error("Result is not success! sql: {sql}")]
    UnsuccessfulResult { sql: String, message: Option<String> },

    /// Failure reported by the statement executor
    #[error("Execution error: {0}")]
    Execution(String),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DbError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create an execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create an unsuccessful result error
    pub fn unsuccessful(sql: impl Into<String>, message: Option<String>) -> Self {
        Self::UnsuccessfulResult {
            sql: sql.into(),
            message,
        }
    }

    /// Check if this is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Check if this error came from accessing a failed result
    pub fn is_unsuccessful_result(&self) -> bool {
        matches!(self, Self::UnsuccessfulResult { .. })
    }
}

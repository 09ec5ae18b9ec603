//! Error types for sqlbridge

use thiserror::Error;

/// Result type alias for sqlbridge operations
pub type DbalResult<T> = Result<T, DbalError>;

/// Error types for query building and database access
#[derive(Debug, Error)]
pub enum DbalError {
    /// A builder or helper was handed a malformed argument.
    ///
    /// Raised synchronously by the call that introduced the bad input; the
    /// receiver is left exactly as it was before the call.
    #[error("Invalid query specification: {0}")]
    InvalidSpec(String),

    /// The dialect cannot express the requested operation
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DbalError {
    /// Create an invalid specification error
    pub fn invalid_spec(message: impl Into<String>) -> Self {
        Self::InvalidSpec(message.into())
    }

    /// Create an unsupported operation error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Check if this is an invalid specification error
    pub fn is_invalid_spec(&self) -> bool {
        matches!(self, Self::InvalidSpec(_))
    }

    /// Check if this is an unsupported operation error
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<toml::de::Error> for DbalError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

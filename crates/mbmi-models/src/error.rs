//! Error types for mbmi-models

use mbmi_filter::FilterError;
use thiserror::Error;

/// Result type alias for entity and datastore operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Error types for entity and datastore operations
#[derive(Debug, Error)]
pub enum ModelError {
    /// Filter compilation error (unsupported directive, missing filter, ...)
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// Row source failure
    #[error("Store error: {0}")]
    Store(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed email address
    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ModelError {
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

    /// Create a store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Check if this is an unsupported filter argument error
    pub fn is_filter_argument(&self) -> bool {
        matches!(self, Self::Filter(e) if e.is_argument())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// HTTP status a handler should answer with.
    pub fn status(&self) -> u16 {
        match self {
            Self::Filter(
                FilterError::Argument { .. } | FilterError::Required(_) | FilterError::InvalidClause(_),
            ) => 400,
            Self::InvalidEmail(_) | Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            _ => 500,
        }
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

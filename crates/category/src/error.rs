use mindmap_text::TextError;
use thiserror::Error;

/// Result type for category operations
pub type Result<T> = std::result::Result<T, CategoryError>;

/// Errors raised by the category cache and taxonomy loading.
///
/// Lookup failures of the taxonomy itself never show up here: they are
/// remembered in the cache and resolved to `unknown`.
#[derive(Error, Debug)]
pub enum CategoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid cache timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Text(#[from] TextError),
}

impl CategoryError {
    pub fn invalid_timestamp(value: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidTimestamp {
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}

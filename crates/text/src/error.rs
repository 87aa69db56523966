use thiserror::Error;

/// Result type for text operations
pub type Result<T> = std::result::Result<T, TextError>;

/// Errors that can occur while preprocessing text or counting co-occurrences
#[derive(Error, Debug)]
pub enum TextError {
    /// No stopword list / taxonomy mapping exists for the language code
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The worker pool could not be created
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

impl TextError {
    /// Create an unsupported language error
    pub fn unsupported_language(lang: impl Into<String>) -> Self {
        Self::UnsupportedLanguage(lang.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

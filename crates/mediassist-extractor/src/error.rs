//! Error types for the extractor and analyzer

use thiserror::Error;

/// Errors that can occur during extraction or analysis
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Completion service error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Model output could not be interpreted
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Blank conversation text
    #[error("Conversation text is empty")]
    EmptyInput,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::JsonParse(e.to_string())
    }
}

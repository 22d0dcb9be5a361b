//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Completion service error
    #[error("LLM error: {0}")]
    Llm(#[from] mediassist_llm::LlmError),

    /// Conversation error
    #[error("{0}")]
    Conversation(#[from] mediassist_conversation::ConversationError),

    /// Extraction or analysis error
    #[error("{0}")]
    Extractor(#[from] mediassist_extractor::ExtractorError),

    /// Knowledge store error
    #[error("{0}")]
    Store(#[from] mediassist_knowledge::StoreError),

    /// Loader error
    #[error("{0}")]
    Loader(#[from] mediassist_knowledge::LoaderError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation not permitted
    #[error("Operation not permitted: {0}")]
    NotPermitted(String),
}

//! Error types for the conversation driver

use thiserror::Error;

/// Errors that can occur while running a conversation
#[derive(Error, Debug)]
pub enum ConversationError {
    /// Completion service error
    #[error("LLM error: {0}")]
    Llm(String),

    /// The service answered with nothing usable
    #[error("Completion service returned an empty question")]
    EmptyCompletion,

    /// The session has already been ended
    #[error("Conversation has ended")]
    SessionEnded,

    /// Blank patient reply
    #[error("Reply is empty")]
    EmptyReply,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

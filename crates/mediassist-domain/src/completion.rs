//! Completion module - requests sent to a text-completion service

use crate::turn::Speaker;
use std::fmt;

/// Role of a chat message sent to a completion service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatRole {
    /// System instructions
    System,
    /// End-user input
    User,
    /// Prior model output
    Assistant,
}

impl ChatRole {
    /// Get the role name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Speaker> for ChatRole {
    fn from(speaker: Speaker) -> Self {
        match speaker {
            Speaker::Assistant => ChatRole::Assistant,
            Speaker::User => ChatRole::User,
        }
    }
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Message role
    pub role: ChatRole,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Sampling parameters for a completion
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingParams {
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling cutoff
    pub top_p: f32,
    /// Top-k sampling cutoff (not every provider honours it)
    pub top_k: Option<u32>,
    /// Repetition penalty, 1.0 means no adjustment
    pub repetition_penalty: Option<f32>,
    /// Stop sequences
    pub stop: Vec<String>,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            max_tokens: 512,
            temperature: 0.7,
            top_p: 0.9,
            top_k: None,
            repetition_penalty: None,
            stop: Vec::new(),
        }
    }
}

/// A request to a completion service
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model override; providers fall back to their configured model
    pub model: Option<String>,
    /// Ordered chat messages
    pub messages: Vec<ChatMessage>,
    /// Sampling parameters
    pub sampling: SamplingParams,
}

impl CompletionRequest {
    /// Create a request from messages with default sampling
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            model: None,
            messages,
            sampling: SamplingParams::default(),
        }
    }

    /// Create a single-message request from a prompt
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self::new(vec![ChatMessage::user(prompt)])
    }

    /// Set sampling parameters
    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }

    /// Override the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Content of the last message, which carries the prompt for single-shot requests
    pub fn prompt(&self) -> &str {
        self.messages.last().map(|m| m.content.as_str()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_prompt() {
        let request = CompletionRequest::from_prompt("hello");
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, ChatRole::User);
        assert_eq!(request.prompt(), "hello");
        assert!(request.model.is_none());
    }

    #[test]
    fn test_speaker_to_role() {
        assert_eq!(ChatRole::from(Speaker::Assistant), ChatRole::Assistant);
        assert_eq!(ChatRole::from(Speaker::User), ChatRole::User);
    }
}

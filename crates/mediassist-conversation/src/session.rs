//! Conversation session state

use crate::driver::ConversationDriver;
use crate::error::ConversationError;
use mediassist_domain::traits::CompletionProvider;
use mediassist_domain::Transcript;
use std::fmt::Display;
use tracing::{debug, info};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepting questions and replies
    Active,
    /// The user ended the conversation
    Ended,
}

/// One intake conversation: an append-only transcript plus its state
#[derive(Debug, Clone)]
pub struct ConversationSession {
    transcript: Transcript,
    state: SessionState,
}

impl ConversationSession {
    /// Start an empty, active session
    pub fn new() -> Self {
        Self {
            transcript: Transcript::new(),
            state: SessionState::Active,
        }
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the session still accepts turns
    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// The transcript so far
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Generate the next question and record it as an assistant turn.
    ///
    /// When generation fails the fallback text is returned but not recorded.
    pub fn ask<L>(&mut self, driver: &ConversationDriver<L>) -> Result<String, ConversationError>
    where
        L: CompletionProvider,
        L::Error: Display,
    {
        self.ensure_active()?;

        match driver.try_next_question(&self.transcript) {
            Ok(question) => {
                self.transcript.push_assistant(question.clone());
                Ok(question)
            }
            Err(e) => {
                debug!("Falling back after failed question: {}", e);
                Ok(driver.config().fallback_question.clone())
            }
        }
    }

    /// Record the patient's reply as a user turn
    pub fn reply(&mut self, text: &str) -> Result<(), ConversationError> {
        self.ensure_active()?;

        let text = text.trim();
        if text.is_empty() {
            return Err(ConversationError::EmptyReply);
        }
        self.transcript.push_user(text);
        Ok(())
    }

    /// End the conversation and return the final transcript
    pub fn end(&mut self) -> &Transcript {
        if self.is_active() {
            info!("Conversation ended after {} turns", self.transcript.len());
            self.state = SessionState::Ended;
        }
        &self.transcript
    }

    /// Consume the session, yielding its transcript
    pub fn into_transcript(self) -> Transcript {
        self.transcript
    }

    fn ensure_active(&self) -> Result<(), ConversationError> {
        match self.state {
            SessionState::Active => Ok(()),
            SessionState::Ended => Err(ConversationError::SessionEnded),
        }
    }
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}

//! MediAssist Conversation Driver
//!
//! Runs the intake conversation: asks the completion service for the next
//! question, records the patient's replies, and stops when the user ends the
//! conversation.
//!
//! # Architecture
//!
//! ```text
//! Transcript (last N turns) → QuestionPromptBuilder → LLM → next question → Transcript
//! ```
//!
//! The driver is stateless; the transcript lives in a [`ConversationSession`]
//! owned by the caller. The driver has no stopping condition and does not
//! track which topics were already covered.
//!
//! # Example Usage
//!
//! ```
//! use mediassist_conversation::{ConversationConfig, ConversationDriver, ConversationSession};
//! use mediassist_llm::MockProvider;
//!
//! let driver = ConversationDriver::new(
//!     MockProvider::new("What brings you in today?"),
//!     ConversationConfig::default(),
//! );
//!
//! let mut session = ConversationSession::new();
//! let question = session.ask(&driver).unwrap();
//! assert_eq!(question, "What brings you in today?");
//!
//! session.reply("I have had a headache for three days").unwrap();
//! let transcript = session.into_transcript();
//! assert_eq!(transcript.len(), 2);
//! ```

#![warn(missing_docs)]

mod config;
mod driver;
mod error;
mod prompt;
mod session;

pub use config::ConversationConfig;
pub use driver::{ConversationDriver, FALLBACK_QUESTION};
pub use error::ConversationError;
pub use prompt::{QuestionPromptBuilder, HISTORY_HEADER, QUESTION_INSTRUCTIONS};
pub use session::{ConversationSession, SessionState};

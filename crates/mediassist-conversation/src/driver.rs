//! Question generation over the recent transcript

use crate::config::ConversationConfig;
use crate::error::ConversationError;
use crate::prompt::QuestionPromptBuilder;
use mediassist_domain::traits::CompletionProvider;
use mediassist_domain::{ChatMessage, CompletionRequest, Transcript};
use std::fmt::Display;
use tracing::{debug, warn};

/// Returned in place of a question when generation fails
pub const FALLBACK_QUESTION: &str = "I'm sorry, I couldn't generate a question. Please try again.";

/// Generates the next intake question from the conversation so far
pub struct ConversationDriver<L>
where
    L: CompletionProvider,
{
    provider: L,
    config: ConversationConfig,
}

impl<L> ConversationDriver<L>
where
    L: CompletionProvider,
    L::Error: Display,
{
    /// Create a new driver
    pub fn new(provider: L, config: ConversationConfig) -> Self {
        Self { provider, config }
    }

    /// Borrow the completion provider
    pub fn provider(&self) -> &L {
        &self.provider
    }

    /// Active configuration
    pub fn config(&self) -> &ConversationConfig {
        &self.config
    }

    /// Build the completion request for the next question.
    ///
    /// Only the last `history_window` turns are included.
    pub fn build_request(&self, transcript: &Transcript) -> CompletionRequest {
        let history = transcript.recent(self.config.history_window);
        let prompt = QuestionPromptBuilder::new(history).build();

        CompletionRequest::new(vec![ChatMessage::user(prompt)])
            .with_sampling(self.config.sampling())
    }

    /// Ask the completion service for the next question.
    ///
    /// # Errors
    ///
    /// Returns [`ConversationError::Llm`] when the service fails and
    /// [`ConversationError::EmptyCompletion`] when it answers with blank text.
    pub fn try_next_question(&self, transcript: &Transcript) -> Result<String, ConversationError> {
        let request = self.build_request(transcript);
        debug!(
            "Requesting next question with {} of {} turns",
            transcript.recent(self.config.history_window).len(),
            transcript.len()
        );

        let completion = self
            .provider
            .complete(&request)
            .map_err(|e| ConversationError::Llm(e.to_string()))?;

        let question = completion.trim();
        if question.is_empty() {
            return Err(ConversationError::EmptyCompletion);
        }

        Ok(question.to_string())
    }

    /// Next question, or the configured fallback text when generation fails
    pub fn next_question(&self, transcript: &Transcript) -> String {
        match self.try_next_question(transcript) {
            Ok(question) => question,
            Err(e) => {
                warn!("Question generation failed: {}", e);
                self.config.fallback_question.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::HISTORY_HEADER;
    use mediassist_domain::ChatRole;
    use mediassist_llm::MockProvider;

    fn driver(provider: MockProvider) -> ConversationDriver<MockProvider> {
        ConversationDriver::new(provider, ConversationConfig::default())
    }

    #[test]
    fn test_request_uses_single_user_message() {
        let driver = driver(MockProvider::default());
        let request = driver.build_request(&Transcript::new());

        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, ChatRole::User);
        assert!(request.prompt().contains(HISTORY_HEADER));
        assert_eq!(request.sampling.max_tokens, 150);
    }

    #[test]
    fn test_request_limits_history_window() {
        let driver = driver(MockProvider::default());
        let mut transcript = Transcript::new();
        for i in 0..8 {
            transcript.push_assistant(format!("question {}", i));
        }

        let prompt = driver.build_request(&transcript).prompt().to_string();
        assert!(!prompt.contains("question 2"));
        assert!(prompt.contains("question 3"));
        assert!(prompt.contains("question 7"));
    }

    #[test]
    fn test_question_is_trimmed() {
        let driver = driver(MockProvider::new("  How old are you?\n"));
        assert_eq!(driver.try_next_question(&Transcript::new()).unwrap(), "How old are you?");
    }

    #[test]
    fn test_blank_completion_is_an_error() {
        let driver = driver(MockProvider::new("   "));
        assert!(matches!(
            driver.try_next_question(&Transcript::new()),
            Err(ConversationError::EmptyCompletion)
        ));
        assert_eq!(driver.next_question(&Transcript::new()), FALLBACK_QUESTION);
    }

    #[test]
    fn test_failure_returns_fallback() {
        let driver = driver(MockProvider::failing("service unavailable"));
        assert!(matches!(
            driver.try_next_question(&Transcript::new()),
            Err(ConversationError::Llm(_))
        ));
        assert_eq!(driver.next_question(&Transcript::new()), FALLBACK_QUESTION);
    }

    #[test]
    fn test_custom_fallback() {
        let config = ConversationConfig {
            fallback_question: "Could you repeat that?".to_string(),
            ..Default::default()
        };
        let driver = ConversationDriver::new(MockProvider::failing("down"), config);
        assert_eq!(driver.next_question(&Transcript::new()), "Could you repeat that?");
    }
}

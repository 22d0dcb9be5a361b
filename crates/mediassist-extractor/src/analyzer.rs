//! Questionnaire answering over a pasted patient-doctor conversation

use crate::config::AnalyzerConfig;
use crate::error::ExtractorError;
use crate::types::{AnalysisReport, QuestionAnswer};
use mediassist_domain::traits::CompletionProvider;
use mediassist_domain::{ChatMessage, CompletionRequest, RecordField};
use std::fmt::Display;
use tracing::{debug, info, warn};

/// Answers a fixed questionnaire, one completion per question
pub struct ConversationAnalyzer<L>
where
    L: CompletionProvider,
{
    provider: L,
    config: AnalyzerConfig,
    questions: Vec<String>,
}

impl<L> ConversationAnalyzer<L>
where
    L: CompletionProvider,
    L::Error: Display,
{
    /// Create an analyzer asking one question per record field
    pub fn new(provider: L, config: AnalyzerConfig) -> Self {
        let questions = RecordField::ALL.iter().map(|f| f.question().to_string()).collect();
        Self {
            provider,
            config,
            questions,
        }
    }

    /// Replace the questionnaire
    pub fn with_questions<I, S>(mut self, questions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.questions = questions.into_iter().map(Into::into).collect();
        self
    }

    /// The questionnaire, in order
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    /// Borrow the completion provider
    pub fn provider(&self) -> &L {
        &self.provider
    }

    /// Request for a single question
    pub fn build_request(&self, conversation: &str, question: &str) -> CompletionRequest {
        CompletionRequest::new(vec![
            ChatMessage::assistant(self.config.instruction.clone()),
            ChatMessage::system(conversation),
            ChatMessage::user(question),
        ])
        .with_sampling(self.config.sampling())
    }

    /// Answer every question against the conversation.
    ///
    /// A failing question is recorded in the report and the remaining
    /// questions are still asked.
    pub fn analyze(&self, conversation: &str) -> Result<AnalysisReport, ExtractorError> {
        let conversation = conversation.trim();
        if conversation.is_empty() {
            return Err(ExtractorError::EmptyInput);
        }

        info!("Analyzing conversation with {} questions", self.questions.len());
        let mut report = AnalysisReport::default();

        for (idx, question) in self.questions.iter().enumerate() {
            debug!("Question {}/{}: {}", idx + 1, self.questions.len(), question);
            let request = self.build_request(conversation, question);

            let entry = match self.provider.complete(&request) {
                Ok(answer) => QuestionAnswer::answered(question.as_str(), answer.trim()),
                Err(e) => {
                    warn!("Question '{}' failed: {}", question, e);
                    QuestionAnswer::failed(question.as_str(), e.to_string())
                }
            };
            report.answers.push(entry);
        }

        info!("Answered {}/{} questions", report.answered(), report.answers.len());
        Ok(report)
    }
}

//! Result types for conversation analysis

use serde::{Deserialize, Serialize};

/// Answer to one questionnaire entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    /// The question asked
    pub question: String,

    /// The model's answer, when the call succeeded
    pub answer: Option<String>,

    /// Why the call failed, otherwise
    pub error: Option<String>,
}

impl QuestionAnswer {
    /// A successful answer
    pub fn answered(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: Some(answer.into()),
            error: None,
        }
    }

    /// A failed question
    pub fn failed(question: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: None,
            error: Some(error.into()),
        }
    }

    /// Whether the question was answered
    pub fn is_answered(&self) -> bool {
        self.answer.is_some()
    }
}

/// Answers for a whole questionnaire, in question order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// One entry per question
    pub answers: Vec<QuestionAnswer>,
}

impl AnalysisReport {
    /// Number of answered questions
    pub fn answered(&self) -> usize {
        self.answers.iter().filter(|a| a.is_answered()).count()
    }

    /// Entries whose call failed
    pub fn failures(&self) -> impl Iterator<Item = &QuestionAnswer> {
        self.answers.iter().filter(|a| !a.is_answered())
    }
}

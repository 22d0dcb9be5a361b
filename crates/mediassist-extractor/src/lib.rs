//! MediAssist Extractor
//!
//! Turns conversations into structured patient information.
//!
//! # Overview
//!
//! Two pathways share the completion boundary:
//!
//! - [`InformationExtractor`] reads a finished intake transcript and produces
//!   an [`ExtractedRecord`](mediassist_domain::ExtractedRecord). The model is
//!   asked for a JSON object; when the reply is not JSON the extractor falls
//!   back to `key: value` lines.
//! - [`ConversationAnalyzer`] answers a fixed questionnaire against a pasted
//!   patient-doctor conversation, one completion per question.
//!
//! # Architecture
//!
//! ```text
//! Transcript → ExtractionPromptBuilder → LLM → parser → ExtractedRecord
//! Conversation text × questionnaire → LLM → AnalysisReport
//! ```
//!
//! # Example Usage
//!
//! ```
//! use mediassist_domain::{RecordField, Transcript};
//! use mediassist_extractor::{ExtractorConfig, InformationExtractor};
//! use mediassist_llm::MockProvider;
//!
//! let llm = MockProvider::new(r#"{"name": "Jane Doe", "age": "34"}"#);
//! let extractor = InformationExtractor::new(llm, ExtractorConfig::default());
//!
//! let mut transcript = Transcript::new();
//! transcript.push_assistant("What is your name and age?");
//! transcript.push_user("Jane Doe, 34");
//!
//! let record = extractor.extract(&transcript).unwrap();
//! assert_eq!(record.get(RecordField::Name), Some("Jane Doe"));
//! ```

#![warn(missing_docs)]

mod analyzer;
mod config;
mod error;
mod extractor;
mod parser;
mod prompt;
mod types;


pub use analyzer::ConversationAnalyzer;
pub use config::{AnalyzerConfig, ExtractorConfig, LLAMA_STOP_SEQUENCES};
pub use error::ExtractorError;
pub use extractor::InformationExtractor;
pub use parser::{parse_json_object, parse_key_value_lines, parse_record};
pub use prompt::ExtractionPromptBuilder;
pub use types::{AnalysisReport, QuestionAnswer};

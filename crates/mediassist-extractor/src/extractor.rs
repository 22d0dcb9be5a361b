//! Core InformationExtractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_record;
use crate::prompt::ExtractionPromptBuilder;
use mediassist_domain::traits::CompletionProvider;
use mediassist_domain::{ChatMessage, CompletionRequest, ExtractedRecord, Transcript};
use std::fmt::Display;
use tracing::{debug, info};

/// Turns a finished intake transcript into a structured patient record
pub struct InformationExtractor<L>
where
    L: CompletionProvider,
{
    provider: L,
    config: ExtractorConfig,
}

impl<L> InformationExtractor<L>
where
    L: CompletionProvider,
    L::Error: Display,
{
    /// Create a new InformationExtractor
    pub fn new(provider: L, config: ExtractorConfig) -> Self {
        Self { provider, config }
    }

    /// Borrow the completion provider
    pub fn provider(&self) -> &L {
        &self.provider
    }

    /// Build the extraction request over the whole transcript
    pub fn build_request(&self, transcript: &Transcript) -> CompletionRequest {
        let prompt = ExtractionPromptBuilder::new(transcript).build();
        CompletionRequest::new(vec![ChatMessage::user(prompt)])
            .with_sampling(self.config.sampling())
    }

    /// Ask the completion service for the record and return its raw reply
    pub fn extract_raw(&self, transcript: &Transcript) -> Result<String, ExtractorError> {
        let request = self.build_request(transcript);
        debug!("Extraction prompt length: {} chars", request.prompt().len());

        let reply = self
            .provider
            .complete(&request)
            .map_err(|e| ExtractorError::Llm(e.to_string()))?;

        debug!("Extraction reply length: {} chars", reply.len());
        Ok(reply)
    }

    /// Extract a record from the transcript.
    ///
    /// An empty transcript yields an empty record without calling the service.
    pub fn extract(&self, transcript: &Transcript) -> Result<ExtractedRecord, ExtractorError> {
        if transcript.is_empty() {
            debug!("Empty transcript, skipping extraction call");
            return Ok(ExtractedRecord::empty());
        }

        info!("Extracting record from {} turns", transcript.len());
        let reply = self.extract_raw(transcript)?;
        let record = parse_record(&reply, self.config.line_fallback)?;

        info!(
            "Extracted {} fields ({} unrecognized keys)",
            record.len(),
            record.unrecognized().len()
        );
        Ok(record)
    }
}

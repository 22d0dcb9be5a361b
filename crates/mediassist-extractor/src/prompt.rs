//! Prompt engineering for record extraction

use mediassist_domain::{RecordField, Transcript};

/// Builds the extraction prompt over a full transcript
pub struct ExtractionPromptBuilder<'a> {
    transcript: &'a Transcript,
}

impl<'a> ExtractionPromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(transcript: &'a Transcript) -> Self {
        Self { transcript }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\nFields:\n");
        for field in RecordField::ALL {
            prompt.push_str("- ");
            prompt.push_str(field.as_str());
            prompt.push('\n');
        }
        prompt.push('\n');

        prompt.push_str("Conversation:\n");
        prompt.push_str("---\n");
        prompt.push_str(&self.transcript.render());
        prompt.push_str("\n---\n\n");

        prompt.push_str(OUTPUT_REMINDER);
        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"You are reviewing a medical intake conversation between an assistant and a patient.
Extract only the facts the patient (the "user" lines) provided. Ignore anything the assistant said.
Leave out any field the patient did not answer. Do not guess or add commentary."#;

const OUTPUT_REMINDER: &str = r#"Respond with a single JSON object whose keys are the field names above and whose values are strings, for example:
{"name": "Jane Doe", "age": "34"}"#;

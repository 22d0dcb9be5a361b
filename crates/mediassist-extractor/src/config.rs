//! Configuration for the extractor and analyzer

use mediassist_domain::SamplingParams;
use serde::{Deserialize, Serialize};

/// Stop sequences understood by Llama-family chat templates
pub const LLAMA_STOP_SEQUENCES: [&str; 2] = ["<|eot_id|>", "<|eom_id|>"];

/// Configuration for the InformationExtractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum tokens for the extraction reply
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Nucleus sampling cutoff
    pub top_p: f32,

    /// Fall back to `key: value` lines when the reply is not JSON
    pub line_fallback: bool,
}

impl ExtractorConfig {
    /// Sampling parameters for the extraction call
    pub fn sampling(&self) -> SamplingParams {
        SamplingParams {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
            ..Default::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err("temperature must be between 0.0 and 2.0".to_string());
        }
        if self.top_p <= 0.0 || self.top_p > 1.0 {
            return Err("top_p must be in (0.0, 1.0]".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_tokens: 512,
            temperature: 0.2,
            top_p: 0.9,
            line_fallback: true,
        }
    }
}

/// Configuration for the ConversationAnalyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Instruction sent ahead of the conversation
    pub instruction: String,

    /// Maximum tokens per answer
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Nucleus sampling cutoff
    pub top_p: f32,

    /// Top-k sampling cutoff
    pub top_k: u32,

    /// Repetition penalty (1.0 = no adjustment)
    pub repetition_penalty: f32,

    /// Stop sequences
    pub stop: Vec<String>,
}

impl AnalyzerConfig {
    /// Sampling parameters for one questionnaire answer
    pub fn sampling(&self) -> SamplingParams {
        SamplingParams {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: Some(self.top_k),
            repetition_penalty: Some(self.repetition_penalty),
            stop: self.stop.clone(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.instruction.trim().is_empty() {
            return Err("instruction cannot be empty".to_string());
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        if self.top_p <= 0.0 || self.top_p > 1.0 {
            return Err("top_p must be in (0.0, 1.0]".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            instruction:
                "Answer the following question based on the patient-doctor conversation provided."
                    .to_string(),
            max_tokens: 150,
            temperature: 0.7,
            top_p: 0.7,
            top_k: 50,
            repetition_penalty: 1.0,
            stop: LLAMA_STOP_SEQUENCES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

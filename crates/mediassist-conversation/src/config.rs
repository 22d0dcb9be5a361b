//! Configuration for the conversation driver

use crate::driver::FALLBACK_QUESTION;
use mediassist_domain::SamplingParams;
use serde::{Deserialize, Serialize};

/// Configuration for the ConversationDriver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationConfig {
    /// Maximum number of recent turns included in the question prompt
    pub history_window: usize,

    /// Maximum tokens for a generated question
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Nucleus sampling cutoff
    pub top_p: f32,

    /// Top-k sampling cutoff
    pub top_k: u32,

    /// Repetition penalty (1.0 = no adjustment)
    pub repetition_penalty: f32,

    /// Text returned when no question could be generated
    pub fallback_question: String,
}

impl ConversationConfig {
    /// Sampling parameters for question generation
    pub fn sampling(&self) -> SamplingParams {
        SamplingParams {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: Some(self.top_k),
            repetition_penalty: Some(self.repetition_penalty),
            stop: Vec::new(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.history_window == 0 {
            return Err("history_window must be greater than 0".to_string());
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err("temperature must be between 0.0 and 2.0".to_string());
        }
        if !(0.0..=1.0).contains(&self.top_p) || self.top_p == 0.0 {
            return Err("top_p must be in (0.0, 1.0]".to_string());
        }
        if self.fallback_question.trim().is_empty() {
            return Err("fallback_question cannot be empty".to_string());
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

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            history_window: 5,
            max_tokens: 150,
            temperature: 0.7,
            top_p: 0.9,
            top_k: 50,
            repetition_penalty: 1.0,
            fallback_question: FALLBACK_QUESTION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ConversationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.history_window, 5);
    }

    #[test]
    fn test_default_sampling() {
        let sampling = ConversationConfig::default().sampling();
        assert_eq!(sampling.max_tokens, 150);
        assert_eq!(sampling.temperature, 0.7);
        assert_eq!(sampling.top_p, 0.9);
        assert_eq!(sampling.top_k, Some(50));
        assert_eq!(sampling.repetition_penalty, Some(1.0));
    }

    #[test]
    fn test_invalid_history_window() {
        let config = ConversationConfig {
            history_window: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config =
            ConversationConfig::from_toml("history_window = 3\ntemperature = 0.2").unwrap();
        assert_eq!(config.history_window, 3);
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.max_tokens, 150);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ConversationConfig::default();
        let parsed = ConversationConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(config, parsed);
    }
}

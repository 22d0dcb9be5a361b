//! Configuration for the knowledge-base loader

use globset::{GlobBuilder, GlobMatcher};
use serde::{Deserialize, Serialize};

/// Configuration for the KnowledgeBaseLoader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Glob matched against file names in the source directory
    pub pattern: String,

    /// Match the pattern without regard to case
    pub case_insensitive: bool,

    /// Separator placed between page texts of one file
    pub page_separator: String,
}

impl LoaderConfig {
    /// Compile the file name pattern
    pub fn matcher(&self) -> Result<GlobMatcher, String> {
        GlobBuilder::new(&self.pattern)
            .case_insensitive(self.case_insensitive)
            .literal_separator(true)
            .build()
            .map(|glob| glob.compile_matcher())
            .map_err(|e| format!("Invalid pattern '{}': {}", self.pattern, e))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.pattern.trim().is_empty() {
            return Err("pattern cannot be empty".to_string());
        }
        self.matcher().map(|_| ())
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

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            pattern: "*.pdf".to_string(),
            case_insensitive: true,
            page_separator: "\n\n".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_pdf_names() {
        let matcher = LoaderConfig::default().matcher().unwrap();
        assert!(matcher.is_match("report.pdf"));
        assert!(matcher.is_match("SCAN.PDF"));
        assert!(!matcher.is_match("notes.txt"));
    }

    #[test]
    fn test_invalid_pattern() {
        let config = LoaderConfig {
            pattern: "[unclosed".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = LoaderConfig::from_toml("pattern = \"*.txt\"").unwrap();
        assert_eq!(config.pattern, "*.txt");
        assert!(config.case_insensitive);

        let parsed = LoaderConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(config, parsed);
    }
}

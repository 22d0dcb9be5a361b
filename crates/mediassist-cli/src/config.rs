//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name
    #[serde(default = "default_profile")]
    pub active_profile: String,

    /// Available profiles
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,

    /// Knowledge store settings
    #[serde(default)]
    pub knowledge: KnowledgeSettings,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// File this configuration was loaded from
    #[serde(skip)]
    source: Option<PathBuf>,
}

/// Completion provider profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Which service to call
    pub provider: ProviderKind,

    /// Model identifier
    pub model: String,

    /// Override for the service URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Environment variable holding the API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Supported completion services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI chat completions
    #[serde(rename = "openai")]
    OpenAi,
    /// Together AI
    Together,
    /// Featherless
    Featherless,
    /// Local Ollama server
    Ollama,
}

/// Which knowledge store backs `kb` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeBackend {
    /// Local SQLite file
    Sqlite,
    /// MindsDB server
    Mindsdb,
}

/// Knowledge store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeSettings {
    /// Store backend
    #[serde(default = "default_backend")]
    pub backend: KnowledgeBackend,

    /// SQLite database path (defaults to `~/.mediassist/knowledge.db`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sqlite_path: Option<PathBuf>,

    /// MindsDB server URL
    #[serde(default = "default_mindsdb_url")]
    pub mindsdb_url: String,

    /// Default file pattern for `kb load`
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Command history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl ProviderKind {
    /// Environment variable read for the API key when the profile names none
    pub fn default_api_key_env(&self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAi => Some("OPENAI_API_KEY"),
            ProviderKind::Together => Some("TOGETHER_API_KEY"),
            ProviderKind::Featherless => Some("FEATHERLESS_API_KEY"),
            ProviderKind::Ollama => None,
        }
    }

    /// Name as written in the config file
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Together => "together",
            ProviderKind::Featherless => "featherless",
            ProviderKind::Ollama => "ollama",
        }
    }
}

impl Profile {
    /// Environment variable this profile reads its API key from
    pub fn api_key_var(&self) -> Option<&str> {
        self.api_key_env
            .as_deref()
            .or_else(|| self.provider.default_api_key_env())
    }

    /// Resolve the API key from the environment.
    ///
    /// Hosted providers require the variable to be set; Ollama needs no key.
    pub fn api_key(&self) -> Result<Option<String>> {
        let Some(var) = self.api_key_var() else {
            return Ok(None);
        };

        match env::var(var) {
            Ok(key) if !key.trim().is_empty() => Ok(Some(key)),
            _ if self.provider == ProviderKind::Ollama => Ok(None),
            _ => Err(CliError::Config(format!(
                "Environment variable {} is not set (needed by the {} provider)",
                var,
                self.provider.as_str()
            ))),
        }
    }
}

impl Config {
    /// Directory holding configuration, history and the local store.
    pub fn dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".mediassist"))
    }

    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::dir()?.join("config.toml"))
    }

    /// Load configuration from the default file or create default.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path)?;
            toml::from_str::<Config>(&contents)?
        } else {
            Self::default()
        };
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Save configuration to the file it was loaded from.
    pub fn save(&self) -> Result<()> {
        let path = match &self.source {
            Some(path) => path.clone(),
            None => Self::path()?,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, contents)?;
        Ok(())
    }

    /// Get the active profile.
    pub fn get_active_profile(&self) -> Result<&Profile> {
        self.profiles
            .get(&self.active_profile)
            .ok_or_else(|| CliError::Config(format!("Profile '{}' not found", self.active_profile)))
    }

    /// Add or update a profile.
    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Switch to a different profile.
    pub fn switch_profile(&mut self, name: String) -> Result<()> {
        if !self.profiles.contains_key(&name) {
            return Err(CliError::Config(format!("Profile '{}' does not exist", name)));
        }
        self.active_profile = name;
        Ok(())
    }

    /// SQLite database path for the local knowledge store.
    pub fn sqlite_path(&self) -> Result<PathBuf> {
        match &self.knowledge.sqlite_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::dir()?.join("knowledge.db")),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut profiles = HashMap::new();
        profiles.insert(
            "default".to_string(),
            Profile {
                provider: ProviderKind::Together,
                model: "meta-llama/Meta-Llama-3.1-8B-Instruct-Turbo".to_string(),
                base_url: None,
                api_key_env: None,
                timeout_secs: default_timeout_secs(),
            },
        );
        profiles.insert(
            "local".to_string(),
            Profile {
                provider: ProviderKind::Ollama,
                model: "llama3.1".to_string(),
                base_url: None,
                api_key_env: None,
                timeout_secs: 120,
            },
        );

        Self {
            active_profile: "default".to_string(),
            profiles,
            knowledge: KnowledgeSettings::default(),
            settings: Settings::default(),
            source: None,
        }
    }
}

impl Default for KnowledgeSettings {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            sqlite_path: None,
            mindsdb_url: default_mindsdb_url(),
            pattern: default_pattern(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            history_size: 1000,
        }
    }
}

fn default_profile() -> String {
    "default".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_backend() -> KnowledgeBackend {
    KnowledgeBackend::Sqlite
}

fn default_mindsdb_url() -> String {
    mediassist_knowledge::DEFAULT_MINDSDB_URL.to_string()
}

fn default_pattern() -> String {
    "*.pdf".to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_history_size() -> usize {
    1000
}

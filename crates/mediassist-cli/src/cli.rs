//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use mediassist_domain::UserRole;
use std::path::PathBuf;

/// MediAssist CLI - Patient intake, record extraction and medical knowledge bases.
#[derive(Debug, Parser)]
#[command(name = "mediassist")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "MEDIASSIST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (values only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run an interactive intake conversation
    Chat(ChatArgs),

    /// Extract a patient record from a saved transcript
    Extract(ExtractArgs),

    /// Answer the intake questionnaire against a patient-doctor conversation
    Analyze(AnalyzeArgs),

    /// Send a single prompt to the completion service
    Ask(AskArgs),

    /// Manage knowledge bases
    Kb(KbArgs),

    /// Manage configuration profiles
    Profile(ProfileArgs),
}

/// Arguments for the chat command.
#[derive(Debug, Default, Parser)]
pub struct ChatArgs {
    /// Who is using the assistant
    #[arg(short, long, value_enum)]
    pub role: Option<RoleArg>,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// JSON transcript file: an array of {"role", "content"} objects
    #[arg(short = 'i', long)]
    pub file: Option<PathBuf>,

    /// Read the transcript from stdin
    #[arg(long)]
    pub stdin: bool,

    /// Print the model's raw reply instead of the parsed record
    #[arg(long)]
    pub raw: bool,
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Text file containing the conversation
    #[arg(short = 'i', long)]
    pub file: Option<PathBuf>,

    /// Read the conversation from stdin
    #[arg(long)]
    pub stdin: bool,
}

/// Arguments for the ask command.
#[derive(Debug, Parser)]
pub struct AskArgs {
    /// Prompt text
    #[arg(required = true)]
    pub prompt: Vec<String>,

    /// System message sent ahead of the prompt
    #[arg(short, long)]
    pub system: Option<String>,

    /// Print the reply as it is generated
    #[arg(long)]
    pub stream: bool,

    /// Maximum tokens to generate
    #[arg(long, default_value = "512")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[arg(short, long, default_value = "0.7")]
    pub temperature: f32,
}

/// Arguments for knowledge base management.
#[derive(Debug, Parser)]
pub struct KbArgs {
    #[command(subcommand)]
    pub action: KbAction,
}

/// Knowledge base actions.
#[derive(Debug, Subcommand)]
pub enum KbAction {
    /// Load every matching file in a directory into a knowledge base
    Load {
        /// Knowledge base name
        name: String,
        /// Directory to read
        dir: PathBuf,
        /// File name pattern (defaults to the configured pattern)
        #[arg(long)]
        pattern: Option<String>,
    },

    /// List knowledge bases
    List,

    /// Drop a knowledge base
    Drop {
        /// Knowledge base name
        name: String,
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Arguments for profile management.
#[derive(Debug, Parser)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile management actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,

    /// Show active profile
    Show,

    /// Switch to a different profile
    Switch {
        /// Profile name
        name: String,
    },

    /// Create or update a profile
    Set {
        /// Profile name
        name: String,
        /// Completion service
        #[arg(long, value_enum)]
        provider: ProviderArg,
        /// Model identifier
        #[arg(short, long)]
        model: String,
        /// Service URL override
        #[arg(long)]
        base_url: Option<String>,
        /// Environment variable holding the API key
        #[arg(long)]
        api_key_env: Option<String>,
        /// Request timeout in seconds
        #[arg(long, default_value = "60")]
        timeout_secs: u64,
    },

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,
    },
}

/// Role argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RoleArg {
    /// Patient preparing for a visit
    Patient,
    /// Clinician
    Doctor,
    /// Front-desk and administrative staff
    Admin,
}

/// Provider argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ProviderArg {
    /// OpenAI chat completions
    #[value(name = "openai")]
    OpenAi,
    /// Together AI
    Together,
    /// Featherless
    Featherless,
    /// Local Ollama server
    Ollama,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<RoleArg> for UserRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Patient => UserRole::Patient,
            RoleArg::Doctor => UserRole::Doctor,
            RoleArg::Admin => UserRole::Admin,
        }
    }
}

impl From<ProviderArg> for crate::config::ProviderKind {
    fn from(provider: ProviderArg) -> Self {
        match provider {
            ProviderArg::OpenAi => crate::config::ProviderKind::OpenAi,
            ProviderArg::Together => crate::config::ProviderKind::Together,
            ProviderArg::Featherless => crate::config::ProviderKind::Featherless,
            ProviderArg::Ollama => crate::config::ProviderKind::Ollama,
        }
    }
}

//! MediAssist CLI library.
//!
//! Configuration profiles, the interactive intake chat, subcommand
//! implementations and output formatting for the `mediassist` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod provider;
pub mod repl;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;

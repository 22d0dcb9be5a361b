//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::commands::read_input;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::provider::build_provider;
use mediassist_domain::{Speaker, Transcript, Turn};
use mediassist_extractor::{ExtractorConfig, InformationExtractor};
use serde::Deserialize;
use tracing::error;

/// Execute the extract command.
pub fn execute_extract(args: ExtractArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let json_data = read_input(args.file.as_deref(), args.stdin)?;
    let transcript = parse_transcript(&json_data)?;

    let provider = build_provider(config.get_active_profile()?)?;
    let extractor = InformationExtractor::new(provider, ExtractorConfig::default());

    if args.raw {
        println!("{}", extractor.extract_raw(&transcript)?);
        return Ok(());
    }

    match extractor.extract(&transcript) {
        Ok(record) => println!("{}", formatter.format_record(&record)?),
        Err(e) => {
            error!("Extraction failed: {}", e);
            println!("{}", formatter.warning("No information extracted."));
        }
    }

    Ok(())
}

/// One transcript entry as saved on disk.
#[derive(Debug, Deserialize)]
struct TurnDefinition {
    role: String,
    content: String,
}

/// Parse a JSON array of `{"role", "content"}` objects into a transcript.
fn parse_transcript(json_data: &str) -> Result<Transcript> {
    let defs: Vec<TurnDefinition> = serde_json::from_str(json_data)?;

    let mut transcript = Transcript::new();
    for def in defs {
        let role = Speaker::parse(&def.role).ok_or_else(|| {
            CliError::InvalidInput(format!(
                "Invalid role '{}'. Expected 'assistant' or 'user'",
                def.role
            ))
        })?;
        transcript.push(Turn::new(role, def.content));
    }

    Ok(transcript)
}

//! Analyze command implementation.

use crate::cli::AnalyzeArgs;
use crate::commands::read_input;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use crate::provider::build_provider;
use mediassist_extractor::{AnalyzerConfig, ConversationAnalyzer};

/// Execute the analyze command.
pub fn execute_analyze(args: AnalyzeArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let conversation = read_input(args.file.as_deref(), args.stdin)?;

    let provider = build_provider(config.get_active_profile()?)?;
    let analyzer = ConversationAnalyzer::new(provider, AnalyzerConfig::default());
    let report = analyzer.analyze(&conversation)?;

    println!("{}", formatter.format_analysis(&report)?);

    let failed = report.answers.len() - report.answered();
    if failed > 0 {
        eprintln!(
            "{}",
            formatter.warning(&format!("{} question(s) could not be answered", failed))
        );
    }

    Ok(())
}

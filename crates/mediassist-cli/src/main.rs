//! MediAssist CLI - Patient intake assistant and medical knowledge base loader.

use clap::Parser;
use mediassist_cli::commands;
use mediassist_cli::repl;
use mediassist_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> mediassist_cli::Result<()> {
    // API keys may live in a local .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Override profile if specified
    if let Some(profile_name) = cli.profile {
        config.switch_profile(profile_name)?;
    }

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        None => repl::run_chat(&config, &formatter, None)?,
        Some(Command::Chat(args)) => {
            repl::run_chat(&config, &formatter, args.role.map(Into::into))?
        }
        Some(Command::Extract(args)) => commands::execute_extract(args, &config, &formatter)?,
        Some(Command::Analyze(args)) => commands::execute_analyze(args, &config, &formatter)?,
        Some(Command::Ask(args)) => commands::execute_ask(args, &config, &formatter)?,
        Some(Command::Kb(args)) => commands::execute_kb(args, &config, &formatter)?,
        Some(Command::Profile(args)) => commands::execute_profile(args, &mut config, &formatter)?,
    }

    Ok(())
}

/// Install the stderr log subscriber.
///
/// `--verbose` forces debug output; otherwise `RUST_LOG` applies, defaulting to warnings.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

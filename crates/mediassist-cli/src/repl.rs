//! Interactive intake chat.

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::provider::{build_provider, DynProvider};
use mediassist_conversation::{ConversationConfig, ConversationDriver, ConversationSession};
use mediassist_domain::UserRole;
use mediassist_extractor::{ExtractorConfig, InformationExtractor};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use tracing::{error, info};

/// One line of chat input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ChatInput {
    Reply(String),
    End,
    History,
    Help,
    Quit,
}

/// Parse a chat line.
///
/// Anything not starting with `/` is a reply to the current question.
fn parse_chat_input(line: &str) -> Result<ChatInput> {
    let line = line.trim();
    if line.is_empty() {
        return Err(CliError::InvalidInput("Empty input".to_string()));
    }

    let Some(command) = line.strip_prefix('/') else {
        return Ok(ChatInput::Reply(line.to_string()));
    };

    match command.trim().to_lowercase().as_str() {
        "end" => Ok(ChatInput::End),
        "history" => Ok(ChatInput::History),
        "help" | "?" => Ok(ChatInput::Help),
        "quit" | "exit" | "q" => Ok(ChatInput::Quit),
        other => Err(CliError::InvalidInput(format!(
            "Unknown command: /{}. Type /help for available commands.",
            other
        ))),
    }
}

/// Run the interactive intake chat.
pub fn run_chat(config: &Config, formatter: &Formatter, role: Option<UserRole>) -> Result<()> {
    let profile = config.get_active_profile()?;
    let driver = ConversationDriver::new(build_provider(profile)?, ConversationConfig::default());
    let extractor = InformationExtractor::new(build_provider(profile)?, ExtractorConfig::default());

    println!(
        "{}",
        formatter.info("MediAssist intake - type /end to finish and extract, /help for commands")
    );
    if let Some(role) = role {
        println!("{}", formatter.assistant(role.canned_response()));
    }
    println!();

    let editor_config = rustyline::Config::builder()
        .max_history_size(config.settings.history_size)
        .map_err(readline_error)?
        .build();
    let mut editor = DefaultEditor::with_config(editor_config).map_err(readline_error)?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    let mut session = ConversationSession::new();
    ask_next(&mut session, &driver, formatter)?;

    loop {
        match editor.readline("you> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                editor.add_history_entry(line.trim()).ok();

                match parse_chat_input(&line) {
                    Ok(ChatInput::Reply(text)) => {
                        if let Err(e) = session.reply(&text) {
                            eprintln!("{}", formatter.error(&e.to_string()));
                            continue;
                        }
                        ask_next(&mut session, &driver, formatter)?;
                    }
                    Ok(ChatInput::End) => {
                        finish_session(&mut session, &extractor, formatter);
                        session = ConversationSession::new();
                        println!("{}", formatter.info("Starting a new conversation"));
                        ask_next(&mut session, &driver, formatter)?;
                    }
                    Ok(ChatInput::History) => {
                        println!("{}", formatter.format_transcript(session.transcript()));
                    }
                    Ok(ChatInput::Help) => print_help(formatter),
                    Ok(ChatInput::Quit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use /quit to exit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();

    Ok(())
}

fn ask_next(
    session: &mut ConversationSession,
    driver: &ConversationDriver<DynProvider>,
    formatter: &Formatter,
) -> Result<()> {
    let question = session.ask(driver)?;
    println!("{}", formatter.assistant(&question));
    Ok(())
}

/// End the session and print what could be extracted from it.
fn finish_session(
    session: &mut ConversationSession,
    extractor: &InformationExtractor<DynProvider>,
    formatter: &Formatter,
) {
    let transcript = session.end();
    info!("Extracting record from {} turns", transcript.len());

    let rendered = extractor
        .extract(transcript)
        .map_err(CliError::from)
        .and_then(|record| formatter.format_record(&record));

    match rendered {
        Ok(output) => println!("{}", output),
        Err(e) => {
            error!("Extraction failed: {}", e);
            println!("{}", formatter.warning("No information extracted."));
        }
    }
}

fn readline_error(e: ReadlineError) -> CliError {
    CliError::Io(std::io::Error::new(
        std::io::ErrorKind::Other,
        format!("Failed to initialize editor: {}", e),
    ))
}

fn get_history_path() -> Result<PathBuf> {
    let dir = Config::dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  <text>          - Answer the current question");
    println!("  /end            - End the conversation and extract the patient record");
    println!("  /history        - Show the conversation so far");
    println!("  /help, /?       - Show this help");
    println!("  /quit, /exit    - Leave the chat");
    println!();
}

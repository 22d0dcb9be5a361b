//! Ask command implementation.

use crate::cli::AskArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::provider::build_provider;
use mediassist_domain::traits::CompletionProvider;
use mediassist_domain::{ChatMessage, CompletionRequest, SamplingParams};
use std::io::{self, Write};

/// Execute the ask command.
pub fn execute_ask(args: AskArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let request = build_request(&args)?;
    let provider = build_provider(config.get_active_profile()?)?;

    if args.stream {
        let mut stdout = io::stdout();
        provider.complete_streaming(&request, &mut |fragment| {
            print!("{}", fragment);
            stdout.flush().ok();
        })?;
        println!();
        return Ok(());
    }

    let reply = provider.complete(&request)?;
    let reply = reply.trim();
    if reply.is_empty() {
        println!("{}", formatter.warning("The service returned an empty reply"));
    } else {
        println!("{}", reply);
    }

    Ok(())
}

/// Build the completion request for a one-shot prompt.
fn build_request(args: &AskArgs) -> Result<CompletionRequest> {
    let prompt = args.prompt.join(" ");
    if prompt.trim().is_empty() {
        return Err(CliError::InvalidInput("Prompt cannot be empty".to_string()));
    }

    let mut messages = Vec::new();
    if let Some(system) = &args.system {
        messages.push(ChatMessage::system(system.clone()));
    }
    messages.push(ChatMessage::user(prompt));

    Ok(CompletionRequest::new(messages).with_sampling(SamplingParams {
        max_tokens: args.max_tokens,
        temperature: args.temperature,
        ..SamplingParams::default()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediassist_domain::ChatRole;

    fn ask_args(prompt: &[&str], system: Option<&str>) -> AskArgs {
        AskArgs {
            prompt: prompt.iter().map(|s| s.to_string()).collect(),
            system: system.map(String::from),
            stream: false,
            max_tokens: 256,
            temperature: 0.3,
        }
    }

    #[test]
    fn test_request_with_system_message() {
        let request =
            build_request(&ask_args(&["what", "is", "a", "fever?"], Some("Be brief."))).unwrap();
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, ChatRole::System);
        assert_eq!(request.prompt(), "what is a fever?");
        assert_eq!(request.sampling.max_tokens, 256);
        assert_eq!(request.sampling.temperature, 0.3);
    }

    #[test]
    fn test_request_without_system_message() {
        let request = build_request(&ask_args(&["hello"], None)).unwrap();
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, ChatRole::User);
    }

    #[test]
    fn test_blank_prompt_rejected() {
        assert!(build_request(&ask_args(&["  "], None)).is_err());
    }
}

//! Integration tests for mediassist-conversation
//!
//! These tests drive whole sessions against a mock completion service.

use mediassist_conversation::{
    ConversationConfig, ConversationDriver, ConversationSession, FALLBACK_QUESTION, HISTORY_HEADER,
};
use mediassist_domain::{Speaker, Transcript};
use mediassist_llm::MockProvider;
use proptest::prelude::*;

fn marker(i: usize) -> String {
    format!("<<turn {}>>", i)
}

#[test]
fn test_first_question_from_empty_transcript() {
    let provider = MockProvider::new("Hello! What is your name?");
    let driver = ConversationDriver::new(provider, ConversationConfig::default());

    let question = driver.next_question(&Transcript::new());
    assert_eq!(question, "Hello! What is your name?");

    let request = driver.provider().last_request().unwrap();
    let prompt = request.prompt();
    assert!(prompt.contains(HISTORY_HEADER));
    assert!(!prompt.contains("assistant:"));
    assert!(!prompt.contains("user:"));
}

#[test]
fn test_full_intake_session() {
    let provider = MockProvider::default();
    provider.push_response("What is your name?");
    provider.push_response("How old are you?");
    provider.push_response("What brings you in today?");

    let driver = ConversationDriver::new(provider, ConversationConfig::default());
    let mut session = ConversationSession::new();

    session.ask(&driver).unwrap();
    session.reply("Jane Doe").unwrap();
    session.ask(&driver).unwrap();
    session.reply("34").unwrap();
    session.ask(&driver).unwrap();
    session.reply("I have the flu").unwrap();

    let transcript = session.end().clone();
    assert_eq!(transcript.len(), 6);
    assert_eq!(transcript.user_turns().count(), 3);
    assert_eq!(transcript.turns()[0].role, Speaker::Assistant);
    assert_eq!(transcript.turns()[5].content, "I have the flu");

    // Third request saw the first question and answer
    let requests = driver.provider().requests();
    assert_eq!(requests.len(), 3);
    assert!(requests[2].prompt().contains("assistant: What is your name?\nuser: Jane Doe"));
}

#[test]
fn test_failing_service_yields_fallback_and_conversation_continues() {
    let provider = MockProvider::default();
    provider.push_error("timeout");
    provider.push_response("What is your name?");

    let driver = ConversationDriver::new(provider, ConversationConfig::default());
    let mut session = ConversationSession::new();

    assert_eq!(session.ask(&driver).unwrap(), FALLBACK_QUESTION);
    assert_eq!(session.ask(&driver).unwrap(), "What is your name?");
    assert_eq!(session.transcript().len(), 1);
}

proptest! {
    #[test]
    fn prop_prompt_includes_at_most_window_turns(count in 0usize..20, window in 1usize..8) {
        let config = ConversationConfig { history_window: window, ..Default::default() };
        let driver = ConversationDriver::new(MockProvider::default(), config);

        let transcript: Transcript = (0..count)
            .map(|i| {
                let role = if i % 2 == 0 { Speaker::Assistant } else { Speaker::User };
                mediassist_domain::Turn::new(role, marker(i))
            })
            .collect();

        let request = driver.build_request(&transcript);
        let prompt = request.prompt();

        let included = (0..count).filter(|&i| prompt.contains(&marker(i))).count();
        prop_assert_eq!(included, count.min(window));

        for i in count.saturating_sub(window)..count {
            prop_assert!(prompt.contains(&marker(i)));
        }
    }
}

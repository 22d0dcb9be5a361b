//! MediAssist Completion Provider Layer
//!
//! Pluggable text-completion providers behind the `CompletionProvider` trait
//! from `mediassist-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OpenAiCompatibleProvider`: `/chat/completions` endpoints (OpenAI, Together AI, Featherless)
//! - `OllamaProvider`: Local Ollama chat API
//!
//! # Examples
//!
//! ```
//! use mediassist_domain::traits::CompletionProvider;
//! use mediassist_domain::CompletionRequest;
//! use mediassist_llm::MockProvider;
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.complete(&CompletionRequest::from_prompt("test prompt")).unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

mod http;
pub mod ollama;
pub mod openai;
pub mod sse;

use mediassist_domain::traits::CompletionProvider;
use mediassist_domain::CompletionRequest;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use ollama::OllamaProvider;
pub use openai::{ApiFlavor, OpenAiCompatibleProvider};

/// Errors that can occur during completion calls
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the service
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Missing or rejected credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Provider could not be set up
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl LlmError {
    /// Whether another attempt might succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, LlmError::Communication(_) | LlmError::RateLimitExceeded)
    }
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error(String),
}

/// Mock completion provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls and
/// records every request it receives.
///
/// Resolution order for each call: queued replies first, then the first
/// registered rule whose needle occurs in the request's last message, then
/// the default reply.
///
/// # Examples
///
/// ```
/// use mediassist_domain::traits::CompletionProvider;
/// use mediassist_domain::CompletionRequest;
/// use mediassist_llm::MockProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("age", "How old are you?");
///
/// let reply = provider.complete(&CompletionRequest::from_prompt("ask about age")).unwrap();
/// assert_eq!(reply, "How old are you?");
/// assert_eq!(provider.call_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_reply: MockReply,
    rules: Arc<Mutex<Vec<(String, MockReply)>>>,
    queue: Arc<Mutex<Vec<MockReply>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockProvider {
    /// Create a MockProvider with a fixed response for all requests
    pub fn new(response: impl Into<String>) -> Self {
        Self::with_default(MockReply::Text(response.into()))
    }

    /// Create a MockProvider that fails every request
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_default(MockReply::Error(message.into()))
    }

    fn with_default(default_reply: MockReply) -> Self {
        Self {
            default_reply,
            rules: Arc::new(Mutex::new(Vec::new())),
            queue: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Reply with `response` when the last message contains `needle`
    pub fn add_response(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        lock(&self.rules).push((needle.into(), MockReply::Text(response.into())));
    }

    /// Fail when the last message contains `needle`
    pub fn add_error(&mut self, needle: impl Into<String>) {
        lock(&self.rules).push((needle.into(), MockReply::Error("Mock error".to_string())));
    }

    /// Queue a one-shot reply, consumed before any rule
    pub fn push_response(&self, response: impl Into<String>) {
        lock(&self.queue).push(MockReply::Text(response.into()));
    }

    /// Queue a one-shot failure, consumed before any rule
    pub fn push_error(&self, message: impl Into<String>) {
        lock(&self.queue).push(MockReply::Error(message.into()));
    }

    /// Number of requests received
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Every request received, oldest first
    pub fn requests(&self) -> Vec<CompletionRequest> {
        lock(&self.requests).clone()
    }

    /// The most recent request, if any
    pub fn last_request(&self) -> Option<CompletionRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Forget recorded requests
    pub fn reset_call_count(&self) {
        lock(&self.requests).clear();
    }

    fn resolve(&self, request: &CompletionRequest) -> MockReply {
        {
            let mut queue = lock(&self.queue);
            if !queue.is_empty() {
                return queue.remove(0);
            }
        }

        let prompt = request.prompt();
        lock(&self.rules)
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.default_reply.clone())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl CompletionProvider for MockProvider {
    type Error = LlmError;

    fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        lock(&self.requests).push(request.clone());

        match self.resolve(request) {
            MockReply::Text(text) => Ok(text),
            MockReply::Error(message) => Err(LlmError::Other(message)),
        }
    }

    fn complete_streaming(
        &self,
        request: &CompletionRequest,
        on_fragment: &mut dyn FnMut(&str),
    ) -> Result<String, Self::Error> {
        let text = self.complete(request)?;
        for fragment in text.split_inclusive(' ') {
            on_fragment(fragment);
        }
        Ok(text)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

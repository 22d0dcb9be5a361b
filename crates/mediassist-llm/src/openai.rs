//! OpenAI-compatible Provider Implementation
//!
//! Talks to any endpoint exposing `POST {base_url}/chat/completions`: OpenAI
//! itself, Together AI and Featherless.
//!
//! # Features
//!
//! - Bearer-token authentication
//! - Provider-specific sampling fields (`top_k`, `repetition_penalty`)
//! - Server-sent-event streaming
//! - Optional retries with exponential backoff
//!
//! # Examples
//!
//! ```no_run
//! use mediassist_llm::OpenAiCompatibleProvider;
//!
//! let provider = OpenAiCompatibleProvider::together(
//!     "meta-llama/Llama-3.2-3B-Instruct-Turbo",
//!     Some("api-key".to_string()),
//! )
//! .unwrap();
//! ```

use crate::http::{build_client, build_runtime, check_status, with_retries};
use crate::sse::{SseDecoder, SseEvent};
use crate::LlmError;
use mediassist_domain::traits::CompletionProvider;
use mediassist_domain::CompletionRequest;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, warn};

/// OpenAI API base URL
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Together AI base URL
pub const TOGETHER_BASE_URL: &str = "https://api.together.xyz/v1";

/// Featherless base URL
pub const FEATHERLESS_BASE_URL: &str = "https://api.featherless.ai/v1";

/// Default timeout for completion requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default number of attempts (no retry)
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// Dialect of the chat-completions API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFlavor {
    /// OpenAI proper; rejects `top_k` and `repetition_penalty`
    OpenAi,
    /// Together AI
    Together,
    /// Featherless
    Featherless,
}

impl ApiFlavor {
    /// Whether the endpoint accepts `top_k` and `repetition_penalty`
    pub fn supports_extended_sampling(&self) -> bool {
        !matches!(self, ApiFlavor::OpenAi)
    }

    /// Default base URL for this flavor
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ApiFlavor::OpenAi => OPENAI_BASE_URL,
            ApiFlavor::Together => TOGETHER_BASE_URL,
            ApiFlavor::Featherless => FEATHERLESS_BASE_URL,
        }
    }
}

/// Provider for OpenAI-compatible chat-completion endpoints
pub struct OpenAiCompatibleProvider {
    base_url: String,
    model: String,
    api_key: Option<String>,
    flavor: ApiFlavor,
    client: reqwest::Client,
    runtime: Runtime,
    max_retries: u32,
}

/// Request body for the chat-completions API
#[derive(Debug, Serialize)]
struct ChatCompletionBody {
    model: String,
    messages: Vec<WireMessage>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    repetition_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

/// Non-streaming response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// One streamed chunk
#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Debug, Default, Deserialize)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiCompatibleProvider {
    /// Create a provider for an arbitrary base URL
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Configuration` if the HTTP client or runtime cannot be built.
    pub fn new(
        flavor: ApiFlavor,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            flavor,
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?,
            runtime: build_runtime()?,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// OpenAI with its default base URL
    pub fn openai(model: impl Into<String>, api_key: Option<String>) -> Result<Self, LlmError> {
        Self::new(ApiFlavor::OpenAi, OPENAI_BASE_URL, model, api_key)
    }

    /// Together AI with its default base URL
    pub fn together(model: impl Into<String>, api_key: Option<String>) -> Result<Self, LlmError> {
        Self::new(ApiFlavor::Together, TOGETHER_BASE_URL, model, api_key)
    }

    /// Featherless with its default base URL
    pub fn featherless(
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, LlmError> {
        Self::new(ApiFlavor::Featherless, FEATHERLESS_BASE_URL, model, api_key)
    }

    /// Set the maximum number of attempts per request
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Replace the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.client = build_client(timeout)?;
        Ok(self)
    }

    /// Configured model
    pub fn model(&self) -> &str {
        &self.model
    }

    fn body(&self, request: &CompletionRequest, stream: bool) -> ChatCompletionBody {
        let sampling = &request.sampling;
        let extended = self.flavor.supports_extended_sampling();

        ChatCompletionBody {
            model: request.model.clone().unwrap_or_else(|| self.model.clone()),
            messages: request
                .messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: m.content.clone(),
                })
                .collect(),
            max_tokens: sampling.max_tokens,
            temperature: sampling.temperature,
            top_p: sampling.top_p,
            top_k: sampling.top_k.filter(|_| extended),
            repetition_penalty: sampling.repetition_penalty.filter(|_| extended),
            stop: sampling.stop.clone(),
            stream,
        }
    }

    async fn post(&self, body: &ChatCompletionBody) -> Result<reqwest::Response, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let mut builder = self.client.post(&url).json(body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        check_status(response, &body.model).await
    }

    /// Generate a completion
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The endpoint cannot be reached
    /// - The key is missing or rejected
    /// - The model is not available
    /// - The response body is not a chat completion
    pub async fn chat(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let body = self.body(request, false);
        debug!("Chat completion: model={}, messages={}", body.model, body.messages.len());

        let response = with_retries(self.max_retries, || self.post(&body)).await?;
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::Communication(format!("Failed to read response: {}", e)))?;

        parse_completion(&text)
    }

    /// Generate a completion, streaming fragments to `on_fragment`
    ///
    /// Only the initial request is retried; once fragments have been delivered
    /// a failure is returned as-is.
    pub async fn chat_stream(
        &self,
        request: &CompletionRequest,
        on_fragment: &mut dyn FnMut(&str),
    ) -> Result<String, LlmError> {
        let body = self.body(request, true);
        let mut response = with_retries(self.max_retries, || self.post(&body)).await?;

        let mut decoder = SseDecoder::new();
        let mut full = String::new();

        loop {
            let chunk = response
                .chunk()
                .await
                .map_err(|e| LlmError::Communication(format!("Stream interrupted: {}", e)))?;

            let events = match &chunk {
                Some(bytes) => decoder.push(bytes),
                None => decoder.finish().into_iter().collect(),
            };

            for event in events {
                match event {
                    SseEvent::Done => return Ok(full),
                    SseEvent::Data(payload) => {
                        if let Some(fragment) = parse_stream_chunk(&payload)? {
                            on_fragment(&fragment);
                            full.push_str(&fragment);
                        }
                    }
                }
            }

            if chunk.is_none() {
                warn!("Stream ended without [DONE] marker");
                return Ok(full);
            }
        }
    }
}

/// Extract the first choice's content from a chat-completions body
fn parse_completion(body: &str) -> Result<String, LlmError> {
    let response: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| LlmError::InvalidResponse("Response contained no choices".to_string()))
}

/// Extract the delta text from one streamed chunk, if it carries any
fn parse_stream_chunk(payload: &str) -> Result<Option<String>, LlmError> {
    let chunk: StreamChunk = serde_json::from_str(payload)
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse stream chunk: {}", e)))?;

    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta.content)
        .filter(|s| !s.is_empty()))
}

impl CompletionProvider for OpenAiCompatibleProvider {
    type Error = LlmError;

    fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        self.runtime.block_on(self.chat(request))
    }

    fn complete_streaming(
        &self,
        request: &CompletionRequest,
        on_fragment: &mut dyn FnMut(&str),
    ) -> Result<String, Self::Error> {
        self.runtime.block_on(self.chat_stream(request, on_fragment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediassist_domain::{ChatMessage, SamplingParams};

    fn sampling() -> SamplingParams {
        SamplingParams {
            max_tokens: 150,
            temperature: 0.7,
            top_p: 0.9,
            top_k: Some(50),
            repetition_penalty: Some(1.0),
            stop: vec!["<|eot_id|>".to_string()],
        }
    }

    #[test]
    fn test_provider_creation() {
        let provider = OpenAiCompatibleProvider::together("llama", None).unwrap();
        assert_eq!(provider.base_url, TOGETHER_BASE_URL);
        assert_eq!(provider.model(), "llama");
        assert_eq!(provider.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let provider =
            OpenAiCompatibleProvider::new(ApiFlavor::OpenAi, "http://localhost:8000/v1/", "m", None)
                .unwrap()
                .with_max_retries(4);
        assert_eq!(provider.base_url, "http://localhost:8000/v1");
        assert_eq!(provider.max_retries, 4);
    }

    #[test]
    fn test_together_body_includes_extended_sampling() {
        let provider = OpenAiCompatibleProvider::together("llama", None).unwrap();
        let request =
            CompletionRequest::new(vec![ChatMessage::system("sys"), ChatMessage::user("hi")])
                .with_sampling(sampling());

        let json = serde_json::to_value(provider.body(&request, false)).unwrap();
        assert_eq!(json["model"], "llama");
        assert_eq!(json["top_k"], 50);
        assert_eq!(json["repetition_penalty"], 1.0);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
        assert_eq!(json["stop"][0], "<|eot_id|>");
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn test_openai_body_omits_extended_sampling() {
        let provider = OpenAiCompatibleProvider::openai("gpt-4o-mini", None).unwrap();
        let request = CompletionRequest::from_prompt("hi")
            .with_sampling(sampling())
            .with_model("gpt-4o");

        let json = serde_json::to_value(provider.body(&request, true)).unwrap();
        assert_eq!(json["model"], "gpt-4o");
        assert!(json.get("top_k").is_none());
        assert!(json.get("repetition_penalty").is_none());
        assert_eq!(json["stream"], true);
    }

    #[test]
    fn test_parse_completion() {
        let body = r#"{"id":"x","choices":[{"index":0,
            "message":{"role":"assistant","content":"What is your name?"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "What is your name?");
    }

    #[test]
    fn test_parse_completion_without_choices() {
        let result = parse_completion(r#"{"choices":[]}"#);
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));

        let result = parse_completion("<html>bad gateway</html>");
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_stream_chunk() {
        let payload = r#"{"choices":[{"index":0,"delta":{"content":"Hel"}}]}"#;
        assert_eq!(parse_stream_chunk(payload).unwrap(), Some("Hel".to_string()));

        let role_only = r#"{"choices":[{"index":0,"delta":{"role":"assistant"}}]}"#;
        assert_eq!(parse_stream_chunk(role_only).unwrap(), None);
    }

    #[test]
    fn test_connection_error() {
        let provider =
            OpenAiCompatibleProvider::new(ApiFlavor::OpenAi, "http://127.0.0.1:9/v1", "m", None)
                .unwrap();

        let result = provider.complete(&CompletionRequest::from_prompt("test"));
        match result {
            Err(LlmError::Communication(_)) => {}
            other => panic!("Expected Communication error, got {:?}", other),
        }
    }
}

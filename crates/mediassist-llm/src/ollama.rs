//! Ollama Provider Implementation
//!
//! Provides integration with a locally served model through Ollama's chat API,
//! keeping patient conversations on the machine.
//!
//! # Features
//!
//! - Async HTTP communication with `/api/chat`
//! - Full sampling control (`top_k`, `repeat_penalty`, `num_predict`)
//! - Newline-delimited JSON streaming
//! - Retry logic with exponential backoff
//!
//! # Examples
//!
//! ```no_run
//! use mediassist_llm::OllamaProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3.1").unwrap();
//! ```

use crate::http::{build_client, build_runtime, check_status, with_retries};
use crate::sse::LineBuffer;
use crate::LlmError;
use mediassist_domain::traits::CompletionProvider;
use mediassist_domain::CompletionRequest;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::debug;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for requests; local models can be slow to load (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of attempts
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// Ollama API provider for local inference
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    runtime: Runtime,
    max_retries: u32,
}

/// Request body for the Ollama chat API
#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    top_p: f32,
    num_predict: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    repeat_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
}

/// Response (or stream line) from the Ollama chat API
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    #[serde(default)]
    message: Option<OllamaMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3.1", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?,
            runtime: build_runtime()?,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Create a new Ollama provider on `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the maximum number of attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Replace the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.client = build_client(timeout)?;
        Ok(self)
    }

    fn body(&self, request: &CompletionRequest, stream: bool) -> OllamaChatRequest {
        let sampling = &request.sampling;
        OllamaChatRequest {
            model: request.model.clone().unwrap_or_else(|| self.model.clone()),
            messages: request
                .messages
                .iter()
                .map(|m| OllamaMessage {
                    role: m.role.as_str().to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            stream,
            options: OllamaOptions {
                temperature: sampling.temperature,
                top_p: sampling.top_p,
                num_predict: sampling.max_tokens,
                top_k: sampling.top_k,
                repeat_penalty: sampling.repetition_penalty,
                stop: sampling.stop.clone(),
            },
        }
    }

    async fn post(&self, body: &OllamaChatRequest) -> Result<reqwest::Response, LlmError> {
        let url = format!("{}/api/chat", self.endpoint);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        check_status(response, &body.model).await
    }

    /// Generate a chat completion
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ollama is not running
    /// - Model is not available
    /// - Network communication fails
    /// - Response format is invalid
    pub async fn chat(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let body = self.body(request, false);
        debug!("Ollama chat: model={}, messages={}", body.model, body.messages.len());

        let response = with_retries(self.max_retries, || self.post(&body)).await?;
        let parsed = response
            .json::<OllamaChatResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        parse_line_payload(parsed)?
            .ok_or_else(|| LlmError::InvalidResponse("Response contained no message".to_string()))
    }

    /// Generate a chat completion, streaming fragments to `on_fragment`
    pub async fn chat_stream(
        &self,
        request: &CompletionRequest,
        on_fragment: &mut dyn FnMut(&str),
    ) -> Result<String, LlmError> {
        let body = self.body(request, true);
        let mut response = with_retries(self.max_retries, || self.post(&body)).await?;

        let mut lines = LineBuffer::new();
        let mut full = String::new();

        loop {
            let chunk = response
                .chunk()
                .await
                .map_err(|e| LlmError::Communication(format!("Stream interrupted: {}", e)))?;

            let batch = match &chunk {
                Some(bytes) => lines.push(bytes),
                None => lines.finish().into_iter().collect(),
            };

            for line in batch.iter().filter(|l| !l.trim().is_empty()) {
                let parsed: OllamaChatResponse = serde_json::from_str(line).map_err(|e| {
                    LlmError::InvalidResponse(format!("Failed to parse stream line: {}", e))
                })?;
                let done = parsed.done;
                if let Some(fragment) = parse_line_payload(parsed)? {
                    if !fragment.is_empty() {
                        on_fragment(&fragment);
                        full.push_str(&fragment);
                    }
                }
                if done {
                    return Ok(full);
                }
            }

            if chunk.is_none() {
                return Ok(full);
            }
        }
    }
}

fn parse_line_payload(response: OllamaChatResponse) -> Result<Option<String>, LlmError> {
    if let Some(error) = response.error {
        return Err(LlmError::Other(error));
    }
    Ok(response.message.map(|m| m.content))
}

impl CompletionProvider for OllamaProvider {
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
    use mediassist_domain::SamplingParams;

    #[test]
    fn test_ollama_provider_creation() {
        let provider = OllamaProvider::new("http://localhost:11434/", "llama3.1").unwrap();
        assert_eq!(provider.endpoint, "http://localhost:11434");
        assert_eq!(provider.model, "llama3.1");
        assert_eq!(provider.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn test_ollama_provider_default_endpoint() {
        let provider = OllamaProvider::default_endpoint("mistral").unwrap().with_max_retries(3);
        assert_eq!(provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(provider.max_retries, 3);
    }

    #[test]
    fn test_body_maps_sampling_to_options() {
        let provider = OllamaProvider::default_endpoint("llama3.1").unwrap();
        let request = CompletionRequest::from_prompt("hi").with_sampling(SamplingParams {
            max_tokens: 150,
            temperature: 0.7,
            top_p: 0.9,
            top_k: Some(50),
            repetition_penalty: None,
            stop: Vec::new(),
        });

        let json = serde_json::to_value(provider.body(&request, false)).unwrap();
        assert_eq!(json["options"]["num_predict"], 150);
        assert_eq!(json["options"]["top_k"], 50);
        assert!(json["options"].get("repeat_penalty").is_none());
        assert!(json["options"].get("stop").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_parse_error_payload() {
        let parsed: OllamaChatResponse =
            serde_json::from_str(r#"{"error":"model 'x' not found"}"#).unwrap();
        assert!(matches!(parse_line_payload(parsed), Err(LlmError::Other(_))));
    }

    #[test]
    fn test_ollama_error_handling() {
        // Nothing listens on the discard port
        let provider = OllamaProvider::new("http://127.0.0.1:9", "llama3.1").unwrap();

        let result = provider.complete(&CompletionRequest::from_prompt("test"));
        match result {
            Err(LlmError::Communication(_)) => {}
            other => panic!("Expected Communication error, got {:?}", other),
        }
    }

    #[test]
    #[ignore] // Only run when Ollama is available
    fn test_ollama_chat_integration() {
        let provider = OllamaProvider::default_endpoint("llama3.1").unwrap();
        let result =
            provider.complete(&CompletionRequest::from_prompt("Say 'hello' and nothing else"));
        if let Ok(response) = result {
            assert!(!response.is_empty());
        }
    }
}

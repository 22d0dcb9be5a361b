//! Completion provider construction from a profile.

use crate::config::{Profile, ProviderKind};
use crate::error::Result;
use mediassist_domain::traits::CompletionProvider;
use mediassist_llm::{ApiFlavor, LlmError, OllamaProvider, OpenAiCompatibleProvider};
use std::time::Duration;
use tracing::debug;

/// Completion provider selected at runtime.
pub type DynProvider = Box<dyn CompletionProvider<Error = LlmError>>;

/// Build the provider described by `profile`.
///
/// Hosted providers read their API key from the environment; a missing key
/// is reported before any request is made.
pub fn build_provider(profile: &Profile) -> Result<DynProvider> {
    let timeout = Duration::from_secs(profile.timeout_secs);
    debug!(
        "Using {} provider with model {}",
        profile.provider.as_str(),
        profile.model
    );

    let provider: DynProvider = match profile.provider {
        ProviderKind::Ollama => {
            let endpoint = profile
                .base_url
                .clone()
                .unwrap_or_else(|| mediassist_llm::ollama::DEFAULT_ENDPOINT.to_string());
            Box::new(OllamaProvider::new(endpoint, &profile.model)?.with_timeout(timeout)?)
        }
        kind => {
            let flavor = match kind {
                ProviderKind::OpenAi => ApiFlavor::OpenAi,
                ProviderKind::Featherless => ApiFlavor::Featherless,
                _ => ApiFlavor::Together,
            };
            let base_url = profile
                .base_url
                .clone()
                .unwrap_or_else(|| flavor.default_base_url().to_string());
            let api_key = profile.api_key()?;
            Box::new(
                OpenAiCompatibleProvider::new(flavor, base_url, &profile.model, api_key)?
                    .with_timeout(timeout)?,
            )
        }
    };

    Ok(provider)
}

//! Shared HTTP plumbing for the network providers

use crate::LlmError;
use std::future::Future;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, warn};

/// Build a reqwest client with the given request timeout
pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Configuration(format!("Failed to build HTTP client: {}", e)))
}

/// Build the runtime a provider blocks on for its synchronous trait methods
pub(crate) fn build_runtime() -> Result<Runtime, LlmError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| LlmError::Configuration(format!("Failed to build async runtime: {}", e)))
}

/// Turn a response into an error if its status is not a success
pub(crate) async fn check_status(
    response: reqwest::Response,
    model: &str,
) -> Result<reqwest::Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    Err(match status {
        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
            LlmError::Unauthorized(format!("HTTP {}: {}", status, body))
        }
        reqwest::StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(model.to_string()),
        reqwest::StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
        _ => LlmError::Communication(format!("HTTP {}: {}", status, body)),
    })
}

/// Longest wait between two attempts
pub(crate) const MAX_BACKOFF_SECS: u64 = 60;

/// Delay before the attempt following attempt number `attempt` (1-based)
///
/// Doubles from one second and is capped at [`MAX_BACKOFF_SECS`].
pub(crate) fn backoff_delay(attempt: u32) -> Duration {
    let secs = 2u64
        .checked_pow(attempt.saturating_sub(1))
        .map_or(MAX_BACKOFF_SECS, |secs| secs.min(MAX_BACKOFF_SECS));
    Duration::from_secs(secs)
}

/// Run `attempt` up to `max_attempts` times with exponential backoff
///
/// Only retryable errors trigger another attempt.
pub(crate) async fn with_retries<T, F, Fut>(
    max_attempts: u32,
    mut attempt: F,
) -> Result<T, LlmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempts = 0;

    loop {
        attempts += 1;
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempts < max_attempts => {
                let delay = backoff_delay(attempts);
                warn!(
                    "Attempt {}/{} failed: {}; retrying in {:?}",
                    attempts, max_attempts, e, delay
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                debug!("Giving up after {} attempt(s): {}", attempts, e);
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_backoff_doubles_then_caps() {
        assert_eq!(backoff_delay(1), Duration::from_secs(1));
        assert_eq!(backoff_delay(3), Duration::from_secs(4));
        assert_eq!(backoff_delay(7), Duration::from_secs(MAX_BACKOFF_SECS));
        assert_eq!(backoff_delay(65), Duration::from_secs(MAX_BACKOFF_SECS));
        assert_eq!(backoff_delay(u32::MAX), Duration::from_secs(MAX_BACKOFF_SECS));
    }

    #[tokio::test]
    async fn test_non_retryable_error_stops_immediately() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retries(3, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(LlmError::Unauthorized("bad key".into()))
        })
        .await;

        assert!(matches!(result, Err(LlmError::Unauthorized(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_single_attempt_does_not_retry() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retries(1, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(LlmError::Communication("refused".into()))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_retries(3, || async {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                Err(LlmError::RateLimitExceeded)
            } else {
                Ok("done")
            }
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}

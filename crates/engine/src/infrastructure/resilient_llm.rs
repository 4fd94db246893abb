//! Resilient LLM client wrapper with exponential backoff retry
//!
//! Wraps any LlmPort implementation with retry logic to handle transient failures
//! (dropped connections, rate limiting, overloaded upstream).

use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

use crate::infrastructure::ports::{LlmError, LlmPort, LlmRequest, LlmResponse};

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (0 = no retries, just the initial attempt)
    pub max_retries: u32,
    /// Base delay in milliseconds before first retry
    pub base_delay_ms: u64,
    /// Maximum delay in milliseconds (caps exponential growth)
    pub max_delay_ms: u64,
    /// Jitter factor (0.0-1.0) for randomizing delays
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 1000,
            max_delay_ms: 8000,
            jitter_factor: 0.2,
        }
    }
}

/// Wrapper that adds retry logic to any LLM client
pub struct ResilientLlmClient {
    inner: Arc<dyn LlmPort>,
    config: RetryConfig,
}

impl ResilientLlmClient {
    /// Create a new resilient wrapper around an existing LLM client
    pub fn new(inner: Arc<dyn LlmPort>, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    /// Calculate delay for a given attempt number using exponential backoff with jitter
    fn calculate_delay(&self, attempt: u32) -> u64 {
        let base = self.config.base_delay_ms;
        // Exponential: base * 2^(attempt-1)
        let exponential = base.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
        let capped = exponential.min(self.config.max_delay_ms);

        let jitter_range = (capped as f64 * self.config.jitter_factor) as i64;
        if jitter_range > 0 {
            let jitter = rand::thread_rng().gen_range(-jitter_range..=jitter_range);
            (capped as i64 + jitter).max(0) as u64
        } else {
            capped
        }
    }

    /// Determine if an error is retryable
    fn is_retryable(error: &LlmError) -> bool {
        match error {
            // Retrying cannot conjure a key
            LlmError::MissingCredential => false,
            LlmError::RequestFailed(_) | LlmError::Timeout(_) => true,
            // Rate limits and server-side trouble are transient; other client errors are not
            LlmError::Status { status, .. } => *status == 429 || *status >= 500,
            // Malformed body can be a truncated transfer
            LlmError::InvalidResponse(_) => true,
        }
    }
}

#[async_trait]
impl LlmPort for ResilientLlmClient {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match self.inner.generate(request.clone()).await {
                Ok(response) => {
                    if attempt > 0 {
                        tracing::info!(attempt = attempt + 1, "LLM request succeeded after retry");
                    }
                    return Ok(response);
                }
                Err(e) => {
                    let is_retryable = Self::is_retryable(&e);

                    if attempt < self.config.max_retries && is_retryable {
                        let delay = self.calculate_delay(attempt + 1);
                        tracing::warn!(
                            attempt = attempt + 1,
                            max_retries = self.config.max_retries,
                            delay_ms = delay,
                            error = %e,
                            "LLM request failed, retrying..."
                        );
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                    } else if !is_retryable {
                        tracing::error!(error = %e, "LLM request failed with non-retryable error");
                        return Err(e);
                    }

                    last_error = Some(e);
                }
            }
        }

        let error =
            last_error.unwrap_or_else(|| LlmError::RequestFailed("Unknown error".to_string()));
        tracing::error!(
            attempts = self.config.max_retries + 1,
            error = %error,
            "LLM request failed after all retry attempts"
        );
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Mock LLM that fails a configurable number of times before succeeding
    struct FailingMockLlm {
        failures_remaining: AtomicU32,
        calls: AtomicU32,
        error_type: LlmError,
    }

    impl FailingMockLlm {
        fn new(failure_count: u32, error: LlmError) -> Self {
            Self {
                failures_remaining: AtomicU32::new(failure_count),
                calls: AtomicU32::new(0),
                error_type: error,
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmPort for FailingMockLlm {
        async fn generate(&self, _request: LlmRequest) -> Result<LlmResponse, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let remaining = self.failures_remaining.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
                Err(self.error_type.clone())
            } else {
                Ok(LlmResponse::text("Success!"))
            }
        }
    }

    fn fast_config(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            base_delay_ms: 1, // Fast for tests
            max_delay_ms: 10,
            jitter_factor: 0.0,
        }
    }

    #[tokio::test]
    async fn test_succeeds_without_retry() {
        let mock = Arc::new(FailingMockLlm::new(0, LlmError::RequestFailed("test".into())));
        let client = ResilientLlmClient::new(mock, RetryConfig::default());

        let result = client.generate(LlmRequest::new(vec![])).await;

        assert_eq!(result.unwrap().content, "Success!");
    }

    #[tokio::test]
    async fn test_succeeds_after_retry() {
        let mock = Arc::new(FailingMockLlm::new(2, LlmError::Timeout(90)));
        let client = ResilientLlmClient::new(mock.clone(), fast_config(3));

        let result = client.generate(LlmRequest::new(vec![])).await;

        assert!(result.is_ok());
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn test_fails_after_max_retries() {
        let mock = Arc::new(FailingMockLlm::new(10, LlmError::RequestFailed("persistent".into())));
        let client = ResilientLlmClient::new(mock.clone(), fast_config(2));

        let result = client.generate(LlmRequest::new(vec![])).await;

        assert!(result.is_err());
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn test_no_retry_on_auth_error() {
        let mock = Arc::new(FailingMockLlm::new(
            10,
            LlmError::Status {
                status: 401,
                message: "invalid x-api-key".into(),
            },
        ));
        let client = ResilientLlmClient::new(mock.clone(), fast_config(3));

        let result = client.generate(LlmRequest::new(vec![])).await;

        assert!(result.is_err());
        assert_eq!(mock.calls(), 1, "Auth error should not retry");
    }

    #[tokio::test]
    async fn test_no_retry_without_credential() {
        let mock = Arc::new(FailingMockLlm::new(10, LlmError::MissingCredential));
        let client = ResilientLlmClient::new(mock.clone(), fast_config(3));

        let result = client.generate(LlmRequest::new(vec![])).await;

        assert!(matches!(result, Err(LlmError::MissingCredential)));
        assert_eq!(mock.calls(), 1);
    }

    #[test]
    fn test_retryable_statuses() {
        let status = |status| LlmError::Status {
            status,
            message: String::new(),
        };
        assert!(ResilientLlmClient::is_retryable(&status(429)));
        assert!(ResilientLlmClient::is_retryable(&status(529)));
        assert!(!ResilientLlmClient::is_retryable(&status(400)));
        assert!(!ResilientLlmClient::is_retryable(&status(403)));
    }

    #[test]
    fn test_exponential_backoff() {
        let config = RetryConfig {
            max_retries: 5,
            base_delay_ms: 1000,
            max_delay_ms: 8000,
            jitter_factor: 0.0, // No jitter for predictable test
        };
        let client = ResilientLlmClient::new(
            Arc::new(FailingMockLlm::new(0, LlmError::RequestFailed("".into()))),
            config,
        );

        assert_eq!(client.calculate_delay(1), 1000);
        assert_eq!(client.calculate_delay(2), 2000);
        assert_eq!(client.calculate_delay(3), 4000);
        assert_eq!(client.calculate_delay(4), 8000);
        // 16000 capped at 8000
        assert_eq!(client.calculate_delay(5), 8000);
    }
}

//! Bounded retry with exponential backoff for transient backend failures

use super::{LlmError, LlmRequest, LlmResponse, LlmService};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Backoff schedule for retryable errors
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Delay before `attempt` (2-based: the first retry is attempt 2).
    /// 1x, 2x, 4x the base delay, capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(2).min(16);
        self.base_delay
            .saturating_mul(1 << exponent)
            .min(self.max_delay)
    }
}

/// Wraps a service and retries retryable errors per `RetryPolicy`
pub struct RetryingService {
    inner: Arc<dyn LlmService>,
    policy: RetryPolicy,
}

impl RetryingService {
    pub fn new(inner: Arc<dyn LlmService>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl LlmService for RetryingService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let mut attempt = 1;
        loop {
            match self.inner.complete(request).await {
                Ok(response) => return Ok(response),
                Err(e) if e.kind.is_retryable() && attempt < self.policy.max_attempts => {
                    attempt += 1;
                    let delay = e
                        .retry_after
                        .map_or_else(|| self.policy.delay_for(attempt), |d| d.min(self.policy.max_delay));
                    tracing::warn!(
                        model = %self.inner.model_id(),
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        delay_ms = %delay.as_millis(),
                        error = %e.message,
                        "Retrying model backend request"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) if e.kind.is_retryable() => {
                    return Err(LlmError::new(
                        e.kind,
                        format!("Failed after {attempt} attempts: {}", e.message),
                    ));
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }
}

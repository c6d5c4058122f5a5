//! Bounded exponential backoff for outbound calls.
//!
//! Upstream 4xx responses are never retried (the caller's input or our
//! credentials are wrong and won't improve). Connect failures, timeouts and
//! 5xx responses get a short, capped retry.

use std::time::Duration;

use crate::error::AppError;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Delay before the retry following attempt `attempt` (1-indexed).
    fn delay_after(&self, attempt: u32) -> Duration {
        let exp = self.base_delay.saturating_mul(1u32 << (attempt - 1).min(16));
        exp.min(self.max_delay)
    }

    fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

/// Send a request built by `build`, retrying per `policy`. The builder
/// closure is invoked once per attempt since a `RequestBuilder` is consumed
/// by `send`.
pub async fn send_with_retry(
    policy: &RetryPolicy,
    service: &'static str,
    build: impl Fn() -> reqwest::RequestBuilder,
) -> Result<reqwest::Response, AppError> {
    let mut attempt = 1;
    loop {
        match build().send().await {
            Ok(response) if response.status().is_server_error() && policy.should_retry(attempt) => {
                tracing::warn!(service, attempt, status = %response.status(), "Upstream 5xx, retrying");
            }
            Ok(response) => return Ok(response),
            Err(err) if (err.is_connect() || err.is_timeout()) && policy.should_retry(attempt) => {
                tracing::warn!(service, attempt, error = %err, "Upstream request failed, retrying");
            }
            Err(err) => {
                return Err(AppError::Upstream {
                    service,
                    status: None,
                    message: err.to_string(),
                });
            }
        }

        tokio::time::sleep(policy.delay_after(attempt)).await;
        attempt += 1;
    }
}

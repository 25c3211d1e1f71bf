use std::time::Duration;

use crate::application::ports::{GenerationClient, GenerationError};

/// Retry budget for generation calls. Only transient network failures are
/// retried; credential, quota and content failures short-circuit.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            attempt_timeout: Duration::from_secs(30),
        }
    }
}

pub async fn generate_with_retry<G>(
    client: &G,
    prompt: &str,
    policy: &RetryPolicy,
) -> Result<String, GenerationError>
where
    G: GenerationClient + ?Sized,
{
    let mut last_error = GenerationError::TransientNetwork("no attempts made".to_string());

    for attempt in 0..policy.max_attempts {
        if attempt > 0 {
            let delay = policy.initial_backoff * 2u32.pow(attempt - 1);
            tracing::warn!(
                attempt,
                delay_ms = delay.as_millis() as u64,
                "retrying generation after transient failure"
            );
            tokio::time::sleep(delay).await;
        }

        match tokio::time::timeout(policy.attempt_timeout, client.generate(prompt)).await {
            Ok(Ok(text)) => return Ok(text),
            Ok(Err(err)) if err.is_retryable() => last_error = err,
            Ok(Err(err)) => return Err(err),
            Err(_) => {
                last_error = GenerationError::TransientNetwork(format!(
                    "attempt timed out after {}s",
                    policy.attempt_timeout.as_secs()
                ));
            }
        }
    }

    Err(last_error)
}

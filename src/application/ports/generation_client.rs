use async_trait::async_trait;

#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum GenerationError {
    #[error("transient network failure: {0}")]
    TransientNetwork(String),
    #[error("invalid api credentials")]
    AuthInvalid,
    #[error("quota exceeded")]
    QuotaExceeded,
    #[error("content blocked by provider")]
    ContentBlocked,
}

impl GenerationError {
    /// Only transient network failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GenerationError::TransientNetwork(_))
    }
}

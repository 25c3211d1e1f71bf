use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::{GenerationClient, GenerationError};

/// Test double that replays queued outcomes and records every prompt it
/// received. Once the queue drains it keeps returning the last reply.
pub struct MockGenerationClient {
    outcomes: Mutex<Vec<Result<String, GenerationError>>>,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerationClient {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self::with_outcomes(vec![Ok(reply.into())])
    }

    pub fn failing(error: GenerationError) -> Self {
        Self::with_outcomes(vec![Err(error)])
    }

    pub fn with_outcomes(outcomes: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or_default()
    }
}

#[async_trait]
impl GenerationClient for MockGenerationClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let mut outcomes = self
            .outcomes
            .lock()
            .map_err(|_| GenerationError::TransientNetwork("mock lock poisoned".to_string()))?;
        if outcomes.len() > 1 {
            return outcomes.remove(0);
        }
        outcomes
            .first()
            .cloned()
            .unwrap_or_else(|| Ok("mock reply".to_string()))
    }
}

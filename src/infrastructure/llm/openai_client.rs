use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::ports::{GenerationClient, GenerationError};
use crate::infrastructure::observability::sanitize_prompt;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    chat_model: String,
    max_tokens: usize,
    temperature: f32,
}

impl OpenAiClient {
    pub fn new(api_key: String, chat_model: String, max_tokens: usize, temperature: f32) -> Self {
        Self::with_base_url(
            DEFAULT_BASE_URL.to_string(),
            api_key,
            chat_model,
            max_tokens,
            temperature,
        )
    }

    pub fn with_base_url(
        base_url: String,
        api_key: String,
        chat_model: String,
        max_tokens: usize,
        temperature: f32,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
            chat_model,
            max_tokens,
            temperature,
        }
    }

    /// Maps provider failures onto the four classes the services act on.
    /// Rate limiting is transient; an exhausted quota is not.
    fn classify_status(status: reqwest::StatusCode, body: &str) -> GenerationError {
        match status.as_u16() {
            401 | 403 => GenerationError::AuthInvalid,
            429 if body.contains("insufficient_quota") => GenerationError::QuotaExceeded,
            429 => GenerationError::TransientNetwork(format!("rate limited: {body}")),
            400 if body.contains("content_filter") || body.contains("content_policy") => {
                GenerationError::ContentBlocked
            }
            _ => GenerationError::TransientNetwork(format!("api error {status}: {body}")),
        }
    }
}

#[async_trait]
impl GenerationClient for OpenAiClient {
    #[instrument(skip(self, prompt), fields(model = %self.chat_model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        debug!(prompt = %sanitize_prompt(prompt), "requesting completion");

        let request = ChatCompletionRequest {
            model: self.chat_model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| GenerationError::TransientNetwork(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::classify_status(status, &body));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| GenerationError::TransientNetwork(err.to_string()))?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                GenerationError::TransientNetwork("empty completion response".to_string())
            })?;

        debug!(reply_len = text.len(), "completion received");
        Ok(text)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    max_tokens: usize,
    temperature: f32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

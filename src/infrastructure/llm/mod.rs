mod mock_generation_client;
mod openai_client;

pub use mock_generation_client::MockGenerationClient;
pub use openai_client::OpenAiClient;

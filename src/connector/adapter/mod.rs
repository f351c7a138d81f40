pub mod anthropic_client;
pub mod gemini_client;
pub mod http_tutor_client;
mod mock_model_gateway;

pub use anthropic_client::AnthropicClient;
pub use gemini_client::GeminiClient;
pub use http_tutor_client::{HttpTutorClient, DEFAULT_SERVER_URL};
pub use mock_model_gateway::*;

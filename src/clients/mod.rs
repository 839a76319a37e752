pub mod ai_gateway;
pub mod llm_client;

pub use ai_gateway::{AiGateway, PromptPart};
pub use llm_client::LlmClient;

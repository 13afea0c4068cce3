use crate::conversation::Message;
use crate::core::error::ChatError;
use async_trait::async_trait;

pub mod openai;

pub use openai::OpenAiClient;

/// Capability of calling the remote model. The session drives this once per
/// user turn; no streaming, one in-flight request at a time.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn send(&self, messages: &[Message]) -> Result<String, ChatError>;
}

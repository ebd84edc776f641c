//! The chat-completion model abstraction.

use async_trait::async_trait;

use crate::error::Result;
use crate::message::ChatMessage;

/// A chat-completion model: an ordered message list in, one assistant reply out.
///
/// Implementations must not mutate or reorder `messages`; the caller owns the
/// conversation history.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Name of the underlying model, e.g. `gpt-4.1-nano`.
    fn name(&self) -> &str;

    /// Produce the assistant reply to `messages`.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

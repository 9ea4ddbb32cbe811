//! Chat-model abstraction.
//!
//! [`ChatProvider`] covers the two call shapes the pipeline needs: a
//! buffered completion for JSON-mode prompts and an event stream for the
//! final answer. [`openai::OpenAiChat`] is the production implementation.

pub mod events;
pub mod message;
pub mod openai;
pub mod sse;
pub mod types;

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;

use crate::error::RagError;
use events::LlmEvent;
use message::Message;
use types::RequestOptions;

/// A boxed stream of normalized LLM events.
pub type LlmEventStream = Pin<Box<dyn Stream<Item = LlmEvent> + Send>>;

/// Trait for chat-completion backends.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider name used in logs (e.g. `"openai"`).
    fn name(&self) -> &str;

    /// Send `messages` and wait for the whole reply.
    async fn complete(
        &self,
        messages: &[Message],
        options: &RequestOptions,
    ) -> Result<String, RagError>;

    /// Send `messages` and return the reply as a finite event stream.
    ///
    /// HTTP-level failures are returned as `Err`; failures after the stream
    /// has started arrive as [`LlmEvent::StreamError`].
    async fn stream(
        &self,
        messages: &[Message],
        options: &RequestOptions,
    ) -> Result<LlmEventStream, RagError>;
}

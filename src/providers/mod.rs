//! Provider module
//!
//! Defines the Provider trait and the OpenRouter implementation

pub mod openrouter;
pub mod sse;

use crate::models::openai::{OpenAIRequest, OpenAIResponse, OpenAIStreamResponse};
use crate::utils::error::ClientResult;
use async_trait::async_trait;
use std::pin::Pin;
use tokio_stream::Stream;

/// A boxed stream of streaming responses
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = ClientResult<T>> + Send + 'a>>;

/// Completion API used by the demo runner
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Check that the provider's web root answers with a success status
    async fn probe(&self) -> ClientResult<()>;

    /// Send a chat completion request (non-streaming)
    async fn chat_complete(&self, request: OpenAIRequest) -> ClientResult<OpenAIResponse>;

    /// Send a chat completion request (streaming)
    async fn chat_stream(
        &self,
        request: OpenAIRequest,
    ) -> ClientResult<BoxStream<'static, OpenAIStreamResponse>>;
}

pub use openrouter::OpenRouterProvider;

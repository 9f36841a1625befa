//! LlmProvider trait definition.
//!
//! This is the core abstraction that all LLM providers implement. Every
//! turn streams, so `stream` is the only request method; it returns a
//! `Pin<Box<dyn Stream>>` to stay object-safe for the BoxLlmProvider wrapper.

use std::pin::Pin;

use futures_util::Stream;

use devdesk_types::llm::{CompletionRequest, LlmError, ProviderCapabilities, StreamEvent};

/// Boxed stream of provider events.
pub type LlmEventStream =
    Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>;

/// Trait for LLM provider backends (OpenAI-compatible endpoints, test stubs).
///
/// Implementations live in devdesk-infra (e.g., `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini", "openai").
    fn name(&self) -> &str;

    /// What this provider supports (streaming, tool calling, etc.).
    fn capabilities(&self) -> &ProviderCapabilities;

    /// Send a streaming completion request. Returns a stream of events.
    ///
    /// Connection failures surface as the first item of the stream.
    fn stream(&self, request: CompletionRequest) -> LlmEventStream;
}

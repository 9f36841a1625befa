//! LLM provider abstractions for devdesk.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: Object-safe wrapper for dynamic dispatch
//! - `InstrumentedStream`: keeps a tracing span entered while a stream is polled

pub mod box_provider;
pub mod instrumented;
pub mod provider;

//! Infrastructure layer for devdesk.
//!
//! Contains the concrete `LlmProvider` implementation for OpenAI-compatible
//! chat completion endpoints, API key resolution from the environment, and
//! the `devdesk.toml` / routing file loaders.

pub mod config;
pub mod llm;
pub mod secret;

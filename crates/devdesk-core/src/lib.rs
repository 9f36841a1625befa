//! Business logic for devdesk.
//!
//! This crate defines the "ports" the infrastructure layer implements
//! (`LlmProvider`) and the in-process machinery built on them: the session
//! store, the turn controller, the handoff-aware agent runner, and the chat
//! service that UI layers drive. It depends only on `devdesk-types` -- never
//! on `devdesk-infra` or any network crate.

pub mod agent;
pub mod chat;
pub mod completion;
pub mod llm;
pub mod session;
pub mod turn;

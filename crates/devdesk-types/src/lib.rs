//! Shared domain types for devdesk.
//!
//! This crate contains the core domain types used across the workspace:
//! chat sessions and messages, routing configuration for the agent
//! handoff graph, LLM request/stream shapes, UI events, and error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod agent;
pub mod chat;
pub mod config;
pub mod error;
pub mod event;
pub mod llm;

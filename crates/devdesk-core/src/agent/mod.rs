//! Agent routing for devdesk.
//!
//! - `defaults`: the built-in three-agent web development routing graph
//! - `prompt`: system prompt and handoff tool assembly per agent
//! - `runner`: `HandoffRunner`, the provider-backed `CompletionService`

pub mod defaults;
pub mod prompt;
pub mod runner;

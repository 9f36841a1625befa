//! UI-facing chat surface.
//!
//! `ChatService` is what a front-end drives: it starts sessions (with a
//! greeting), forwards user messages to the turn controller, and ends
//! sessions when the UI goes away.

pub mod service;

pub use service::ChatService;

//! One conversational turn, from user message to committed reply.

pub mod controller;
pub mod sink;

pub use controller::TurnController;
pub use sink::UiSink;

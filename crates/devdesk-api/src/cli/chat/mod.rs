//! Interactive terminal chat.
//!
//! Drives the same `ChatService` the WebSocket endpoint uses: streamed
//! fragments are printed as they arrive, with a spinner while the model
//! thinks and slash commands for in-chat controls. Entry point:
//! `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;

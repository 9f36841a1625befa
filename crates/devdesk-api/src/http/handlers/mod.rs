//! HTTP request handlers.

pub mod agents;
pub mod session;
pub mod ws;

//! HTTP/WebSocket server for the devdesk chat.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;

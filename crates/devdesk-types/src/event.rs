//! Outward UI events.
//!
//! `UiEvent` is what a chat front-end renders: one session's greeting,
//! placeholders, streamed fragments and turn outcomes, in emission order.

use serde::{Deserialize, Serialize};

use crate::chat::{ChatRole, SessionId};

/// Events emitted to the user interface during a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    /// A session was created for this connection.
    SessionStarted { session_id: SessionId },

    /// A complete message bubble. An empty assistant message is the
    /// placeholder that subsequent fragments append to.
    Message { role: ChatRole, content: String },

    /// Incremental text for the current assistant placeholder.
    StreamFragment { text: String },

    /// The agent producing the reply changed.
    AgentChanged { agent: String },

    /// The turn finished; `content` is what was committed to history.
    TurnComplete { content: String },

    /// The turn failed; nothing was committed for the assistant.
    TurnError { reason: String },
}

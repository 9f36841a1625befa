//! In-memory session store backed by `DashMap`.
//!
//! Each entry holds one linear history plus the per-session primitives the
//! turn controller needs: a turn lock that serializes turns, and a
//! cancellation token fired when the session ends.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use devdesk_types::chat::{ChatMessage, History, SessionId, SessionSummary};
use devdesk_types::error::SessionError;

struct SessionEntry {
    history: History,
    started_at: DateTime<Utc>,
    turn_lock: Arc<Mutex<()>>,
    cancel: CancellationToken,
}

/// Per-session handles a turn holds for its whole duration.
#[derive(Debug, Clone)]
pub struct TurnHandle {
    /// Held for the duration of a turn; at most one turn runs per session.
    pub turn_lock: Arc<Mutex<()>>,
    /// Cancelled when the session ends.
    pub cancel: CancellationToken,
}

/// Map from session id to that session's history.
///
/// Distinct sessions never contend beyond the `DashMap` shard locks, and no
/// shard lock is ever held across an await point.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<SessionId, SessionEntry>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new session with an empty history.
    pub fn start_session(&self) -> SessionId {
        let id = SessionId::new();
        self.sessions.insert(
            id,
            SessionEntry {
                history: History::new(),
                started_at: Utc::now(),
                turn_lock: Arc::new(Mutex::new(())),
                cancel: CancellationToken::new(),
            },
        );
        info!(session_id = %id, "Session started");
        id
    }

    /// Snapshot of the session's history.
    pub fn get_history(&self, id: SessionId) -> Result<History, SessionError> {
        self.sessions
            .get(&id)
            .map(|entry| entry.history.clone())
            .ok_or(SessionError::NotFound(id))
    }

    /// Append one message to the end of the session's history.
    pub fn append(&self, id: SessionId, message: ChatMessage) -> Result<(), SessionError> {
        let mut entry = self
            .sessions
            .get_mut(&id)
            .ok_or(SessionError::NotFound(id))?;
        debug!(session_id = %id, role = %message.role, len = message.content.len(), "Appending message");
        entry.history.push(message);
        Ok(())
    }

    /// Remove the session and cancel any turn still running on it.
    ///
    /// Returns `false` if the session did not exist.
    /// The token is cancelled before the entry disappears, so a turn that
    /// finds its session gone always sees the cancellation.
    pub fn end_session(&self, id: SessionId) -> bool {
        let removed = self.sessions.remove_if(&id, |_, entry| {
            entry.cancel.cancel();
            true
        });
        match removed {
            Some((_, entry)) => {
                info!(
                    session_id = %id,
                    messages = entry.history.len(),
                    "Session ended"
                );
                true
            }
            None => false,
        }
    }

    /// Turn lock and cancellation token for the session.
    pub fn turn_handle(&self, id: SessionId) -> Result<TurnHandle, SessionError> {
        self.sessions
            .get(&id)
            .map(|entry| TurnHandle {
                turn_lock: Arc::clone(&entry.turn_lock),
                cancel: entry.cancel.clone(),
            })
            .ok_or(SessionError::NotFound(id))
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Summaries of all live sessions, oldest first.
    pub fn list_sessions(&self) -> Vec<SessionSummary> {
        let mut summaries: Vec<SessionSummary> = self
            .sessions
            .iter()
            .map(|entry| SessionSummary {
                id: *entry.key(),
                started_at: entry.started_at,
                message_count: entry.history.len(),
            })
            .collect();
        summaries.sort_by_key(|s| (s.started_at, s.id.0));
        summaries
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("sessions", &self.sessions.len())
            .finish()
    }
}

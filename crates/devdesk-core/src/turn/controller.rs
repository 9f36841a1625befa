//! Turn controller.
//!
//! A turn appends the user message, shows an empty assistant placeholder,
//! streams the completion service's text deltas into it, and finally commits
//! the assembled reply. The assistant message is only ever appended after
//! the last fragment has been relayed. A failed or cancelled turn commits
//! nothing for the assistant and leaves the session usable.

use std::sync::Arc;

use tracing::{Instrument, debug, info, info_span, warn};

use devdesk_types::agent::{RoutingConfig, RunEvent};
use devdesk_types::chat::{ChatMessage, ChatRole, SessionId};
use devdesk_types::error::{SessionError, TurnError};
use devdesk_types::event::UiEvent;

use crate::completion::CompletionService;
use crate::session::{SessionStore, TurnHandle};

use super::sink::UiSink;

/// Runs turns against a shared session store and completion service.
pub struct TurnController {
    store: Arc<SessionStore>,
    service: Arc<dyn CompletionService>,
    routing: Arc<RoutingConfig>,
}

impl TurnController {
    pub fn new(
        store: Arc<SessionStore>,
        service: Arc<dyn CompletionService>,
        routing: Arc<RoutingConfig>,
    ) -> Self {
        Self {
            store,
            service,
            routing,
        }
    }

    pub fn routing(&self) -> &RoutingConfig {
        &self.routing
    }

    /// Run one turn and return the committed assistant reply.
    ///
    /// Turns on the same session queue behind each other. Ending the session
    /// while the turn is running (or waiting) yields [`TurnError::Cancelled`].
    pub async fn handle_turn(
        &self,
        session_id: SessionId,
        user_text: &str,
        sink: &dyn UiSink,
    ) -> Result<String, TurnError> {
        let span = info_span!("turn", session_id = %session_id);
        self.run_turn(session_id, user_text, sink).instrument(span).await
    }

    async fn run_turn(
        &self,
        session_id: SessionId,
        user_text: &str,
        sink: &dyn UiSink,
    ) -> Result<String, TurnError> {
        let handle = self.store.turn_handle(session_id)?;

        let _turn_guard = tokio::select! {
            biased;
            _ = handle.cancel.cancelled() => return Err(TurnError::Cancelled),
            guard = handle.turn_lock.lock() => guard,
        };
        self.commit(session_id, &handle, ChatMessage::user(user_text))?;
        sink.emit(UiEvent::Message {
            role: ChatRole::Assistant,
            content: String::new(),
        });

        let history = self
            .store
            .get_history(session_id)
            .map_err(|e| Self::ended(&handle, e))?;
        debug!(messages = history.len(), "Submitting history");

        let mut run = match self
            .service
            .run_streamed(history, Arc::clone(&self.routing))
        {
            Ok(run) => run,
            Err(e) => return Err(Self::fail(sink, e.into())),
        };

        loop {
            let next = tokio::select! {
                biased;
                _ = handle.cancel.cancelled() => {
                    info!("Turn cancelled mid-stream");
                    return Err(TurnError::Cancelled);
                }
                next = run.next_event() => next,
            };

            match next {
                Some(Ok(RunEvent::TextDelta { text })) => {
                    sink.emit(UiEvent::StreamFragment { text });
                }
                Some(Ok(RunEvent::AgentUpdated { agent })) => {
                    sink.emit(UiEvent::AgentChanged { agent });
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(Self::fail(sink, e.into())),
                None => break,
            }
        }

        let Some(final_output) = run.final_output().map(str::to_owned) else {
            return Err(Self::fail(
                sink,
                TurnError::Service("run ended without a final output".to_string()),
            ));
        };

        self.commit(
            session_id,
            &handle,
            ChatMessage::assistant(final_output.clone()),
        )?;
        info!(
            agent = run.last_agent().unwrap_or_default(),
            len = final_output.len(),
            "Turn complete"
        );
        sink.emit(UiEvent::TurnComplete {
            content: final_output.clone(),
        });

        Ok(final_output)
    }

    /// Append to the session this turn started on, unless it has ended.
    fn commit(
        &self,
        session_id: SessionId,
        handle: &TurnHandle,
        message: ChatMessage,
    ) -> Result<(), TurnError> {
        if handle.cancel.is_cancelled() {
            return Err(TurnError::Cancelled);
        }
        self.store
            .append(session_id, message)
            .map_err(|e| Self::ended(handle, e))
    }

    /// A session can only vanish under a turn by being ended.
    fn ended(handle: &TurnHandle, error: SessionError) -> TurnError {
        if handle.cancel.is_cancelled() {
            TurnError::Cancelled
        } else {
            error.into()
        }
    }

    fn fail(sink: &dyn UiSink, error: TurnError) -> TurnError {
        warn!(error = %error, "Turn failed");
        sink.emit(UiEvent::TurnError {
            reason: error.to_string(),
        });
        error
    }
}

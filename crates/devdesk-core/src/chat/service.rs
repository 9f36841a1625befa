//! Chat service wiring session lifecycle to turns.

use std::sync::Arc;

use tracing::info;

use devdesk_types::agent::RoutingConfig;
use devdesk_types::chat::{ChatRole, History, SessionId, SessionSummary};
use devdesk_types::error::{SessionError, TurnError};
use devdesk_types::event::UiEvent;

use crate::completion::CompletionService;
use crate::session::SessionStore;
use crate::turn::{TurnController, UiSink};

/// Handles UI session events: start, user message, end.
pub struct ChatService {
    store: Arc<SessionStore>,
    turns: TurnController,
    greeting: String,
}

impl ChatService {
    pub fn new(
        store: Arc<SessionStore>,
        service: Arc<dyn CompletionService>,
        routing: Arc<RoutingConfig>,
        greeting: impl Into<String>,
    ) -> Self {
        Self {
            turns: TurnController::new(Arc::clone(&store), service, routing),
            store,
            greeting: greeting.into(),
        }
    }

    /// Start a session and greet the user.
    ///
    /// The greeting is shown in the UI only; it is not part of the history
    /// sent to the model.
    pub fn on_session_start(&self, sink: &dyn UiSink) -> SessionId {
        let session_id = self.store.start_session();
        sink.emit(UiEvent::SessionStarted { session_id });
        if !self.greeting.is_empty() {
            sink.emit(UiEvent::Message {
                role: ChatRole::Assistant,
                content: self.greeting.clone(),
            });
        }
        session_id
    }

    /// Run one turn for a user message.
    pub async fn on_user_message(
        &self,
        session_id: SessionId,
        text: &str,
        sink: &dyn UiSink,
    ) -> Result<String, TurnError> {
        self.turns.handle_turn(session_id, text, sink).await
    }

    /// End the session, cancelling any turn still in flight.
    pub fn on_session_end(&self, session_id: SessionId) -> bool {
        let existed = self.store.end_session(session_id);
        if !existed {
            info!(session_id = %session_id, "End requested for unknown session");
        }
        existed
    }

    pub fn history(&self, session_id: SessionId) -> Result<History, SessionError> {
        self.store.get_history(session_id)
    }

    pub fn sessions(&self) -> Vec<SessionSummary> {
        self.store.list_sessions()
    }

    pub fn routing(&self) -> &RoutingConfig {
        self.turns.routing()
    }

    pub fn greeting(&self) -> &str {
        &self.greeting
    }
}

#[cfg(test)]
mod tests {
    use devdesk_types::chat::ChatMessage;

    use super::*;
    use crate::agent::defaults::default_routing;
    use crate::completion::testing::{Script, ScriptedService};
    use crate::turn::sink::RecordingSink;

    const GREETING: &str = "Hello from the Web Development Agent!";

    fn service(scripts: Vec<Script>) -> ChatService {
        ChatService::new(
            Arc::new(SessionStore::new()),
            Arc::new(ScriptedService::new(scripts)),
            Arc::new(default_routing()),
            GREETING,
        )
    }

    #[test]
    fn test_session_start_greets_without_touching_history() {
        let chat = service(vec![]);
        let sink = RecordingSink::default();

        let id = chat.on_session_start(&sink);

        assert_eq!(
            sink.events(),
            vec![
                UiEvent::SessionStarted { session_id: id },
                UiEvent::Message {
                    role: ChatRole::Assistant,
                    content: GREETING.to_string()
                },
            ]
        );
        assert!(chat.history(id).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_message_then_end() {
        let chat = service(vec![Script::Reply {
            fragments: vec!["Try ", "Next.js."],
            final_output: "Try Next.js.",
        }]);
        let sink = RecordingSink::default();
        let id = chat.on_session_start(&sink);

        let reply = chat
            .on_user_message(id, "Which React framework?", &sink)
            .await
            .unwrap();
        assert_eq!(reply, "Try Next.js.");
        assert_eq!(
            chat.history(id).unwrap(),
            vec![
                ChatMessage::user("Which React framework?"),
                ChatMessage::assistant("Try Next.js."),
            ]
        );
        assert_eq!(chat.sessions().len(), 1);
        assert_eq!(chat.sessions()[0].message_count, 2);

        assert!(chat.on_session_end(id));
        assert!(!chat.on_session_end(id));
        assert_eq!(chat.history(id), Err(SessionError::NotFound(id)));
        assert!(chat.sessions().is_empty());
    }

    #[tokio::test]
    async fn test_message_to_ended_session() {
        let chat = service(vec![]);
        let sink = RecordingSink::default();
        let id = chat.on_session_start(&sink);
        chat.on_session_end(id);

        let err = chat.on_user_message(id, "hello?", &sink).await.unwrap_err();
        assert_eq!(err, TurnError::NotFound(id));
    }

    #[test]
    fn test_empty_greeting_is_skipped() {
        let chat = ChatService::new(
            Arc::new(SessionStore::new()),
            Arc::new(ScriptedService::new(vec![])),
            Arc::new(default_routing()),
            "",
        );
        let sink = RecordingSink::default();
        let id = chat.on_session_start(&sink);
        assert_eq!(sink.events(), vec![UiEvent::SessionStarted { session_id: id }]);
        assert_eq!(chat.routing().entry_agent, "Web Development Agent");
    }
}

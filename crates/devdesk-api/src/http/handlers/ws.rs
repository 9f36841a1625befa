//! WebSocket chat endpoint.
//!
//! The `/ws/chat` endpoint upgrades an HTTP connection to a WebSocket. One
//! connection is one chat session:
//!
//! - **On connect:** a session is started; `session_started` and the greeting
//!   are the first frames the client sees.
//! - **Receives commands:** incoming text frames are parsed as [`WsCommand`].
//!   User messages are queued and run as turns one at a time.
//! - **Forwards events:** every [`UiEvent`] emitted for the session is pushed
//!   to the client as a JSON text frame, in emission order.
//! - **On disconnect:** the session is ended, which cancels a turn still in
//!   flight. Nothing is committed for a cancelled turn.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use devdesk_core::chat::ChatService;
use devdesk_core::turn::UiSink;
use devdesk_types::chat::SessionId;
use devdesk_types::error::TurnError;
use devdesk_types::event::UiEvent;

use crate::state::AppState;

const PONG: &str = r#"{"type":"pong"}"#;

/// Incoming command from a WebSocket client.
///
/// Unknown or malformed messages are logged and ignored.
#[derive(Debug, PartialEq, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsCommand {
    /// Run a turn with this text.
    UserMessage { content: String },
    /// Keep-alive ping. Server responds with `{"type":"pong"}`.
    Ping,
}

fn parse_command(text: &str) -> Option<WsCommand> {
    match serde_json::from_str(text) {
        Ok(cmd) => Some(cmd),
        Err(err) => {
            warn!(raw = %text, error = %err, "Ignoring malformed WebSocket command");
            None
        }
    }
}

/// Upgrade an HTTP request to a chat WebSocket.
///
/// This is mounted at `/ws/chat` in the router.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws_connection(socket, state))
}

async fn handle_ws_connection(socket: WebSocket, state: AppState) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let (ui_tx, mut ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (pong_tx, mut pong_rx) = mpsc::unbounded_channel::<()>();
    let (turn_tx, turn_rx) = mpsc::unbounded_channel::<String>();

    let session_id = state.chat.on_session_start(&ui_tx);
    info!(session_id = %session_id, "WebSocket chat session started");

    // Writer: drains UI events and pongs until every sender is gone.
    let writer = tokio::spawn(async move {
        loop {
            let frame = tokio::select! {
                Some(event) = ui_rx.recv() => match serde_json::to_string(&event) {
                    Ok(json) => json,
                    Err(err) => {
                        warn!("Failed to serialize UiEvent: {err}");
                        continue;
                    }
                },
                Some(()) = pong_rx.recv() => PONG.to_string(),
                else => break,
            };
            if ws_sender.send(Message::Text(frame.into())).await.is_err() {
                debug!("WebSocket client gone; stopping writer");
                break;
            }
        }
    });

    let turns = tokio::spawn(run_turns(
        Arc::clone(&state.chat),
        session_id,
        turn_rx,
        ui_tx,
    ));

    while let Some(msg_result) = ws_receiver.next().await {
        match msg_result {
            Ok(Message::Text(text)) => match parse_command(&text) {
                Some(WsCommand::UserMessage { content }) => {
                    if content.trim().is_empty() {
                        debug!(session_id = %session_id, "Ignoring empty user message");
                    } else if turn_tx.send(content).is_err() {
                        break;
                    }
                }
                Some(WsCommand::Ping) => {
                    let _ = pong_tx.send(());
                }
                None => {}
            },
            Ok(Message::Close(_)) => break,
            Err(err) => {
                debug!("WebSocket receive error: {err}");
                break;
            }
            // Binary and protocol-level ping/pong frames are handled by axum.
            Ok(_) => {}
        }
    }

    state.chat.on_session_end(session_id);
    drop(turn_tx);
    drop(pong_tx);
    let _ = turns.await;
    let _ = writer.await;

    info!(session_id = %session_id, "WebSocket chat session ended");
}

/// Run queued user messages as turns, one at a time, until the queue closes
/// or the session goes away.
async fn run_turns(
    chat: Arc<ChatService>,
    session_id: SessionId,
    mut messages: mpsc::UnboundedReceiver<String>,
    sink: impl UiSink,
) {
    while let Some(text) = messages.recv().await {
        match chat.on_user_message(session_id, &text, &sink).await {
            Ok(_) => {}
            // Already reported to the client as `turn_error`.
            Err(TurnError::Service(_)) => {}
            Err(err @ (TurnError::Cancelled | TurnError::NotFound(_))) => {
                debug!(session_id = %session_id, error = %err, "Stopping turn worker");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use devdesk_types::chat::ChatMessage;

    use super::*;
    use crate::state::testing::echo_state;

    #[test]
    fn test_parse_user_message() {
        assert_eq!(
            parse_command(r#"{"type":"user_message","content":"Build a login API"}"#),
            Some(WsCommand::UserMessage {
                content: "Build a login API".to_string()
            })
        );
    }

    #[test]
    fn test_parse_ping_and_garbage() {
        assert_eq!(parse_command(r#"{"type":"ping"}"#), Some(WsCommand::Ping));
        assert_eq!(parse_command("not json"), None);
        assert_eq!(parse_command(r#"{"type":"shutdown"}"#), None);
    }

    #[tokio::test]
    async fn test_turns_run_in_order() {
        let state = echo_state();
        let (ui_tx, mut ui_rx) = mpsc::unbounded_channel::<UiEvent>();
        let id = state.chat.on_session_start(&ui_tx);

        let (turn_tx, turn_rx) = mpsc::unbounded_channel();
        turn_tx.send("one".to_string()).unwrap();
        turn_tx.send("two".to_string()).unwrap();
        drop(turn_tx);

        run_turns(Arc::clone(&state.chat), id, turn_rx, ui_tx).await;

        assert_eq!(
            state.chat.history(id).unwrap(),
            vec![
                ChatMessage::user("one"),
                ChatMessage::assistant("echo: one"),
                ChatMessage::user("two"),
                ChatMessage::assistant("echo: two"),
            ]
        );

        let mut completes = Vec::new();
        while let Ok(event) = ui_rx.try_recv() {
            if let UiEvent::TurnComplete { content } = event {
                completes.push(content);
            }
        }
        assert_eq!(completes, vec!["echo: one", "echo: two"]);
    }

    #[tokio::test]
    async fn test_worker_stops_when_session_ended() {
        let state = echo_state();
        let (ui_tx, mut ui_rx) = mpsc::unbounded_channel::<UiEvent>();
        let id = state.chat.on_session_start(&ui_tx);
        state.chat.on_session_end(id);

        let (turn_tx, turn_rx) = mpsc::unbounded_channel();
        turn_tx.send("late".to_string()).unwrap();

        // Returns even though the queue is still open.
        run_turns(Arc::clone(&state.chat), id, turn_rx, ui_tx).await;

        let events: Vec<UiEvent> = std::iter::from_fn(|| ui_rx.try_recv().ok()).collect();
        // Only the session start and greeting; no placeholder for the late turn.
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], UiEvent::SessionStarted { .. }));
    }
}

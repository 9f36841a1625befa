//! Session HTTP handlers.
//!
//! Endpoints:
//! - GET    /api/v1/sessions               - List live sessions
//! - GET    /api/v1/sessions/{id}/messages - Get a session's history
//! - DELETE /api/v1/sessions/{id}          - End a session

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};

use devdesk_types::chat::{History, SessionId, SessionSummary};
use devdesk_types::error::SessionError;

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, request_id};
use crate::state::AppState;

/// Parse a session id from a path parameter, returning a 400 error on invalid format.
fn parse_session_id(s: &str) -> Result<SessionId, AppError> {
    s.parse::<SessionId>()
        .map_err(|_| AppError::Validation(format!("Invalid session id: {s}")))
}

/// GET /api/v1/sessions - List live sessions, oldest first.
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<SessionSummary>>> {
    let start = Instant::now();
    let sessions = state.chat.sessions();
    let elapsed = start.elapsed().as_millis() as u64;
    Json(ApiResponse::success(sessions, request_id(), elapsed))
}

/// GET /api/v1/sessions/{id}/messages - The session's history in order.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<History>>, AppError> {
    let start = Instant::now();
    let session_id = parse_session_id(&id)?;
    let history = state.chat.history(session_id)?;
    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(history, request_id(), elapsed)))
}

/// DELETE /api/v1/sessions/{id} - End a session, cancelling any turn in flight.
pub async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let session_id = parse_session_id(&id)?;
    if !state.chat.on_session_end(session_id) {
        return Err(SessionError::NotFound(session_id).into());
    }
    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "ended": session_id }),
        request_id(),
        elapsed,
    )))
}

//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use devdesk_types::error::SessionError;

use crate::http::response::{ApiResponse, request_id};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    Session(SessionError),
    /// Malformed request input.
    Validation(String),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::Session(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Session(SessionError::NotFound(id)) => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                format!("Session {id} not found"),
            ),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        let mut response = ApiResponse::error(code, &message, request_id()).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use devdesk_types::chat::SessionId;

    use super::*;

    #[test]
    fn test_session_not_found_is_404() {
        let id = SessionId::new();
        let (status, code, message) = AppError::from(SessionError::NotFound(id)).parts();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "SESSION_NOT_FOUND");
        assert!(message.contains(&id.to_string()));
    }

    #[test]
    fn test_validation_is_400() {
        let resp = AppError::Validation("Invalid session id: x".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}

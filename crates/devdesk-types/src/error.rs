use thiserror::Error;

use crate::chat::SessionId;
use crate::llm::LlmError;

/// Errors related to session store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session {0} not found")]
    NotFound(SessionId),
}

/// Errors that abort a single conversational turn.
///
/// None of these poison the session: the next turn may proceed normally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnError {
    #[error("session {0} not found")]
    NotFound(SessionId),

    #[error("completion service error: {0}")]
    Service(String),

    #[error("turn cancelled")]
    Cancelled,
}

impl From<SessionError> for TurnError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NotFound(id) => TurnError::NotFound(id),
        }
    }
}

impl From<LlmError> for TurnError {
    fn from(e: LlmError) -> Self {
        TurnError::Service(e.to_string())
    }
}

/// Errors in a routing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("agent name must not be empty")]
    EmptyAgentName,

    #[error("agent '{0}' is defined more than once")]
    DuplicateAgent(String),

    #[error("entry agent '{0}' is not defined")]
    UnknownEntryAgent(String),

    #[error("agent '{agent}' hands off to undefined agent '{target}'")]
    UnknownHandoffTarget { agent: String, target: String },
}

/// Errors raised while assembling runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("environment variable {0} is not set")]
    MissingApiKey(String),

    #[error(transparent)]
    Routing(#[from] RoutingError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_error_from_session_error() {
        let id = SessionId::new();
        let err: TurnError = SessionError::NotFound(id).into();
        assert_eq!(err, TurnError::NotFound(id));
    }

    #[test]
    fn test_turn_error_from_llm_error() {
        let err: TurnError = LlmError::Stream("connection reset".to_string()).into();
        assert_eq!(
            err.to_string(),
            "completion service error: stream error: connection reset"
        );
    }

    #[test]
    fn test_routing_error_display() {
        let err = RoutingError::UnknownHandoffTarget {
            agent: "Web Development Agent".to_string(),
            target: "Mobile Agent".to_string(),
        };
        assert!(err.to_string().contains("Mobile Agent"));
    }

    #[test]
    fn test_config_error_missing_key() {
        let err = ConfigError::MissingApiKey("GEMINI_API_KEY".to_string());
        assert_eq!(err.to_string(), "environment variable GEMINI_API_KEY is not set");
    }
}

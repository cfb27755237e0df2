use thiserror::Error;
use crate::models::{ErrorResponse, SessionId};

/// Errors raised by the matchmaking and session engine
///
/// Every variant is recoverable and is reported only to the connection
/// that triggered it. The operation that detects it performs no mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Not your turn")]
    WrongTurn,

    #[error("Invalid response: {0}")]
    InvalidResponse(&'static str),

    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl EngineError {
    /// Machine-readable error code sent alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::NotFound(_) => "not_found",
            EngineError::WrongTurn => "wrong_turn",
            EngineError::InvalidResponse(_) => "invalid_response",
            EngineError::ValidationError(_) => "validation_error",
        }
    }
}

impl From<validator::ValidationErrors> for EngineError {
    fn from(errors: validator::ValidationErrors) -> Self {
        EngineError::ValidationError(errors.to_string())
    }
}

impl From<&EngineError> for ErrorResponse {
    fn from(error: &EngineError) -> Self {
        ErrorResponse {
            error: error.code().to_string(),
            message: error.to_string(),
            status_code: None,
        }
    }
}

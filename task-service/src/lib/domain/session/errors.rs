use thiserror::Error;

/// Error for SessionId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Top-level error for session operations
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("Invalid session ID: {0}")]
    InvalidSessionId(#[from] SessionIdError),

    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

use thiserror::Error;

/// Error for TaskId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for task title validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TitleError {
    #[error("Title cannot be empty")]
    Empty,

    #[error("Title too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for priority parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PriorityError {
    #[error("Unknown priority: {0}")]
    Unknown(String),
}

/// Top-level error for task operations
#[derive(Debug, Clone, Error)]
pub enum TaskError {
    #[error("Invalid task ID: {0}")]
    InvalidTaskId(#[from] TaskIdError),

    #[error("Invalid title: {0}")]
    InvalidTitle(#[from] TitleError),

    #[error("Invalid priority: {0}")]
    InvalidPriority(#[from] PriorityError),

    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

use thiserror::Error;

/// Error type for password hashing operations.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Password verification failed: {0}")]
    VerificationFailed(String),
}

/// Error type for password strength policy violations.
///
/// Each variant names the rule that failed so callers can produce
/// field-level validation responses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters")]
    TooShort { min: usize },

    #[error("Password must be at most {max} bytes")]
    TooLong { max: usize },

    #[error("Password must contain at least 1 uppercase letter")]
    MissingUppercase,

    #[error("Password must contain at least 1 lowercase letter")]
    MissingLowercase,

    #[error("Password must contain at least 1 number")]
    MissingDigit,
}

use thiserror::Error;

use crate::jwt::TokenError;

/// Error type for remote key-set operations.
#[derive(Debug, Clone, Error)]
pub enum KeySetError {
    #[error("Failed to fetch key set: {0}")]
    Fetch(String),

    #[error("No signing keys found in key set")]
    NoSigningKey,

    #[error("Unsupported key type in key set: {0}")]
    UnsupportedKey(String),

    #[error(transparent)]
    Token(#[from] TokenError),
}

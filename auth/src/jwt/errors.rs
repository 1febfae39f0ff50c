use thiserror::Error;

/// Error type for token encode/decode operations.
///
/// `Expired` is kept distinct from `Invalid` because callers treat both as
/// "unauthenticated" but log and report them differently.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token has expired")]
    Expired,

    #[error("Token is invalid: {0}")]
    Invalid(String),
}

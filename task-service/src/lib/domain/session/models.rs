use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use sha2::Digest;
use sha2::Sha256;
use uuid::Uuid;

use crate::session::errors::SessionIdError;
use crate::user::models::UserId;

/// Session unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Generate a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a session ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, SessionIdError> {
        Uuid::parse_str(s)
            .map(SessionId)
            .map_err(|e| SessionIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Advisory record of an issued token.
///
/// Sessions exist for "list/revoke active sessions" UX only. The stored
/// reference is a digest of the token, never the token itself, and
/// deleting a session does not invalidate the token it refers to.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    pub token_digest: String,
    pub expires_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Opaque reference for a token: its SHA-256 digest, hex encoded.
    pub fn digest_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Check if session has expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_digest_is_stable_and_opaque() {
        let digest = Session::digest_token("some.jwt.token");
        assert_eq!(digest, Session::digest_token("some.jwt.token"));
        assert_ne!(digest, Session::digest_token("other.jwt.token"));
        assert_eq!(digest.len(), 64);
        assert!(!digest.contains("some"));
    }

    #[test]
    fn test_is_expired() {
        let now = Utc::now();
        let session = Session {
            id: SessionId::new(),
            user_id: UserId::new(),
            token_digest: Session::digest_token("t"),
            expires_at: now + Duration::hours(1),
            ip_address: None,
            user_agent: None,
            created_at: now,
        };
        assert!(!session.is_expired(now));
        assert!(session.is_expired(now + Duration::hours(2)));
    }
}

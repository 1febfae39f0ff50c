use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

fn default_role() -> String {
    "user".to_string()
}

/// Access token payload.
///
/// `sub` carries the user id and is the only identity field trusted for
/// authorization decisions. `user_id` duplicates it for frontend
/// compatibility. Externally issued tokens may omit `email`, `role`
/// (defaults to `"user"`), `iss`, and `aud`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessClaims {
    /// Subject (user identifier)
    pub sub: String,

    /// Duplicate of `sub`, kept for frontend compatibility
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Account email, when known to the issuer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Access role; absent means plain user
    #[serde(default = "default_role")]
    pub role: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issuer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Audience
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

impl AccessClaims {
    /// Issuance instant as a UTC datetime.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    /// Expiry instant as a UTC datetime.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Check if the token is expired at the given timestamp.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}

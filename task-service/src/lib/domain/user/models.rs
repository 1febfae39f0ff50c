use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::user::errors::EmailError;
use crate::user::errors::RoleError;
use crate::user::errors::UserIdError;

/// Provider identifier for password-credential accounts.
pub const CREDENTIAL_PROVIDER: &str = "credential";

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Access role attached to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User aggregate entity.
///
/// Role and ban fields are only mutated through admin-gated operations.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub name: Option<String>,
    pub image: Option<String>,
    pub role: Role,
    pub email_verified: bool,
    pub banned: bool,
    pub ban_reason: Option<String>,
    pub ban_expires: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if user has admin role.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Check if the user is currently banned at `now`.
    ///
    /// A ban with no expiry holds indefinitely; a ban with an expiry in
    /// the past has lapsed.
    pub fn is_banned_active(&self, now: DateTime<Utc>) -> bool {
        if !self.banned {
            return false;
        }
        match self.ban_expires {
            None => true,
            Some(expires) => now < expires,
        }
    }
}

/// Stored credential for the password provider.
///
/// Exactly one exists per (user, "credential") pair. `password_hash` is
/// either a modern bcrypt string or the legacy `salt:hexdigest` format
/// awaiting migration at next signin.
#[derive(Debug, Clone)]
pub struct Credential {
    pub id: Uuid,
    pub user_id: UserId,
    pub account_id: String,
    pub provider_id: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Command to register a new user with a password credential.
#[derive(Debug)]
pub struct SignUpCommand {
    pub email: EmailAddress,
    pub password: String,
    pub name: Option<String>,
}

/// Client metadata attached to a signin for the session record.
#[derive(Debug, Clone, Default)]
pub struct ClientMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Command to authenticate an existing user.
#[derive(Debug)]
pub struct SignInCommand {
    pub email: EmailAddress,
    pub password: String,
    pub client: ClientMeta,
}

/// Command to update profile fields. Only provided fields change.
#[derive(Debug, Default)]
pub struct UpdateProfileCommand {
    pub name: Option<String>,
    pub image: Option<String>,
}

/// Command to ban a user, optionally with a reason and expiry.
#[derive(Debug)]
pub struct BanCommand {
    pub reason: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Filter and pagination for the admin user listing.
#[derive(Debug, Clone, Default)]
pub struct UserListFilter {
    pub role: Option<Role>,
    pub banned: Option<bool>,
    pub page: u32,
    pub per_page: u32,
}

/// Token issued by signup or signin.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

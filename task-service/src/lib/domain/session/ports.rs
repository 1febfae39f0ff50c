use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::session::errors::SessionError;
use crate::session::models::Session;
use crate::session::models::SessionId;
use crate::user::models::UserId;

/// Port for session listing and revocation.
#[async_trait]
pub trait SessionServicePort: Send + Sync + 'static {
    /// Record a session for an issued token. Advisory; callers may ignore
    /// failures.
    async fn record(&self, session: Session) -> Result<Session, SessionError>;

    /// All unexpired sessions for a user, newest first.
    async fn list_active(&self, user_id: &UserId) -> Result<Vec<Session>, SessionError>;

    /// The most recent unexpired session for a user, if any.
    async fn current(&self, user_id: &UserId) -> Result<Option<Session>, SessionError>;

    /// Delete one session belonging to the user.
    ///
    /// # Errors
    /// * `NotFound` - no such session for this user
    async fn revoke(&self, user_id: &UserId, session_id: &SessionId) -> Result<(), SessionError>;

    /// Delete every session for the user, returning how many were removed.
    async fn revoke_all(&self, user_id: &UserId) -> Result<u64, SessionError>;
}

/// Persistence operations for session records.
#[async_trait]
pub trait SessionRepository: Send + Sync + 'static {
    /// Persist a new session record.
    async fn create(&self, session: Session) -> Result<Session, SessionError>;

    /// Unexpired sessions for a user at `now`, newest first.
    async fn find_active_by_user(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<Session>, SessionError>;

    /// Delete one session scoped by owner. Returns whether a row was removed.
    async fn delete(&self, user_id: &UserId, session_id: &SessionId)
        -> Result<bool, SessionError>;

    /// Delete all sessions for a user, returning the removed count.
    async fn delete_all_for_user(&self, user_id: &UserId) -> Result<u64, SessionError>;
}

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::session::errors::SessionError;
use crate::session::models::Session;
use crate::session::models::SessionId;
use crate::session::ports::SessionRepository;
use crate::session::ports::SessionServicePort;
use crate::user::models::UserId;

/// Domain service for advisory session records.
pub struct SessionService<SR>
where
    SR: SessionRepository,
{
    repository: Arc<SR>,
}

impl<SR> SessionService<SR>
where
    SR: SessionRepository,
{
    pub fn new(repository: Arc<SR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<SR> SessionServicePort for SessionService<SR>
where
    SR: SessionRepository,
{
    async fn record(&self, session: Session) -> Result<Session, SessionError> {
        self.repository.create(session).await
    }

    async fn list_active(&self, user_id: &UserId) -> Result<Vec<Session>, SessionError> {
        self.repository.find_active_by_user(user_id, Utc::now()).await
    }

    async fn current(&self, user_id: &UserId) -> Result<Option<Session>, SessionError> {
        let sessions = self
            .repository
            .find_active_by_user(user_id, Utc::now())
            .await?;
        Ok(sessions.into_iter().next())
    }

    async fn revoke(&self, user_id: &UserId, session_id: &SessionId) -> Result<(), SessionError> {
        let removed = self.repository.delete(user_id, session_id).await?;
        if !removed {
            return Err(SessionError::NotFound(session_id.to_string()));
        }
        Ok(())
    }

    async fn revoke_all(&self, user_id: &UserId) -> Result<u64, SessionError> {
        self.repository.delete_all_for_user(user_id).await
    }
}

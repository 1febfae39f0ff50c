use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::session::errors::SessionError;
use crate::session::models::Session;
use crate::session::models::SessionId;
use crate::session::ports::SessionRepository;
use crate::user::models::UserId;

pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct SessionRow {
    id: Uuid,
    user_id: Uuid,
    token_digest: String,
    expires_at: DateTime<Utc>,
    ip_address: Option<String>,
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            id: SessionId(row.id),
            user_id: UserId(row.user_id),
            token_digest: row.token_digest,
            expires_at: row.expires_at,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn create(&self, session: Session) -> Result<Session, SessionError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, token_digest, expires_at, ip_address,
                                  user_agent, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(session.id.0)
        .bind(session.user_id.0)
        .bind(&session.token_digest)
        .bind(session.expires_at)
        .bind(&session.ip_address)
        .bind(&session.user_agent)
        .bind(session.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| SessionError::DatabaseError(e.to_string()))?;

        Ok(session)
    }

    async fn find_active_by_user(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<Session>, SessionError> {
        let rows = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, user_id, token_digest, expires_at, ip_address, user_agent, created_at
            FROM sessions
            WHERE user_id = $1 AND expires_at > $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.0)
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| SessionError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(Session::from).collect())
    }

    async fn delete(
        &self,
        user_id: &UserId,
        session_id: &SessionId,
    ) -> Result<bool, SessionError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1 AND user_id = $2")
            .bind(session_id.0)
            .bind(user_id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| SessionError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_for_user(&self, user_id: &UserId) -> Result<u64, SessionError> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| SessionError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected())
    }
}

use std::str::FromStr;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::user::errors::UserError;
use crate::user::models::Credential;
use crate::user::models::EmailAddress;
use crate::user::models::Role;
use crate::user::models::User;
use crate::user::models::UserId;
use crate::user::models::UserListFilter;
use crate::user::models::CREDENTIAL_PROVIDER;
use crate::user::ports::UserRepository;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: Option<String>,
    image: Option<String>,
    role: String,
    email_verified: bool,
    banned: bool,
    ban_reason: Option<String>,
    ban_expires: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(row.id),
            email: EmailAddress::new(row.email)?,
            name: row.name,
            image: row.image,
            role: Role::from_str(&row.role)?,
            email_verified: row.email_verified,
            banned: row.banned,
            ban_reason: row.ban_reason,
            ban_expires: row.ban_expires,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct CredentialRow {
    id: Uuid,
    user_id: Uuid,
    account_id: String,
    provider_id: String,
    password_hash: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

const USER_COLUMNS: &str = "id, email, name, image, role, email_verified, banned, ban_reason, \
                            ban_expires, created_at, updated_at";

fn map_unique_violation(e: sqlx::Error) -> UserError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return UserError::DuplicateAccount;
        }
    }
    UserError::DatabaseError(e.to_string())
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User, credential: Credential) -> Result<User, UserError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, image, role, email_verified, banned,
                               ban_reason, ban_expires, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(user.id.0)
        .bind(user.email.as_str())
        .bind(&user.name)
        .bind(&user.image)
        .bind(user.role.as_str())
        .bind(user.email_verified)
        .bind(user.banned)
        .bind(&user.ban_reason)
        .bind(user.ban_expires)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        sqlx::query(
            r#"
            INSERT INTO accounts (id, user_id, account_id, provider_id, password_hash,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(credential.id)
        .bind(credential.user_id.0)
        .bind(&credential.account_id)
        .bind(&credential.provider_id)
        .bind(&credential.password_hash)
        .bind(credential.created_at)
        .bind(credential.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        tx.commit()
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn find_credential(&self, user_id: &UserId) -> Result<Option<Credential>, UserError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT id, user_id, account_id, provider_id, password_hash, created_at, updated_at
            FROM accounts
            WHERE user_id = $1 AND provider_id = $2
            "#,
        )
        .bind(user_id.0)
        .bind(CREDENTIAL_PROVIDER)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(row.and_then(|r| {
            r.password_hash.map(|password_hash| Credential {
                id: r.id,
                user_id: UserId(r.user_id),
                account_id: r.account_id,
                provider_id: r.provider_id,
                password_hash,
                created_at: r.created_at,
                updated_at: r.updated_at,
            })
        }))
    }

    async fn update_credential_hash(
        &self,
        user_id: &UserId,
        password_hash: &str,
    ) -> Result<(), UserError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET password_hash = $2, updated_at = NOW()
            WHERE user_id = $1 AND provider_id = $3
            "#,
        )
        .bind(user_id.0)
        .bind(password_hash)
        .bind(CREDENTIAL_PROVIDER)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(user_id.to_string()));
        }
        Ok(())
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = $2, name = $3, image = $4, role = $5, email_verified = $6,
                banned = $7, ban_reason = $8, ban_expires = $9, updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(user.id.0)
        .bind(user.email.as_str())
        .bind(&user.name)
        .bind(&user.image)
        .bind(user.role.as_str())
        .bind(user.email_verified)
        .bind(user.banned)
        .bind(&user.ban_reason)
        .bind(user.ban_expires)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(user.id.to_string()));
        }
        Ok(user)
    }

    async fn list(&self, filter: &UserListFilter) -> Result<(Vec<User>, u64), UserError> {
        let role = filter.role.map(|r| r.as_str().to_string());
        let offset = (filter.page.saturating_sub(1) as i64) * filter.per_page as i64;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM users
            WHERE ($1::text IS NULL OR role = $1)
              AND ($2::boolean IS NULL OR banned = $2)
            "#,
        )
        .bind(&role)
        .bind(filter.banned)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        let rows = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {} FROM users
            WHERE ($1::text IS NULL OR role = $1)
              AND ($2::boolean IS NULL OR banned = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
            USER_COLUMNS
        ))
        .bind(&role)
        .bind(filter.banned)
        .bind(filter.per_page as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        let users = rows
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((users, total as u64))
    }
}

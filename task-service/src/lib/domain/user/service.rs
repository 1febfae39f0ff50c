use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::session::models::Session;
use crate::session::models::SessionId;
use crate::session::ports::SessionRepository;
use crate::user::errors::UserError;
use crate::user::models::BanCommand;
use crate::user::models::Credential;
use crate::user::models::IssuedToken;
use crate::user::models::Role;
use crate::user::models::SignInCommand;
use crate::user::models::SignUpCommand;
use crate::user::models::UpdateProfileCommand;
use crate::user::models::User;
use crate::user::models::UserId;
use crate::user::models::UserListFilter;
use crate::user::models::CREDENTIAL_PROVIDER;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Maximum page size for user listings.
const MAX_PER_PAGE: u32 = 100;

/// Signup/signin service.
///
/// Coordinates password hashing, credential storage, and token issuance.
/// Legacy password hashes are migrated in place on successful signin:
/// the fresh hash is persisted before the token is returned, so a client
/// never holds a token for a credential that will re-verify against the
/// legacy scheme.
pub struct AuthService<UR, SR>
where
    UR: UserRepository,
    SR: SessionRepository,
{
    repository: Arc<UR>,
    sessions: Arc<SR>,
    password_hasher: auth::PasswordHasher,
    token_codec: auth::TokenCodec,
}

impl<UR, SR> AuthService<UR, SR>
where
    UR: UserRepository,
    SR: SessionRepository,
{
    /// Create a new auth service with injected dependencies.
    pub fn new(repository: Arc<UR>, sessions: Arc<SR>, token_codec: auth::TokenCodec) -> Self {
        Self {
            repository,
            sessions,
            password_hasher: auth::PasswordHasher::new(),
            token_codec,
        }
    }

    /// Override the password hasher (lower bcrypt cost in tests).
    pub fn with_password_hasher(mut self, hasher: auth::PasswordHasher) -> Self {
        self.password_hasher = hasher;
        self
    }

    fn issue_token(&self, user: &User) -> Result<IssuedToken, UserError> {
        let (token, expires_at) = self
            .token_codec
            .issue(
                &user.id.to_string(),
                Some(user.email.as_str()),
                user.role.as_str(),
            )
            .map_err(|e| UserError::Token(e.to_string()))?;

        Ok(IssuedToken {
            token,
            user_id: user.id,
            expires_at,
        })
    }
}

#[async_trait]
impl<UR, SR> AuthServicePort for AuthService<UR, SR>
where
    UR: UserRepository,
    SR: SessionRepository,
{
    async fn sign_up(&self, command: SignUpCommand) -> Result<IssuedToken, UserError> {
        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(UserError::DuplicateAccount);
        }

        auth::password::validate_password_strength(&command.password)?;

        let password_hash = self.password_hasher.hash(&command.password)?;

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            email: command.email,
            name: command.name,
            image: None,
            role: Role::User,
            email_verified: false,
            banned: false,
            ban_reason: None,
            ban_expires: None,
            created_at: now,
            updated_at: now,
        };
        let credential = Credential {
            id: Uuid::new_v4(),
            user_id: user.id,
            account_id: user.email.as_str().to_string(),
            provider_id: CREDENTIAL_PROVIDER.to_string(),
            password_hash,
            created_at: now,
            updated_at: now,
        };

        let user = self.repository.create(user, credential).await?;
        tracing::info!(user_id = %user.id, "user registered");

        self.issue_token(&user)
    }

    async fn sign_in(&self, command: SignInCommand) -> Result<IssuedToken, UserError> {
        let user = self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if user.is_banned_active(Utc::now()) {
            return Err(UserError::Banned {
                reason: user.ban_reason.clone(),
            });
        }

        let credential = self
            .repository
            .find_credential(&user.id)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !self
            .password_hasher
            .verify(&command.password, &credential.password_hash)?
        {
            return Err(UserError::InvalidCredentials);
        }

        // Transparent migration: a legacy hash is replaced before the
        // token is issued. At-least-once; a crash here just retries the
        // migration next signin.
        if auth::PasswordHasher::needs_rehash(&credential.password_hash) {
            let fresh = self.password_hasher.hash(&command.password)?;
            self.repository
                .update_credential_hash(&user.id, &fresh)
                .await?;
            tracing::info!(user_id = %user.id, "migrated legacy password hash");
        }

        let issued = self.issue_token(&user)?;

        // Advisory session record; failure must not block signin.
        let session = Session {
            id: SessionId::new(),
            user_id: user.id,
            token_digest: Session::digest_token(&issued.token),
            expires_at: issued.expires_at,
            ip_address: command.client.ip_address,
            user_agent: command.client.user_agent,
            created_at: Utc::now(),
        };
        if let Err(e) = self.sessions.create(session).await {
            tracing::warn!(user_id = %user.id, error = %e, "failed to record session");
        }

        Ok(issued)
    }
}

/// User lookup and administration service.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn list_users(&self, filter: UserListFilter) -> Result<(Vec<User>, u64), UserError> {
        let filter = UserListFilter {
            page: filter.page.max(1),
            per_page: filter.per_page.clamp(1, MAX_PER_PAGE),
            ..filter
        };
        self.repository.list(&filter).await
    }

    async fn update_profile(
        &self,
        id: &UserId,
        command: UpdateProfileCommand,
    ) -> Result<User, UserError> {
        let mut user = self.get_user(id).await?;

        if let Some(name) = command.name {
            user.name = Some(name);
        }
        if let Some(image) = command.image {
            user.image = Some(image);
        }
        user.updated_at = Utc::now();

        self.repository.update(user).await
    }

    async fn update_role(&self, id: &UserId, role: Role) -> Result<User, UserError> {
        let mut user = self.get_user(id).await?;
        user.role = role;
        user.updated_at = Utc::now();
        self.repository.update(user).await
    }

    async fn ban_user(
        &self,
        admin_id: &UserId,
        id: &UserId,
        command: BanCommand,
    ) -> Result<User, UserError> {
        if admin_id == id {
            return Err(UserError::CannotBanSelf);
        }

        let mut user = self.get_user(id).await?;
        user.banned = true;
        user.ban_reason = command.reason;
        user.ban_expires = command.expires_at;
        user.updated_at = Utc::now();
        self.repository.update(user).await
    }

    async fn unban_user(&self, id: &UserId) -> Result<User, UserError> {
        let mut user = self.get_user(id).await?;
        user.banned = false;
        user.ban_reason = None;
        user.ban_expires = None;
        user.updated_at = Utc::now();
        self.repository.update(user).await
    }
}

use async_trait::async_trait;

use crate::user::errors::UserError;
use crate::user::models::BanCommand;
use crate::user::models::Credential;
use crate::user::models::IssuedToken;
use crate::user::models::SignInCommand;
use crate::user::models::SignUpCommand;
use crate::user::models::UpdateProfileCommand;
use crate::user::models::User;
use crate::user::models::UserId;
use crate::user::models::UserListFilter;

/// Port for the signup/signin flows.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user and issue an access token.
    ///
    /// # Errors
    /// * `DuplicateAccount` - the email is already registered
    /// * `WeakPassword` - the password fails the strength policy
    /// * `DatabaseError` - persistence failed
    async fn sign_up(&self, command: SignUpCommand) -> Result<IssuedToken, UserError>;

    /// Authenticate an existing user and issue an access token.
    ///
    /// Unknown email, missing credential, and wrong password all produce
    /// the same `InvalidCredentials` error so callers cannot enumerate
    /// accounts.
    ///
    /// # Errors
    /// * `InvalidCredentials` - no such account or wrong password
    /// * `Banned` - the user is actively banned
    /// * `DatabaseError` - persistence failed
    async fn sign_in(&self, command: SignInCommand) -> Result<IssuedToken, UserError>;
}

/// Port for user lookup and administration.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// List users with pagination and optional role/banned filters.
    ///
    /// # Returns
    /// Matching page of users plus the total match count.
    async fn list_users(&self, filter: UserListFilter) -> Result<(Vec<User>, u64), UserError>;

    /// Update profile fields (name, image). Only provided fields change.
    async fn update_profile(
        &self,
        id: &UserId,
        command: UpdateProfileCommand,
    ) -> Result<User, UserError>;

    /// Replace a user's role.
    async fn update_role(
        &self,
        id: &UserId,
        role: crate::user::models::Role,
    ) -> Result<User, UserError>;

    /// Ban a user. Admins cannot ban themselves.
    ///
    /// # Errors
    /// * `CannotBanSelf` - `admin_id` equals `id`
    /// * `NotFound` - User does not exist
    async fn ban_user(
        &self,
        admin_id: &UserId,
        id: &UserId,
        command: BanCommand,
    ) -> Result<User, UserError>;

    /// Lift a ban, clearing reason and expiry.
    async fn unban_user(&self, id: &UserId) -> Result<User, UserError>;
}

/// Persistence operations for the user aggregate and its credential.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user together with its password credential, atomically.
    ///
    /// # Errors
    /// * `DuplicateAccount` - email or (provider, account) already exists
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User, credential: Credential) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Retrieve the password credential for a user, if one exists.
    async fn find_credential(&self, user_id: &UserId) -> Result<Option<Credential>, UserError>;

    /// Replace the stored password hash for a user's credential.
    async fn update_credential_hash(
        &self,
        user_id: &UserId,
        password_hash: &str,
    ) -> Result<(), UserError>;

    /// Update an existing user row.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    async fn update(&self, user: User) -> Result<User, UserError>;

    /// List users with pagination and optional filters, plus total count.
    async fn list(&self, filter: &UserListFilter) -> Result<(Vec<User>, u64), UserError>;
}

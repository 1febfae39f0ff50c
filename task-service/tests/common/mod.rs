#![allow(dead_code)]

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::RwLock;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenCodec;
use auth::TokenVerifier;
use chrono::DateTime;
use chrono::Utc;
use sha2::Digest;
use task_service::config::CorsConfig;
use task_service::domain::session::errors::SessionError;
use task_service::domain::session::models::Session;
use task_service::domain::session::models::SessionId;
use task_service::domain::session::ports::SessionRepository;
use task_service::domain::session::service::SessionService;
use task_service::domain::task::errors::TaskError;
use task_service::domain::task::models::SortOrder;
use task_service::domain::task::models::Task;
use task_service::domain::task::models::TaskFilter;
use task_service::domain::task::models::TaskId;
use task_service::domain::task::models::TaskSortKey;
use task_service::domain::task::ports::TaskRepository;
use task_service::domain::task::service::TaskService;
use task_service::domain::user::errors::UserError;
use task_service::domain::user::models::Credential;
use task_service::domain::user::models::Role;
use task_service::domain::user::models::User;
use task_service::domain::user::models::UserId;
use task_service::domain::user::models::UserListFilter;
use task_service::domain::user::ports::UserRepository;
use task_service::domain::user::service::AuthService;
use task_service::domain::user::service::UserService;
use task_service::inbound::http::router::create_router;
use task_service::inbound::http::router::AppState;
use uuid::Uuid;

pub const TEST_SECRET: &[u8] = b"integration_test_secret_32_bytes!!";

/// In-memory user store backing the API under test.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
    credentials: RwLock<HashMap<Uuid, Credential>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test-only backdoor: change a user's role without the API.
    pub fn set_role(&self, user_id: &UserId, role: Role) {
        let mut users = self.users.write().unwrap();
        if let Some(user) = users.get_mut(&user_id.0) {
            user.role = role;
        }
    }

    /// Test-only backdoor: overwrite a stored credential hash (e.g. to
    /// seed a legacy-format hash).
    pub fn set_credential_hash(&self, user_id: &UserId, hash: &str) {
        let mut credentials = self.credentials.write().unwrap();
        if let Some(credential) = credentials.get_mut(&user_id.0) {
            credential.password_hash = hash.to_string();
        }
    }

    pub fn credential_hash(&self, user_id: &UserId) -> Option<String> {
        let credentials = self.credentials.read().unwrap();
        credentials.get(&user_id.0).map(|c| c.password_hash.clone())
    }

    /// Test-only backdoor: drop a user row while keeping tokens issued
    /// for it valid.
    pub fn remove_user(&self, user_id: &UserId) {
        self.users.write().unwrap().remove(&user_id.0);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User, credential: Credential) -> Result<User, UserError> {
        let mut users = self.users.write().unwrap();
        if users
            .values()
            .any(|u| u.email.as_str() == user.email.as_str())
        {
            return Err(UserError::DuplicateAccount);
        }
        users.insert(user.id.0, user.clone());
        self.credentials
            .write()
            .unwrap()
            .insert(credential.user_id.0, credential);
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().unwrap().get(&id.0).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }

    async fn find_credential(&self, user_id: &UserId) -> Result<Option<Credential>, UserError> {
        Ok(self.credentials.read().unwrap().get(&user_id.0).cloned())
    }

    async fn update_credential_hash(
        &self,
        user_id: &UserId,
        password_hash: &str,
    ) -> Result<(), UserError> {
        let mut credentials = self.credentials.write().unwrap();
        match credentials.get_mut(&user_id.0) {
            Some(credential) => {
                credential.password_hash = password_hash.to_string();
                Ok(())
            }
            None => Err(UserError::NotFound(user_id.to_string())),
        }
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().unwrap();
        if !users.contains_key(&user.id.0) {
            return Err(UserError::NotFound(user.id.to_string()));
        }
        users.insert(user.id.0, user.clone());
        Ok(user)
    }

    async fn list(&self, filter: &UserListFilter) -> Result<(Vec<User>, u64), UserError> {
        let users = self.users.read().unwrap();
        let mut matching: Vec<User> = users
            .values()
            .filter(|u| filter.role.map_or(true, |r| u.role == r))
            .filter(|u| filter.banned.map_or(true, |b| u.banned == b))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        let offset = ((filter.page.max(1) - 1) * filter.per_page) as usize;
        let page: Vec<User> = matching
            .into_iter()
            .skip(offset)
            .take(filter.per_page as usize)
            .collect();

        Ok((page, total))
    }
}

#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_count(&self, user_id: &UserId) -> usize {
        self.sessions
            .read()
            .unwrap()
            .values()
            .filter(|s| s.user_id == *user_id)
            .count()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: Session) -> Result<Session, SessionError> {
        self.sessions
            .write()
            .unwrap()
            .insert(session.id.0, session.clone());
        Ok(session)
    }

    async fn find_active_by_user(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<Session>, SessionError> {
        let sessions = self.sessions.read().unwrap();
        let mut active: Vec<Session> = sessions
            .values()
            .filter(|s| s.user_id == *user_id && s.expires_at > now)
            .cloned()
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(active)
    }

    async fn delete(
        &self,
        user_id: &UserId,
        session_id: &SessionId,
    ) -> Result<bool, SessionError> {
        let mut sessions = self.sessions.write().unwrap();
        match sessions.get(&session_id.0) {
            Some(session) if session.user_id == *user_id => {
                sessions.remove(&session_id.0);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_all_for_user(&self, user_id: &UserId) -> Result<u64, SessionError> {
        let mut sessions = self.sessions.write().unwrap();
        let before = sessions.len();
        sessions.retain(|_, s| s.user_id != *user_id);
        Ok((before - sessions.len()) as u64)
    }
}

#[derive(Default)]
pub struct InMemoryTaskRepository {
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, task: Task) -> Result<Task, TaskError> {
        self.tasks.write().unwrap().insert(task.id.0, task.clone());
        Ok(task)
    }

    async fn find_by_id(
        &self,
        user_id: &UserId,
        task_id: &TaskId,
    ) -> Result<Option<Task>, TaskError> {
        Ok(self
            .tasks
            .read()
            .unwrap()
            .get(&task_id.0)
            .filter(|t| t.user_id == *user_id)
            .cloned())
    }

    async fn list(
        &self,
        user_id: &UserId,
        filter: &TaskFilter,
    ) -> Result<(Vec<Task>, u64), TaskError> {
        let tasks = self.tasks.read().unwrap();
        let mut matching: Vec<Task> = tasks
            .values()
            .filter(|t| t.user_id == *user_id)
            .filter(|t| filter.priority.map_or(true, |p| t.priority == p))
            .filter(|t| filter.completed.map_or(true, |c| t.completed == c))
            .cloned()
            .collect();

        matching.sort_by(|a, b| {
            let ordering = match filter.sort_by {
                TaskSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
                TaskSortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                TaskSortKey::DueAt => a.due_at.cmp(&b.due_at),
                TaskSortKey::Priority => a.priority.as_str().cmp(b.priority.as_str()),
                TaskSortKey::Title => a.title.as_str().cmp(b.title.as_str()),
            };
            match filter.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = matching.len() as u64;
        let page: Vec<Task> = matching
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .collect();

        Ok((page, total))
    }

    async fn update(&self, task: Task) -> Result<Task, TaskError> {
        let mut tasks = self.tasks.write().unwrap();
        if !tasks.contains_key(&task.id.0) {
            return Err(TaskError::NotFound(task.id.to_string()));
        }
        tasks.insert(task.id.0, task.clone());
        Ok(task)
    }

    async fn delete(&self, user_id: &UserId, task_id: &TaskId) -> Result<bool, TaskError> {
        let mut tasks = self.tasks.write().unwrap();
        match tasks.get(&task_id.0) {
            Some(task) if task.user_id == *user_id => {
                tasks.remove(&task_id.0);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// Test application serving the real router over in-memory stores.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub users: Arc<InMemoryUserRepository>,
    pub sessions: Arc<InMemorySessionRepository>,
}

impl TestApp {
    /// Spawn the application on a random port and return TestApp
    pub async fn spawn() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let sessions = Arc::new(InMemorySessionRepository::new());
        let tasks = Arc::new(InMemoryTaskRepository::new());

        let verifier = Arc::new(TokenVerifier::with_shared_secret(
            TokenCodec::new(TEST_SECRET),
            None,
        ));

        let state = AppState {
            auth: Arc::new(
                AuthService::new(
                    Arc::clone(&users),
                    Arc::clone(&sessions),
                    TokenCodec::new(TEST_SECRET),
                )
                .with_password_hasher(PasswordHasher::with_cost(4)),
            ),
            users: Arc::new(UserService::new(Arc::clone(&users))),
            sessions: Arc::new(SessionService::new(Arc::clone(&sessions))),
            tasks: Arc::new(TaskService::new(tasks)),
            verifier,
        };

        let router = create_router(state, &CorsConfig::default());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server failed");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            users,
            sessions,
        }
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn patch(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.patch(format!("{}{}", self.address, path))
    }

    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.put(format!("{}{}", self.address, path))
    }

    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(format!("{}{}", self.address, path))
    }

    /// Sign up a user through the API, returning (token, user_id).
    pub async fn signup(&self, email: &str, password: &str) -> (String, String) {
        let response = self
            .post("/auth/signup")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute signup");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse signup body");
        (
            body["data"]["token"].as_str().unwrap().to_string(),
            body["data"]["user_id"].as_str().unwrap().to_string(),
        )
    }

    /// Sign up a user and promote them to admin through the store.
    pub async fn signup_admin(&self, email: &str, password: &str) -> (String, String) {
        let (_, user_id) = self.signup(email, password).await;
        let id = UserId(Uuid::from_str(&user_id).unwrap());
        self.users.set_role(&id, Role::Admin);

        // Re-issue so the token carries the admin role claim.
        let response = self
            .post("/auth/signin")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute signin");
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: serde_json::Value = response.json().await.expect("Failed to parse signin body");

        (
            body["data"]["token"].as_str().unwrap().to_string(),
            user_id,
        )
    }

    /// Replace a user's stored hash with the legacy `salt:sha256` format.
    pub fn seed_legacy_hash(&self, user_id: &str, password: &str, salt: &str) {
        let mut hasher = sha2::Sha256::new();
        hasher.update(password.as_bytes());
        hasher.update(salt.as_bytes());
        let legacy = format!("{}:{}", salt, hex::encode(hasher.finalize()));

        let id = UserId(Uuid::from_str(user_id).unwrap());
        self.users.set_credential_hash(&id, &legacy);
    }
}

/// Issue a token signed with the app's secret for an arbitrary subject.
pub fn token_for_subject(subject: &str) -> String {
    let codec = TokenCodec::new(TEST_SECRET);
    let (token, _) = codec.issue(subject, None, "user").unwrap();
    token
}

use std::sync::Arc;
use std::time::Duration;

use auth::KeySetClient;
use auth::TokenCodec;
use auth::TokenVerifier;
use sqlx::postgres::PgPoolOptions;
use task_service::config::Config;
use task_service::domain::session::service::SessionService;
use task_service::domain::task::service::TaskService;
use task_service::domain::user::service::AuthService;
use task_service::domain::user::service::UserService;
use task_service::inbound::http::router::create_router;
use task_service::inbound::http::router::AppState;
use task_service::outbound::repositories::PostgresSessionRepository;
use task_service::outbound::repositories::PostgresTaskRepository;
use task_service::outbound::repositories::PostgresUserRepository;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "task_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "task-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        jwt_algorithm = %config.jwt.algorithm,
        jwks_enabled = config.jwks_enabled(),
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    // Locally issued tokens carry no issuer/audience expectations; those
    // apply to the external identity provider's tokens only.
    let token_codec = TokenCodec::new(config.jwt.secret.as_bytes());

    let key_set_client = config.jwks_enabled().then(|| {
        KeySetClient::new(config.jwt.jwks_url.clone())
            .with_cache_ttl(Duration::from_secs(config.jwt.jwks_cache_ttl_secs))
            .with_issuer(config.jwt.issuer.clone())
            .with_audience(config.jwt.audience.clone())
    });
    let verifier = Arc::new(TokenVerifier::with_shared_secret(
        TokenCodec::new(config.jwt.secret.as_bytes()),
        key_set_client,
    ));

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let session_repository = Arc::new(PostgresSessionRepository::new(pg_pool.clone()));
    let task_repository = Arc::new(PostgresTaskRepository::new(pg_pool));

    let state = AppState {
        auth: Arc::new(AuthService::new(
            Arc::clone(&user_repository),
            Arc::clone(&session_repository),
            token_codec,
        )),
        users: Arc::new(UserService::new(Arc::clone(&user_repository))),
        sessions: Arc::new(SessionService::new(session_repository)),
        tasks: Arc::new(TaskService::new(task_repository)),
        verifier,
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let application = create_router(state, &config.cors);
    axum::serve(http_listener, application).await?;

    Ok(())
}

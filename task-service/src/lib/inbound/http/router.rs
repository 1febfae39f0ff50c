use std::sync::Arc;
use std::time::Duration;

use auth::TokenVerifier;
use axum::body::Body;
use axum::http::HeaderValue;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::auth::me::me;
use super::handlers::auth::session::get_session;
use super::handlers::auth::signin::signin;
use super::handlers::auth::signup::signup;
use super::handlers::auth::token_info::token_info;
use super::handlers::tasks::create_task::create_task;
use super::handlers::tasks::delete_task::delete_task;
use super::handlers::tasks::get_task::get_task;
use super::handlers::tasks::list_tasks::list_tasks;
use super::handlers::tasks::update_task::update_task;
use super::handlers::users::ban_user::ban_user;
use super::handlers::users::get_user::get_user;
use super::handlers::users::list_sessions::list_sessions;
use super::handlers::users::list_users::list_users;
use super::handlers::users::revoke_session::revoke_session;
use super::handlers::users::revoke_sessions::revoke_sessions;
use super::handlers::users::unban_user::unban_user;
use super::handlers::users::update_role::update_role;
use super::handlers::users::update_user::update_user;
use super::middleware::authenticate as auth_middleware;
use super::middleware::require_admin;
use crate::config::CorsConfig;
use crate::session::ports::SessionServicePort;
use crate::task::ports::TaskServicePort;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthServicePort>,
    pub users: Arc<dyn UserServicePort>,
    pub sessions: Arc<dyn SessionServicePort>,
    pub tasks: Arc<dyn TaskServicePort>,
    pub verifier: Arc<TokenVerifier>,
}

pub fn create_router(state: AppState, cors: &CorsConfig) -> Router {
    let public_routes = Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/signin", post(signin));

    let protected_routes = Router::new()
        .route("/auth/me", get(me))
        .route("/auth/token-info", get(token_info))
        .route("/auth/session", get(get_session))
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:task_id",
            get(get_task).patch(update_task).delete(delete_task),
        )
        .route("/users/:user_id", get(get_user).patch(update_user))
        .route(
            "/users/:user_id/sessions",
            get(list_sessions).delete(revoke_sessions),
        )
        .route(
            "/users/:user_id/sessions/:session_id",
            delete(revoke_session),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let admin_routes = Router::new()
        .route("/users", get(list_users))
        .route("/users/:user_id/role", put(update_role))
        .route("/users/:user_id/ban", post(ban_user).delete(unban_user))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .layer(trace_layer)
        .layer(cors_layer(cors))
        .with_state(state)
}

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

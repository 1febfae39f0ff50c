use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::models::User;
use crate::user::models::UserId;

/// Request-scoped authorization failure.
///
/// Every protected request passes the same short-circuiting pipeline:
/// extract bearer token, verify it, resolve the subject to a user, check
/// the ban. These variants are its per-stage failures, each with a stable
/// error code and status.
#[derive(Debug, Clone)]
pub enum AuthError {
    /// No authorization header present
    MissingToken,
    /// Header is not exactly `Bearer <token>`
    InvalidFormat,
    /// Token failed verification
    TokenInvalid,
    /// Token is valid but expired
    TokenExpired,
    /// Token subject does not resolve to a stored user
    UserNotFound,
    /// User is actively banned
    Banned(Option<String>),
    /// Authenticated but not allowed
    Forbidden(String),
    /// Gate infrastructure failure
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "AUTH_MISSING_TOKEN",
            AuthError::InvalidFormat => "AUTH_INVALID_FORMAT",
            AuthError::TokenInvalid => "AUTH_TOKEN_INVALID",
            AuthError::TokenExpired => "AUTH_TOKEN_EXPIRED",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::Banned(_) => "USER_BANNED",
            AuthError::Forbidden(_) => "AUTH_FORBIDDEN",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status for this error.
    ///
    /// A missing user is 404, not 401: the token was valid, so this is an
    /// internal-consistency signal (user deleted after issuance) rather
    /// than a credential problem.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken
            | AuthError::InvalidFormat
            | AuthError::TokenInvalid
            | AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::Banned(_) | AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Authorization header missing"),
            AuthError::InvalidFormat => {
                write!(f, "Invalid authorization header format. Use: Bearer <token>")
            }
            AuthError::TokenInvalid => write!(f, "Token is invalid"),
            AuthError::TokenExpired => write!(f, "Token has expired"),
            AuthError::UserNotFound => write!(f, "User not found"),
            AuthError::Banned(reason) => match reason {
                Some(reason) => write!(f, "User account is banned: {}", reason),
                None => write!(f, "User account is banned"),
            },
            AuthError::Forbidden(msg) => f.write_str(msg),
            AuthError::Internal(msg) => write!(f, "Internal authentication error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}

/// Extension type carrying the authenticated user through a request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub claims: auth::AccessClaims,
}

/// Extract the token from an authorization header value.
///
/// The header must be exactly two whitespace-separated parts with a
/// case-insensitive `bearer` scheme. `Bearer` with an empty token part is
/// a format error, not a verification error.
pub fn extract_bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingToken)?;

    let parts: Vec<&str> = header.split_whitespace().collect();
    if parts.len() != 2 || !parts[0].eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidFormat);
    }

    Ok(parts[1])
}

/// Self-or-admin predicate for routes parameterized by a target user id.
pub fn ensure_self_or_admin(current: &User, target: &UserId) -> Result<(), AuthError> {
    if current.id != *target && !current.is_admin() {
        return Err(AuthError::Forbidden(
            "Can only access your own data or require admin role".to_string(),
        ));
    }
    Ok(())
}

/// Authorization gate middleware.
///
/// Stage order is fixed: extract token, verify, resolve user, ban check.
/// Role checks run afterwards per route (see `require_admin` and
/// `ensure_self_or_admin`). On success the resolved user and verified
/// claims are stored in request extensions.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let header = match req.headers().get(http::header::AUTHORIZATION) {
        None => None,
        Some(value) => Some(value.to_str().map_err(|_| AuthError::InvalidFormat)?),
    };
    let token = extract_bearer_token(header)?;

    let claims = state.verifier.verify(token).await.map_err(|e| {
        tracing::warn!(error = %e, "token verification failed");
        match e {
            auth::VerificationError::Expired => AuthError::TokenExpired,
            auth::VerificationError::Failed => AuthError::TokenInvalid,
        }
    })?;

    // The subject claim is the only caller-supplied identity trusted from
    // here on.
    let user_id = UserId::from_string(&claims.sub).map_err(|e| {
        tracing::warn!(error = %e, "token subject is not a user id");
        AuthError::TokenInvalid
    })?;

    let user = state.users.get_user(&user_id).await.map_err(|e| match e {
        UserError::NotFound(_) => AuthError::UserNotFound,
        other => {
            tracing::error!(error = %other, "user lookup failed during authentication");
            AuthError::Internal("user lookup failed".to_string())
        }
    })?;

    if user.is_banned_active(Utc::now()) {
        return Err(AuthError::Banned(user.ban_reason.clone()));
    }

    req.extensions_mut().insert(CurrentUser { user, claims });

    Ok(next.run(req).await)
}

/// Role gate for admin-only routes. Runs after `authenticate`.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AuthError> {
    let current = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| AuthError::Internal("authentication context missing".to_string()))?;

    if !current.user.is_admin() {
        return Err(AuthError::Forbidden("Admin access required".to_string()));
    }

    Ok(next.run(req).await)
}

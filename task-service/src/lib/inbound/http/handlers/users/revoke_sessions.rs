use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::ensure_self_or_admin;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;
use crate::user::models::UserId;

/// Revoke every session record for a user.
///
/// Session records are advisory: already-issued tokens stay valid until
/// they expire.
pub async fn revoke_sessions(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let user_id = UserId::from_string(&user_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    ensure_self_or_admin(&current.user, &user_id)?;

    let count = state.sessions.revoke_all(&user_id).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData {
            message: format!("Revoked {} session(s)", count),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageData {
    pub message: String,
}

use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::revoke_sessions::MessageData;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::ensure_self_or_admin;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;
use crate::session::models::SessionId;
use crate::user::models::UserId;

pub async fn revoke_session(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((user_id, session_id)): Path<(String, String)>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let user_id = UserId::from_string(&user_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let session_id =
        SessionId::from_string(&session_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    ensure_self_or_admin(&current.user, &user_id)?;

    state.sessions.revoke(&user_id, &session_id).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData {
            message: "Session revoked".to_string(),
        },
    ))
}

use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use crate::inbound::http::handlers::auth::session::SessionData;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::ensure_self_or_admin;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;
use crate::user::models::UserId;

pub async fn list_sessions(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<SessionsListData>, ApiError> {
    let user_id = UserId::from_string(&user_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    ensure_self_or_admin(&current.user, &user_id)?;

    let sessions = state.sessions.list_active(&user_id).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        SessionsListData {
            total: sessions.len(),
            sessions: sessions.iter().map(Into::into).collect(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionsListData {
    pub sessions: Vec<SessionData>,
    pub total: usize,
}

use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::router::AppState;
use crate::user::models::Role;
use crate::user::models::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoleUpdateRequest {
    role: Role,
}

pub async fn update_role(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<RoleUpdateRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let user_id = UserId::from_string(&user_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .users
        .update_role(&user_id, body.role)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;
use crate::task::models::TaskId;

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(task_id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    let task_id = TaskId::from_string(&task_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .tasks
        .delete_task(&current.user.id, &task_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}

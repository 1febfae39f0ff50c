use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;

use super::TaskData;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;
use crate::task::errors::TitleError;
use crate::task::models::CreateTaskCommand;
use crate::task::models::Priority;
use crate::task::models::Title;

pub async fn create_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(body): Json<CreateTaskRequest>,
) -> Result<ApiSuccess<TaskData>, ApiError> {
    state
        .tasks
        .create_task(&current.user.id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref task| ApiSuccess::new(StatusCode::CREATED, task.into()))
}

/// HTTP request body for creating a task (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateTaskRequest {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    due_at: Option<DateTime<Utc>>,
    priority: Priority,
}

impl CreateTaskRequest {
    fn try_into_command(self) -> Result<CreateTaskCommand, TitleError> {
        let title = Title::new(self.title)?;
        Ok(CreateTaskCommand {
            title,
            description: self.description,
            due_at: self.due_at,
            priority: self.priority,
        })
    }
}

impl From<TitleError> for ApiError {
    fn from(err: TitleError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

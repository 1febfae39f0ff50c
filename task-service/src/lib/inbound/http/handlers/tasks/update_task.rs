use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Deserializer;

use super::TaskData;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;
use crate::task::errors::TitleError;
use crate::task::models::Priority;
use crate::task::models::TaskId;
use crate::task::models::Title;
use crate::task::models::UpdateTaskCommand;

/// HTTP request body for updating a task (raw JSON)
///
/// Double options distinguish an absent field (unchanged) from an
/// explicit null (cleared).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    due_at: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    priority: Option<Priority>,
    #[serde(default)]
    completed: Option<bool>,
}

/// Wrap a present field (including an explicit null) in the outer option.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

impl UpdateTaskRequest {
    fn try_into_command(self) -> Result<UpdateTaskCommand, TitleError> {
        let title = self.title.map(Title::new).transpose()?;
        Ok(UpdateTaskCommand {
            title,
            description: self.description,
            due_at: self.due_at,
            priority: self.priority,
            completed: self.completed,
        })
    }
}

pub async fn update_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(task_id): Path<String>,
    Json(body): Json<UpdateTaskRequest>,
) -> Result<ApiSuccess<TaskData>, ApiError> {
    let task_id = TaskId::from_string(&task_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let command = body.try_into_command()?;

    state
        .tasks
        .update_task(&current.user.id, &task_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref task| ApiSuccess::new(StatusCode::OK, task.into()))
}

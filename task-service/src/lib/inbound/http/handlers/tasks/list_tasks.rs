use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;
use serde::Serialize;

use super::TaskData;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;
use crate::task::models::Priority;
use crate::task::models::SortOrder;
use crate::task::models::TaskFilter;
use crate::task::models::TaskSortKey;

pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<ListTasksQuery>,
) -> Result<ApiSuccess<TaskListData>, ApiError> {
    let filter = TaskFilter {
        priority: query.priority,
        completed: query.completed,
        sort_by: query.sort_by,
        sort_order: query.sort_order,
        limit: query.limit,
        offset: query.offset,
    };

    let (tasks, total_count) = state.tasks.list_tasks(&current.user.id, filter).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        TaskListData {
            tasks: tasks.iter().map(Into::into).collect(),
            total_count,
            limit: query.limit,
            offset: query.offset,
        },
    ))
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListTasksQuery {
    #[serde(default)]
    priority: Option<Priority>,
    #[serde(default)]
    completed: Option<bool>,
    #[serde(default)]
    sort_by: TaskSortKey,
    #[serde(default)]
    sort_order: SortOrder,
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    offset: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskListData {
    pub tasks: Vec<TaskData>,
    pub total_count: u64,
    pub limit: i64,
    pub offset: i64,
}

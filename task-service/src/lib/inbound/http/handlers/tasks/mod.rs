pub mod create_task;
pub mod delete_task;
pub mod get_task;
pub mod list_tasks;
pub mod update_task;

use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::task::models::Task;

/// Task as rendered by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskData {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub priority: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Task> for TaskData {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.to_string(),
            user_id: task.user_id.to_string(),
            title: task.title.as_str().to_string(),
            description: task.description.clone(),
            due_at: task.due_at,
            priority: task.priority.to_string(),
            completed: task.completed,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::task::errors::TaskError;
use crate::task::models::CreateTaskCommand;
use crate::task::models::Task;
use crate::task::models::TaskFilter;
use crate::task::models::TaskId;
use crate::task::models::UpdateTaskCommand;
use crate::task::ports::TaskRepository;
use crate::task::ports::TaskServicePort;
use crate::user::models::UserId;

/// Maximum page size for task listings.
const MAX_LIMIT: i64 = 100;

/// Domain service for owner-scoped task operations.
pub struct TaskService<TR>
where
    TR: TaskRepository,
{
    repository: Arc<TR>,
}

impl<TR> TaskService<TR>
where
    TR: TaskRepository,
{
    pub fn new(repository: Arc<TR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<TR> TaskServicePort for TaskService<TR>
where
    TR: TaskRepository,
{
    async fn create_task(
        &self,
        user_id: &UserId,
        command: CreateTaskCommand,
    ) -> Result<Task, TaskError> {
        let now = Utc::now();
        let task = Task {
            id: TaskId::new(),
            user_id: *user_id,
            title: command.title,
            description: command.description,
            due_at: command.due_at,
            priority: command.priority,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        self.repository.create(task).await
    }

    async fn get_task(&self, user_id: &UserId, task_id: &TaskId) -> Result<Task, TaskError> {
        self.repository
            .find_by_id(user_id, task_id)
            .await?
            .ok_or(TaskError::NotFound(task_id.to_string()))
    }

    async fn list_tasks(
        &self,
        user_id: &UserId,
        filter: TaskFilter,
    ) -> Result<(Vec<Task>, u64), TaskError> {
        let filter = TaskFilter {
            limit: filter.limit.clamp(1, MAX_LIMIT),
            offset: filter.offset.max(0),
            ..filter
        };
        self.repository.list(user_id, &filter).await
    }

    async fn update_task(
        &self,
        user_id: &UserId,
        task_id: &TaskId,
        command: UpdateTaskCommand,
    ) -> Result<Task, TaskError> {
        let mut task = self.get_task(user_id, task_id).await?;

        if let Some(title) = command.title {
            task.title = title;
        }
        if let Some(description) = command.description {
            task.description = description;
        }
        if let Some(due_at) = command.due_at {
            task.due_at = due_at;
        }
        if let Some(priority) = command.priority {
            task.priority = priority;
        }
        if let Some(completed) = command.completed {
            task.completed = completed;
        }
        task.updated_at = Utc::now();

        self.repository.update(task).await
    }

    async fn delete_task(&self, user_id: &UserId, task_id: &TaskId) -> Result<(), TaskError> {
        let removed = self.repository.delete(user_id, task_id).await?;
        if !removed {
            return Err(TaskError::NotFound(task_id.to_string()));
        }
        Ok(())
    }
}

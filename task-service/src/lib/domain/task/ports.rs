use async_trait::async_trait;

use crate::task::errors::TaskError;
use crate::task::models::CreateTaskCommand;
use crate::task::models::Task;
use crate::task::models::TaskFilter;
use crate::task::models::TaskId;
use crate::task::models::UpdateTaskCommand;
use crate::user::models::UserId;

/// Port for task operations.
///
/// Every operation is scoped to the owning user id resolved from the
/// verified token subject; a task belonging to someone else behaves as if
/// it did not exist.
#[async_trait]
pub trait TaskServicePort: Send + Sync + 'static {
    /// Create a task for the user.
    async fn create_task(
        &self,
        user_id: &UserId,
        command: CreateTaskCommand,
    ) -> Result<Task, TaskError>;

    /// Retrieve one of the user's tasks.
    ///
    /// # Errors
    /// * `NotFound` - no such task for this user
    async fn get_task(&self, user_id: &UserId, task_id: &TaskId) -> Result<Task, TaskError>;

    /// List the user's tasks with filtering, sorting, and pagination.
    ///
    /// # Returns
    /// The page of tasks plus the total match count.
    async fn list_tasks(
        &self,
        user_id: &UserId,
        filter: TaskFilter,
    ) -> Result<(Vec<Task>, u64), TaskError>;

    /// Update one of the user's tasks. Only provided fields change.
    async fn update_task(
        &self,
        user_id: &UserId,
        task_id: &TaskId,
        command: UpdateTaskCommand,
    ) -> Result<Task, TaskError>;

    /// Delete one of the user's tasks.
    async fn delete_task(&self, user_id: &UserId, task_id: &TaskId) -> Result<(), TaskError>;
}

/// Persistence operations for tasks.
#[async_trait]
pub trait TaskRepository: Send + Sync + 'static {
    /// Persist a new task.
    async fn create(&self, task: Task) -> Result<Task, TaskError>;

    /// Retrieve a task by id, scoped to its owner.
    async fn find_by_id(
        &self,
        user_id: &UserId,
        task_id: &TaskId,
    ) -> Result<Option<Task>, TaskError>;

    /// List a user's tasks plus the total match count.
    async fn list(
        &self,
        user_id: &UserId,
        filter: &TaskFilter,
    ) -> Result<(Vec<Task>, u64), TaskError>;

    /// Update an existing task row.
    async fn update(&self, task: Task) -> Result<Task, TaskError>;

    /// Delete a task scoped to its owner. Returns whether a row was removed.
    async fn delete(&self, user_id: &UserId, task_id: &TaskId) -> Result<bool, TaskError>;
}

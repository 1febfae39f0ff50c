use std::str::FromStr;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::task::errors::TaskError;
use crate::task::models::Priority;
use crate::task::models::Task;
use crate::task::models::TaskFilter;
use crate::task::models::TaskId;
use crate::task::models::Title;
use crate::task::ports::TaskRepository;
use crate::user::models::UserId;

pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct TaskRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    description: Option<String>,
    due_at: Option<DateTime<Utc>>,
    priority: String,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = TaskError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Task {
            id: TaskId(row.id),
            user_id: UserId(row.user_id),
            title: Title::new(row.title)?,
            description: row.description,
            due_at: row.due_at,
            priority: Priority::from_str(&row.priority)?,
            completed: row.completed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const TASK_COLUMNS: &str =
    "id, user_id, title, description, due_at, priority, completed, created_at, updated_at";

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn create(&self, task: Task) -> Result<Task, TaskError> {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, user_id, title, description, due_at, priority, completed,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(task.id.0)
        .bind(task.user_id.0)
        .bind(task.title.as_str())
        .bind(&task.description)
        .bind(task.due_at)
        .bind(task.priority.as_str())
        .bind(task.completed)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        Ok(task)
    }

    async fn find_by_id(
        &self,
        user_id: &UserId,
        task_id: &TaskId,
    ) -> Result<Option<Task>, TaskError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {} FROM tasks WHERE id = $1 AND user_id = $2",
            TASK_COLUMNS
        ))
        .bind(task_id.0)
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        row.map(Task::try_from).transpose()
    }

    async fn list(
        &self,
        user_id: &UserId,
        filter: &TaskFilter,
    ) -> Result<(Vec<Task>, u64), TaskError> {
        let priority = filter.priority.map(|p| p.as_str().to_string());

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM tasks
            WHERE user_id = $1
              AND ($2::text IS NULL OR priority = $2)
              AND ($3::boolean IS NULL OR completed = $3)
            "#,
        )
        .bind(user_id.0)
        .bind(&priority)
        .bind(filter.completed)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        // Sort column and direction come from closed enums, never from
        // raw client input.
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            r#"
            SELECT {} FROM tasks
            WHERE user_id = $1
              AND ($2::text IS NULL OR priority = $2)
              AND ($3::boolean IS NULL OR completed = $3)
            ORDER BY {} {}
            LIMIT $4 OFFSET $5
            "#,
            TASK_COLUMNS,
            filter.sort_by.column(),
            filter.sort_order.keyword(),
        ))
        .bind(user_id.0)
        .bind(&priority)
        .bind(filter.completed)
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        let tasks = rows
            .into_iter()
            .map(Task::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((tasks, total as u64))
    }

    async fn update(&self, task: Task) -> Result<Task, TaskError> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET title = $3, description = $4, due_at = $5, priority = $6, completed = $7,
                updated_at = $8
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(task.id.0)
        .bind(task.user_id.0)
        .bind(task.title.as_str())
        .bind(&task.description)
        .bind(task.due_at)
        .bind(task.priority.as_str())
        .bind(task.completed)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(TaskError::NotFound(task.id.to_string()));
        }
        Ok(task)
    }

    async fn delete(&self, user_id: &UserId, task_id: &TaskId) -> Result<bool, TaskError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(task_id.0)
            .bind(user_id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}

use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::task::errors::PriorityError;
use crate::task::errors::TaskIdError;
use crate::task::errors::TitleError;
use crate::user::models::UserId;

/// Task unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub Uuid);

impl TaskId {
    /// Generate a new random task ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a task ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, TaskIdError> {
        Uuid::parse_str(s)
            .map(TaskId)
            .map_err(|e| TaskIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Eisenhower matrix priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    UrgentImportant,
    NotUrgentImportant,
    UrgentNotImportant,
    NotUrgentNotImportant,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::UrgentImportant => "urgent_important",
            Priority::NotUrgentImportant => "not_urgent_important",
            Priority::UrgentNotImportant => "urgent_not_important",
            Priority::NotUrgentNotImportant => "not_urgent_not_important",
        }
    }
}

impl FromStr for Priority {
    type Err = PriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "urgent_important" => Ok(Priority::UrgentImportant),
            "not_urgent_important" => Ok(Priority::NotUrgentImportant),
            "urgent_not_important" => Ok(Priority::UrgentNotImportant),
            "not_urgent_not_important" => Ok(Priority::NotUrgentNotImportant),
            other => Err(PriorityError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task title value type
///
/// Non-empty after trimming, at most 200 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title(String);

impl Title {
    const MAX_LENGTH: usize = 200;

    /// Create a validated title.
    ///
    /// # Errors
    /// * `Empty` - Title is blank
    /// * `TooLong` - Title exceeds 200 characters
    pub fn new(title: String) -> Result<Self, TitleError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(TitleError::Empty);
        }
        let length = trimmed.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(TitleError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Task aggregate entity, always owned by one user.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    pub user_id: UserId,
    pub title: Title,
    pub description: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Command to create a task.
#[derive(Debug)]
pub struct CreateTaskCommand {
    pub title: Title,
    pub description: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub priority: Priority,
}

/// Command to update a task. Only provided fields change.
#[derive(Debug, Default)]
pub struct UpdateTaskCommand {
    pub title: Option<Title>,
    pub description: Option<Option<String>>,
    pub due_at: Option<Option<DateTime<Utc>>>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
}

/// Sort key for task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskSortKey {
    #[default]
    CreatedAt,
    UpdatedAt,
    DueAt,
    Priority,
    Title,
}

impl TaskSortKey {
    /// Column name for the key; the set is closed so this is safe to
    /// splice into SQL.
    pub fn column(&self) -> &'static str {
        match self {
            TaskSortKey::CreatedAt => "created_at",
            TaskSortKey::UpdatedAt => "updated_at",
            TaskSortKey::DueAt => "due_at",
            TaskSortKey::Priority => "priority",
            TaskSortKey::Title => "title",
        }
    }
}

/// Sort direction for task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Filter, sort, and pagination for task listings.
#[derive(Debug, Clone)]
pub struct TaskFilter {
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
    pub sort_by: TaskSortKey,
    pub sort_order: SortOrder,
    pub limit: i64,
    pub offset: i64,
}

impl Default for TaskFilter {
    fn default() -> Self {
        Self {
            priority: None,
            completed: None,
            sort_by: TaskSortKey::default(),
            sort_order: SortOrder::default(),
            limit: 50,
            offset: 0,
        }
    }
}

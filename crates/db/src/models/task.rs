//! To-do task model and DTOs.

use chrono::NaiveDate;
use pathway_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub user_id: DbId,
    pub university_id: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: String,
    pub due_date: Option<NaiveDate>,
    pub is_completed: bool,
    /// Set exactly when `is_completed` is true.
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for creating a task.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub university_id: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    /// Defaults to `medium`.
    pub priority: Option<String>,
    pub due_date: Option<NaiveDate>,
}

/// DTO for updating a task. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub is_completed: Option<bool>,
}

/// List filters. Absent fields do not filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    pub category: Option<String>,
    pub is_completed: Option<bool>,
    pub university_id: Option<DbId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow, Serialize)]
pub struct TaskCounts {
    pub pending: i64,
    pub completed: i64,
}

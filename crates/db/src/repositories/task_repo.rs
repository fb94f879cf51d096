//! Repository for the `tasks` table.

use pathway_core::tasks::TaskDraft;
use pathway_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::task::{CreateTask, Task, TaskCounts, TaskFilter, UpdateTask};

const COLUMNS: &str = "id, user_id, university_id, title, description, category, priority, \
                       due_date, is_completed, completed_at, created_at";

/// High first, then newest.
const ORDER_BY: &str = "ORDER BY CASE priority WHEN 'high' THEN 0 WHEN 'medium' THEN 1 \
                        WHEN 'low' THEN 2 ELSE 3 END, created_at DESC, id DESC";

pub struct TaskRepo;

impl TaskRepo {
    pub async fn create(pool: &PgPool, user_id: DbId, input: &CreateTask) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (user_id, university_id, title, description, category, priority, due_date)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'medium'), $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .bind(input.university_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.priority)
            .bind(input.due_date)
            .fetch_one(pool)
            .await
    }

    /// Insert system-generated tasks inside an open transaction.
    pub(crate) async fn insert_drafts_in(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: DbId,
        drafts: &[TaskDraft],
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (user_id, university_id, title, description, category, priority)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let mut created = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let task = sqlx::query_as::<_, Task>(&query)
                .bind(user_id)
                .bind(draft.university_id)
                .bind(&draft.title)
                .bind(&draft.description)
                .bind(draft.category)
                .bind(draft.priority)
                .fetch_one(&mut **tx)
                .await?;
            created.push(task);
        }
        Ok(created)
    }

    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's tasks, high priority first, then newest.
    pub async fn list(
        pool: &PgPool,
        user_id: DbId,
        filter: &TaskFilter,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE user_id = $1
               AND ($2::text IS NULL OR category = $2)
               AND ($3::bool IS NULL OR is_completed = $3)
               AND ($4::bigint IS NULL OR university_id = $4)
             {ORDER_BY}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .bind(&filter.category)
            .bind(filter.is_completed)
            .bind(filter.university_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial update.
    ///
    /// When `input.is_completed` is set, `completed_at` is written as given
    /// so the caller decides whether to stamp, keep or clear it.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateTask,
        completed_at: Option<Timestamp>,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                category = COALESCE($5, category),
                priority = COALESCE($6, priority),
                due_date = COALESCE($7, due_date),
                is_completed = COALESCE($8, is_completed),
                completed_at = CASE WHEN $8::bool IS NULL THEN completed_at ELSE $9 END
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.priority)
            .bind(input.due_date)
            .bind(input.is_completed)
            .bind(completed_at)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete the user's incomplete tasks tied to a university.
    pub(crate) async fn delete_incomplete_for_university_in(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: DbId,
        university_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM tasks
             WHERE user_id = $1 AND university_id = $2 AND NOT is_completed",
        )
        .bind(user_id)
        .bind(university_id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn counts(pool: &PgPool, user_id: DbId) -> Result<TaskCounts, sqlx::Error> {
        sqlx::query_as::<_, TaskCounts>(
            "SELECT COUNT(*) FILTER (WHERE NOT is_completed) AS pending,
                    COUNT(*) FILTER (WHERE is_completed) AS completed
             FROM tasks
             WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}

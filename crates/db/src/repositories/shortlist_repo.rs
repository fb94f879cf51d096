//! Repository for the `shortlisted_universities` table.
//!
//! Lifecycle writes that touch more than one table (lock, unlock, add)
//! run in a single transaction together with the user's stage update.
//! Guards run against the row as seen inside the transaction, so a
//! concurrent change surfaces as `Ok(None)` rather than a partial write.

use pathway_core::stage;
use pathway_core::tasks::TaskDraft;
use pathway_core::types::DbId;
use sqlx::PgPool;

use crate::models::shortlist::{
    AddOutcome, CreateShortlistEntry, LockOutcome, ShortlistCounts, ShortlistEntry, UnlockOutcome,
};
use crate::repositories::{TaskRepo, UserRepo};

const COLUMNS: &str = "id, user_id, university_id, category, application_status, is_locked, \
                       locked_at, notes, created_at";

pub struct ShortlistRepo;

impl ShortlistRepo {
    /// Find the entry for a (user, university) pair.
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        university_id: DbId,
    ) -> Result<Option<ShortlistEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shortlisted_universities
             WHERE user_id = $1 AND university_id = $2"
        );
        sqlx::query_as::<_, ShortlistEntry>(&query)
            .bind(user_id)
            .bind(university_id)
            .fetch_optional(pool)
            .await
    }

    /// All entries for a user, oldest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ShortlistEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shortlisted_universities
             WHERE user_id = $1
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, ShortlistEntry>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn counts(pool: &PgPool, user_id: DbId) -> Result<ShortlistCounts, sqlx::Error> {
        sqlx::query_as::<_, ShortlistCounts>(
            "SELECT COUNT(*) AS shortlisted,
                    COUNT(*) FILTER (WHERE is_locked) AS locked
             FROM shortlisted_universities
             WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Insert a new entry and advance the stage to at least 3.
    ///
    /// A concurrent duplicate fails with a unique violation on
    /// `uq_shortlisted_universities_user_university`.
    pub async fn add(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateShortlistEntry,
    ) -> Result<AddOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO shortlisted_universities (user_id, university_id, category, notes)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let entry = sqlx::query_as::<_, ShortlistEntry>(&query)
            .bind(user_id)
            .bind(input.university_id)
            .bind(&input.category)
            .bind(&input.notes)
            .fetch_one(&mut *tx)
            .await?;

        let current = UserRepo::lock_stage_in(&mut tx, user_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        let current_stage = stage::after_shortlist(current);
        UserRepo::set_stage_in(&mut tx, user_id, current_stage).await?;

        tx.commit().await?;
        Ok(AddOutcome {
            entry,
            current_stage,
        })
    }

    /// Delete an unlocked entry. Returns `false` when nothing was deleted
    /// (absent, or locked in the meantime). The stage is left unchanged.
    pub async fn remove(pool: &PgPool, user_id: DbId, university_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM shortlisted_universities
             WHERE user_id = $1 AND university_id = $2 AND NOT is_locked",
        )
        .bind(user_id)
        .bind(university_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Lock a shortlisted entry, create its application tasks and move the
    /// user to the final stage.
    ///
    /// Returns `None` if the entry is absent or already locked.
    pub async fn lock(
        pool: &PgPool,
        user_id: DbId,
        university_id: DbId,
        tasks: &[TaskDraft],
    ) -> Result<Option<LockOutcome>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE shortlisted_universities SET is_locked = TRUE, locked_at = NOW()
             WHERE user_id = $1 AND university_id = $2 AND NOT is_locked
             RETURNING {COLUMNS}"
        );
        let Some(entry) = sqlx::query_as::<_, ShortlistEntry>(&query)
            .bind(user_id)
            .bind(university_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        let tasks_created = TaskRepo::insert_drafts_in(&mut tx, user_id, tasks).await?;

        let current = UserRepo::lock_stage_in(&mut tx, user_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        let current_stage = stage::after_lock(current);
        UserRepo::set_stage_in(&mut tx, user_id, current_stage).await?;

        tx.commit().await?;
        Ok(Some(LockOutcome {
            entry,
            tasks_created,
            current_stage,
        }))
    }

    /// Unlock a locked entry, drop its incomplete tasks and recompute the
    /// stage from the remaining locked count.
    ///
    /// Completed tasks for the university survive. Returns `None` if the
    /// entry is absent or not locked.
    pub async fn unlock(
        pool: &PgPool,
        user_id: DbId,
        university_id: DbId,
    ) -> Result<Option<UnlockOutcome>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE shortlisted_universities SET is_locked = FALSE, locked_at = NULL
             WHERE user_id = $1 AND university_id = $2 AND is_locked
             RETURNING {COLUMNS}"
        );
        let Some(entry) = sqlx::query_as::<_, ShortlistEntry>(&query)
            .bind(user_id)
            .bind(university_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        let tasks_removed =
            TaskRepo::delete_incomplete_for_university_in(&mut tx, user_id, university_id).await?;

        let remaining_locked: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM shortlisted_universities WHERE user_id = $1 AND is_locked",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        let current = UserRepo::lock_stage_in(&mut tx, user_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        let current_stage = stage::after_unlock(current, remaining_locked);
        UserRepo::set_stage_in(&mut tx, user_id, current_stage).await?;

        tx.commit().await?;
        Ok(Some(UnlockOutcome {
            entry,
            tasks_removed,
            remaining_locked,
            current_stage,
        }))
    }

    /// Set the application status on a user's entry by entry id.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        status: &str,
    ) -> Result<Option<ShortlistEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE shortlisted_universities SET application_status = $3
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ShortlistEntry>(&query)
            .bind(id)
            .bind(user_id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }
}

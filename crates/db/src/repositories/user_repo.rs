//! Repository for the `users` table.

use pathway_core::stage::JourneyStage;
use pathway_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, UpdateUser, User};

const COLUMNS: &str = "id, email, password_hash, full_name, onboarding_completed, \
                       current_stage, created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    /// Insert a user together with its empty profile in one transaction.
    ///
    /// A duplicate email fails with a unique violation on `uq_users_email`.
    pub async fn create_with_profile(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO users (email, password_hash, full_name)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.full_name)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO profiles (user_id) VALUES ($1)")
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(user)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Look up by email. Emails are stored lower-cased.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email.to_lowercase())
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET full_name = COALESCE($2, full_name)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.full_name)
            .fetch_optional(pool)
            .await
    }

    /// Mark onboarding complete and move the stage to at least 2.
    pub async fn mark_onboarded(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let user = Self::mark_onboarded_in(&mut tx, id).await?;
        tx.commit().await?;
        Ok(user)
    }

    pub(crate) async fn mark_onboarded_in(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let Some(current) = Self::lock_stage_in(tx, id).await? else {
            return Ok(None);
        };
        let stage = pathway_core::stage::after_onboarding(current);

        let query = format!(
            "UPDATE users SET onboarding_completed = TRUE, current_stage = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(stage.as_i32())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Read the user's stage, holding a row lock until the transaction ends.
    pub(crate) async fn lock_stage_in(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> Result<Option<JourneyStage>, sqlx::Error> {
        let stage: Option<i32> =
            sqlx::query_scalar("SELECT current_stage FROM users WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut **tx)
                .await?;
        Ok(stage.map(JourneyStage::from_i32_lossy))
    }

    pub(crate) async fn set_stage_in(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        stage: JourneyStage,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET current_stage = $2 WHERE id = $1")
            .bind(id)
            .bind(stage.as_i32())
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}

//! Repository for the `profiles` table.

use pathway_core::profile::initial_tasks;
use pathway_core::types::DbId;
use sqlx::PgPool;

use crate::models::profile::{Profile, UpdateProfile};
use crate::models::task::Task;
use crate::models::user::User;
use crate::repositories::{TaskRepo, UserRepo};

const COLUMNS: &str = "id, user_id, education_level, degree, major, graduation_year, gpa, \
                       intended_degree, field_of_study, target_intake, preferred_countries, \
                       budget_min, budget_max, funding_type, ielts_status, ielts_score, \
                       toefl_status, toefl_score, gre_status, gre_score, gmat_status, \
                       gmat_score, sop_status, created_at, updated_at";

/// Result of completing onboarding.
#[derive(Debug, Clone)]
pub struct OnboardingOutcome {
    pub profile: Profile,
    pub user: User,
    pub tasks_created: Vec<Task>,
}

pub struct ProfileRepo;

impl ProfileRepo {
    pub async fn find_by_user(pool: &PgPool, user_id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE user_id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Apply a partial update. Only non-`None` fields are written; a user
    /// without a profile row gets one created first.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdateProfile,
    ) -> Result<Profile, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let profile = Self::update_in(&mut tx, user_id, input).await?;
        tx.commit().await?;
        Ok(profile)
    }

    /// Merge the onboarding answers, mark the user onboarded and create the
    /// initial task set, all in one transaction.
    pub async fn complete_onboarding(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdateProfile,
    ) -> Result<OnboardingOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let profile = Self::update_in(&mut tx, user_id, input).await?;
        let user = UserRepo::mark_onboarded_in(&mut tx, user_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        let drafts = initial_tasks(&profile.summary());
        let tasks_created = TaskRepo::insert_drafts_in(&mut tx, user_id, &drafts).await?;

        tx.commit().await?;
        Ok(OnboardingOutcome {
            profile,
            user,
            tasks_created,
        })
    }

    pub(crate) async fn update_in(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: DbId,
        input: &UpdateProfile,
    ) -> Result<Profile, sqlx::Error> {
        sqlx::query("INSERT INTO profiles (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(&mut **tx)
            .await?;

        let query = format!(
            "UPDATE profiles SET
                education_level = COALESCE($2, education_level),
                degree = COALESCE($3, degree),
                major = COALESCE($4, major),
                graduation_year = COALESCE($5, graduation_year),
                gpa = COALESCE($6, gpa),
                intended_degree = COALESCE($7, intended_degree),
                field_of_study = COALESCE($8, field_of_study),
                target_intake = COALESCE($9, target_intake),
                preferred_countries = COALESCE($10, preferred_countries),
                budget_min = COALESCE($11, budget_min),
                budget_max = COALESCE($12, budget_max),
                funding_type = COALESCE($13, funding_type),
                ielts_status = COALESCE($14, ielts_status),
                ielts_score = COALESCE($15, ielts_score),
                toefl_status = COALESCE($16, toefl_status),
                toefl_score = COALESCE($17, toefl_score),
                gre_status = COALESCE($18, gre_status),
                gre_score = COALESCE($19, gre_score),
                gmat_status = COALESCE($20, gmat_status),
                gmat_score = COALESCE($21, gmat_score),
                sop_status = COALESCE($22, sop_status)
             WHERE user_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .bind(&input.education_level)
            .bind(&input.degree)
            .bind(&input.major)
            .bind(input.graduation_year)
            .bind(input.gpa)
            .bind(&input.intended_degree)
            .bind(&input.field_of_study)
            .bind(&input.target_intake)
            .bind(&input.preferred_countries)
            .bind(input.budget_min)
            .bind(input.budget_max)
            .bind(&input.funding_type)
            .bind(&input.ielts_status)
            .bind(input.ielts_score)
            .bind(&input.toefl_status)
            .bind(input.toefl_score)
            .bind(&input.gre_status)
            .bind(input.gre_score)
            .bind(&input.gmat_status)
            .bind(input.gmat_score)
            .bind(&input.sop_status)
            .fetch_one(&mut **tx)
            .await
    }
}

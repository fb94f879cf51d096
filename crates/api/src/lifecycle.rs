//! Shortlist lifecycle commands shared by the shortlist routes and the
//! counsellor's action routes.
//!
//! Each command reads the current (user, university) state, applies the
//! matching guard from [`pathway_core::shortlist`], then runs the
//! transactional write. A write that finds the state changed underneath it
//! reports the same conflict the guard would have.

use pathway_core::error::CoreError;
use pathway_core::fit::{assess_fit, validate_category};
use pathway_core::shortlist::{
    application_tasks, check_add, check_lock, check_remove, check_unlock,
};
use pathway_core::types::DbId;
use pathway_db::models::shortlist::{
    state_of, AddOutcome, CreateShortlistEntry, LockOutcome, UnlockOutcome,
};
use pathway_db::models::university::University;
use pathway_db::repositories::{ProfileRepo, ShortlistRepo, UniversityRepo};
use pathway_db::DbPool;

use crate::error::{AppError, AppResult};

/// Load a catalog entry or fail with NotFound.
pub async fn find_university(pool: &DbPool, university_id: DbId) -> AppResult<University> {
    UniversityRepo::find_by_id(pool, university_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found(
            "University",
            university_id,
        )))
}

/// Absent -> Shortlisted.
///
/// Without an explicit category the fit scorer's category for the user's
/// current profile is stored.
pub async fn add(
    pool: &DbPool,
    user_id: DbId,
    university_id: DbId,
    category: Option<&str>,
    notes: Option<String>,
) -> AppResult<(AddOutcome, University)> {
    let university = find_university(pool, university_id).await?;

    let existing = ShortlistRepo::find(pool, user_id, university_id).await?;
    check_add(state_of(existing.as_ref()))?;

    let category = match category {
        Some(c) => {
            validate_category(c).map_err(CoreError::Validation)?;
            c.to_string()
        }
        None => {
            let profile = ProfileRepo::find_by_user(pool, user_id).await?;
            let applicant = profile.as_ref().map(|p| p.summary().applicant_facts());
            assess_fit(&university.facts(), applicant.as_ref())
                .category
                .as_str()
                .to_string()
        }
    };

    let input = CreateShortlistEntry {
        university_id,
        category,
        notes,
    };
    let outcome = ShortlistRepo::add(pool, user_id, &input).await?;

    tracing::info!(
        user_id,
        university_id,
        category = %outcome.entry.category.as_deref().unwrap_or_default(),
        stage = outcome.current_stage.as_i32(),
        "University shortlisted"
    );
    Ok((outcome, university))
}

/// Shortlisted -> Absent. Locked entries are refused.
pub async fn remove(pool: &DbPool, user_id: DbId, university_id: DbId) -> AppResult<()> {
    let existing = ShortlistRepo::find(pool, user_id, university_id).await?;
    check_remove(state_of(existing.as_ref()), university_id)?;

    if !ShortlistRepo::remove(pool, user_id, university_id).await? {
        // Locked or removed between the read and the delete.
        let current = ShortlistRepo::find(pool, user_id, university_id).await?;
        check_remove(state_of(current.as_ref()), university_id)?;
    }

    tracing::info!(user_id, university_id, "University removed from shortlist");
    Ok(())
}

/// Shortlisted -> Locked, generating the application tasks.
pub async fn lock(pool: &DbPool, user_id: DbId, university_id: DbId) -> AppResult<LockOutcome> {
    let existing = ShortlistRepo::find(pool, user_id, university_id).await?;
    check_lock(state_of(existing.as_ref()), university_id)?;

    let university = find_university(pool, university_id).await?;
    let drafts = application_tasks(university_id, &university.name);

    let outcome = ShortlistRepo::lock(pool, user_id, university_id, &drafts)
        .await?
        .ok_or_else(|| CoreError::Conflict("University already locked".into()))?;

    tracing::info!(
        user_id,
        university_id,
        tasks_created = outcome.tasks_created.len(),
        stage = outcome.current_stage.as_i32(),
        "University locked"
    );
    Ok(outcome)
}

/// Locked -> Shortlisted. Requires `confirmed`; drops incomplete tasks for
/// the university.
pub async fn unlock(
    pool: &DbPool,
    user_id: DbId,
    university_id: DbId,
    confirmed: bool,
) -> AppResult<UnlockOutcome> {
    let existing = ShortlistRepo::find(pool, user_id, university_id).await?;
    check_unlock(state_of(existing.as_ref()), confirmed, university_id)?;

    let outcome = ShortlistRepo::unlock(pool, user_id, university_id)
        .await?
        .ok_or_else(|| CoreError::Conflict("University is not locked".into()))?;

    tracing::info!(
        user_id,
        university_id,
        tasks_removed = outcome.tasks_removed,
        remaining_locked = outcome.remaining_locked,
        stage = outcome.current_stage.as_i32(),
        "University unlocked"
    );
    Ok(outcome)
}

//! Handlers for the shortlist lifecycle under `/universities`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pathway_core::error::CoreError;
use pathway_core::shortlist::validate_application_status;
use pathway_core::stage::JourneyStage;
use pathway_core::types::DbId;
use pathway_db::models::shortlist::{ShortlistEntry, ShortlistEntryWithUniversity};
use pathway_db::models::task::Task;
use pathway_db::models::university::rank_by_fit;
use pathway_db::repositories::{ProfileRepo, ShortlistRepo, UniversityRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::lifecycle;
use crate::middleware::auth::AuthUser;
use crate::response::MessageResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct AddShortlistRequest {
    pub university_id: DbId,
    pub category: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LockRequest {
    pub university_id: DbId,
}

#[derive(Debug, Deserialize)]
pub struct UnlockRequest {
    pub university_id: DbId,
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct AddShortlistResponse {
    #[serde(flatten)]
    pub shortlisted: ShortlistEntryWithUniversity,
    pub current_stage: JourneyStage,
}

#[derive(Debug, Serialize)]
pub struct LockResponse {
    pub message: String,
    pub university_id: DbId,
    pub tasks_created: Vec<Task>,
    pub current_stage: JourneyStage,
}

#[derive(Debug, Serialize)]
pub struct UnlockResponse {
    pub message: String,
    pub warning: String,
    pub university_id: DbId,
    pub tasks_removed: u64,
    pub current_stage: JourneyStage,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: String,
    pub status: String,
    pub entry: ShortlistEntry,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/universities/shortlist
///
/// Entries in insertion order, each with its scored university.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<ShortlistEntryWithUniversity>>> {
    let entries = ShortlistRepo::list_for_user(&state.pool, auth.user_id).await?;
    let ids: Vec<DbId> = entries.iter().map(|e| e.university_id).collect();
    let universities = UniversityRepo::find_by_ids(&state.pool, &ids).await?;

    let profile = ProfileRepo::find_by_user(&state.pool, auth.user_id).await?;
    let applicant = profile.as_ref().map(|p| p.summary().applicant_facts());
    let mut scored = rank_by_fit(universities, applicant.as_ref());

    let result = entries
        .into_iter()
        .filter_map(|entry| {
            let pos = scored
                .iter()
                .position(|s| s.university.id == entry.university_id)?;
            Some(ShortlistEntryWithUniversity {
                entry,
                university: scored.swap_remove(pos),
            })
        })
        .collect();
    Ok(Json(result))
}

/// POST /api/universities/shortlist
pub async fn add(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<AddShortlistRequest>,
) -> AppResult<(StatusCode, Json<AddShortlistResponse>)> {
    let (outcome, university) = lifecycle::add(
        &state.pool,
        auth.user_id,
        input.university_id,
        input.category.as_deref(),
        input.notes,
    )
    .await?;

    let profile = ProfileRepo::find_by_user(&state.pool, auth.user_id).await?;
    let applicant = profile.as_ref().map(|p| p.summary().applicant_facts());

    Ok((
        StatusCode::CREATED,
        Json(AddShortlistResponse {
            shortlisted: ShortlistEntryWithUniversity {
                entry: outcome.entry,
                university: university.assess(applicant.as_ref()),
            },
            current_stage: outcome.current_stage,
        }),
    ))
}

/// DELETE /api/universities/shortlist/{university_id}
pub async fn remove(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(university_id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    lifecycle::remove(&state.pool, auth.user_id, university_id).await?;
    Ok(Json(MessageResponse::new("University removed from shortlist")))
}

/// POST /api/universities/lock
pub async fn lock(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<LockRequest>,
) -> AppResult<Json<LockResponse>> {
    let outcome = lifecycle::lock(&state.pool, auth.user_id, input.university_id).await?;
    Ok(Json(LockResponse {
        message: "University locked successfully. Application guidance is now available."
            .into(),
        university_id: input.university_id,
        tasks_created: outcome.tasks_created,
        current_stage: outcome.current_stage,
    }))
}

/// POST /api/universities/unlock
pub async fn unlock(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UnlockRequest>,
) -> AppResult<Json<UnlockResponse>> {
    let outcome =
        lifecycle::unlock(&state.pool, auth.user_id, input.university_id, input.confirm).await?;
    Ok(Json(UnlockResponse {
        message: "University unlocked. Associated incomplete tasks have been removed.".into(),
        warning: "You may need to lock a university again to access application guidance."
            .into(),
        university_id: input.university_id,
        tasks_removed: outcome.tasks_removed,
        current_stage: outcome.current_stage,
    }))
}

/// PUT /api/universities/shortlist/{id}/status
///
/// `id` is the shortlist entry id, not the university id.
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<StatusRequest>,
) -> AppResult<Json<StatusResponse>> {
    validate_application_status(&input.status)?;

    let entry = ShortlistRepo::update_status(&state.pool, id, auth.user_id, &input.status)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("ShortlistEntry", id)))?;

    tracing::info!(
        user_id = auth.user_id,
        entry_id = id,
        status = %entry.application_status,
        "Application status updated"
    );
    Ok(Json(StatusResponse {
        message: "Application status updated".into(),
        status: entry.application_status.clone(),
        entry,
    }))
}

//! Handlers for the `/profile` resource: the applicant profile, onboarding
//! completion, strength summary and dashboard.

use axum::extract::State;
use axum::Json;
use pathway_core::error::CoreError;
use pathway_core::profile::{profile_strength, ProfileStrength};
use pathway_db::models::profile::{Profile, UpdateProfile};
use pathway_db::models::task::{Task, TaskFilter};
use pathway_db::models::user::User;
use pathway_db::repositories::{ProfileRepo, ShortlistRepo, TaskRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::auth::current_user;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /profile/onboarding/complete`.
#[derive(Debug, Deserialize)]
pub struct OnboardingRequest {
    #[serde(default)]
    pub profile: UpdateProfile,
}

#[derive(Debug, Serialize)]
pub struct OnboardingResponse {
    pub profile: Profile,
    pub user: User,
    pub tasks_created: Vec<Task>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub user: User,
    pub profile: Option<Profile>,
    pub profile_strength: Option<ProfileStrength>,
    pub shortlisted_count: i64,
    pub locked_count: i64,
    pub pending_tasks: i64,
    pub completed_tasks: i64,
    /// Incomplete tasks, highest priority first.
    pub recent_tasks: Vec<Task>,
}

/// GET /api/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Profile>> {
    let profile = load_profile(&state, auth).await?;
    Ok(Json(profile))
}

/// PUT /api/profile
///
/// Only fields present in the body change.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpdateProfile>,
) -> AppResult<Json<Profile>> {
    input.validate()?;
    check_budget_range(&state, auth, &input).await?;
    let profile = ProfileRepo::update(&state.pool, auth.user_id, &input).await?;
    tracing::info!(user_id = auth.user_id, "Profile updated");
    Ok(Json(profile))
}

/// POST /api/profile/onboarding/complete
pub async fn complete_onboarding(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<OnboardingRequest>,
) -> AppResult<Json<OnboardingResponse>> {
    input.profile.validate()?;
    check_budget_range(&state, auth, &input.profile).await?;
    let outcome = ProfileRepo::complete_onboarding(&state.pool, auth.user_id, &input.profile)
        .await?;

    tracing::info!(
        user_id = auth.user_id,
        stage = outcome.user.current_stage,
        tasks_created = outcome.tasks_created.len(),
        "Onboarding completed"
    );
    Ok(Json(OnboardingResponse {
        profile: outcome.profile,
        user: outcome.user,
        tasks_created: outcome.tasks_created,
    }))
}

/// GET /api/profile/strength
pub async fn get_strength(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<ProfileStrength>> {
    let profile = load_profile(&state, auth).await?;
    Ok(Json(profile_strength(&profile.summary())))
}

/// GET /api/profile/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DashboardResponse>> {
    let user = current_user(&state, auth).await?;
    let profile = ProfileRepo::find_by_user(&state.pool, auth.user_id).await?;
    let strength = profile.as_ref().map(|p| profile_strength(&p.summary()));

    let shortlist = ShortlistRepo::counts(&state.pool, auth.user_id).await?;
    let tasks = TaskRepo::counts(&state.pool, auth.user_id).await?;
    let pending = TaskFilter {
        is_completed: Some(false),
        ..TaskFilter::default()
    };
    let recent_tasks = TaskRepo::list(&state.pool, auth.user_id, &pending).await?;

    Ok(Json(DashboardResponse {
        user,
        profile,
        profile_strength: strength,
        shortlisted_count: shortlist.shortlisted,
        locked_count: shortlist.locked,
        pending_tasks: tasks.pending,
        completed_tasks: tasks.completed,
        recent_tasks,
    }))
}

async fn load_profile(state: &AppState, auth: AuthUser) -> AppResult<Profile> {
    ProfileRepo::find_by_user(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Profile", auth.user_id)))
}

/// The budget range must stay ordered after the patch is merged.
async fn check_budget_range(
    state: &AppState,
    auth: AuthUser,
    patch: &UpdateProfile,
) -> AppResult<()> {
    if patch.budget_min.is_none() && patch.budget_max.is_none() {
        return Ok(());
    }
    let stored = ProfileRepo::find_by_user(&state.pool, auth.user_id).await?;
    let (min, max) = stored.map_or((None, None), |p| (p.budget_min, p.budget_max));
    patch.validate_budget_over(min, max)?;
    Ok(())
}

//! Handlers for the university catalog: filtered listing, recommendations
//! and single entries, each annotated with the caller's fit.

use axum::extract::{Path, Query, State};
use axum::Json;
use pathway_core::error::CoreError;
use pathway_core::fit::recommendation_tuition_ceiling;
use pathway_core::types::DbId;
use pathway_db::models::university::{rank_by_fit, ScoredUniversity, UniversityFilter};
use pathway_db::repositories::{ProfileRepo, UniversityRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::auth::current_user;
use crate::lifecycle::find_university;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/universities?country=&budget_max=&program=
///
/// Sorted by fit score, best first.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(filter): Query<UniversityFilter>,
) -> AppResult<Json<Vec<ScoredUniversity>>> {
    let universities = UniversityRepo::list(&state.pool, &filter).await?;
    let profile = ProfileRepo::find_by_user(&state.pool, auth.user_id).await?;
    let applicant = profile.as_ref().map(|p| p.summary().applicant_facts());

    tracing::debug!(user_id = auth.user_id, count = universities.len(), "Listing universities");
    Ok(Json(rank_by_fit(universities, applicant.as_ref())))
}

/// GET /api/universities/recommendations
///
/// Requires completed onboarding. Keeps universities whose maximum tuition
/// is within 120% of the budget and whose country is preferred.
pub async fn recommendations(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<ScoredUniversity>>> {
    let user = current_user(&state, auth).await?;
    if !user.onboarding_completed {
        return Err(AppError::Core(CoreError::Validation(
            "Please complete onboarding first".into(),
        )));
    }

    let profile = ProfileRepo::find_by_user(&state.pool, auth.user_id).await?;
    let (ceiling, countries) = match &profile {
        Some(p) => (
            p.budget_max
                .filter(|b| *b > 0)
                .map(recommendation_tuition_ceiling),
            p.preferred_countries.as_slice(),
        ),
        None => (None, &[][..]),
    };

    let candidates = UniversityRepo::list_candidates(&state.pool, ceiling, countries).await?;
    let applicant = profile.as_ref().map(|p| p.summary().applicant_facts());

    tracing::debug!(user_id = auth.user_id, count = candidates.len(), "Recommending universities");
    Ok(Json(rank_by_fit(candidates, applicant.as_ref())))
}

/// GET /api/universities/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ScoredUniversity>> {
    let university = find_university(&state.pool, id).await?;
    let profile = ProfileRepo::find_by_user(&state.pool, auth.user_id).await?;
    let applicant = profile.as_ref().map(|p| p.summary().applicant_facts());
    Ok(Json(university.assess(applicant.as_ref())))
}

//! Route definitions for the `/profile` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::profile;
use crate::state::AppState;

/// Routes mounted at `/profile`.
///
/// ```text
/// GET  /                       -> get_profile
/// PUT  /                       -> update_profile
/// POST /onboarding/complete    -> complete_onboarding
/// GET  /strength               -> get_strength
/// GET  /dashboard              -> get_dashboard
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(profile::get_profile).put(profile::update_profile))
        .route("/onboarding/complete", post(profile::complete_onboarding))
        .route("/strength", get(profile::get_strength))
        .route("/dashboard", get(profile::get_dashboard))
}

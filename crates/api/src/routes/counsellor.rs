//! Route definitions for the `/counsellor` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::counsellor;
use crate::state::AppState;

/// Routes mounted at `/counsellor`.
///
/// ```text
/// POST   /chat                  -> chat
/// POST   /voice-onboarding      -> voice_onboarding
/// POST   /action/shortlist      -> shortlist_action
/// POST   /action/lock           -> lock_action
/// POST   /action/create-task    -> create_task_action
/// GET    /history               -> history
/// DELETE /history               -> clear_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chat", post(counsellor::chat))
        .route("/voice-onboarding", post(counsellor::voice_onboarding))
        .route("/action/shortlist", post(counsellor::shortlist_action))
        .route("/action/lock", post(counsellor::lock_action))
        .route("/action/create-task", post(counsellor::create_task_action))
        .route(
            "/history",
            get(counsellor::history).delete(counsellor::clear_history),
        )
}

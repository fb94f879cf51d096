//! Handlers for the `/counsellor` resource: chat, voice onboarding, the
//! actions the assistant can take for the user, and conversation history.

use axum::extract::{Query, State};
use axum::Json;
use pathway_core::counsellor::{
    onboarding_required_reply, ChatContext, ChatReply, ChatTurn, PendingTaskSummary,
    ShortlistSummary, CONTEXT_HISTORY_TURNS, ROLE_ASSISTANT, ROLE_USER,
};
use pathway_core::error::CoreError;
use pathway_core::profile::ProfilePatch;
use pathway_core::tasks::{validate_priority, validate_title, CATEGORY_GENERAL};
use pathway_core::types::DbId;
use pathway_core::voice::VoiceReply;
use pathway_db::models::conversation::ConversationMessage;
use pathway_db::models::task::{CreateTask, TaskFilter};
use pathway_db::models::user::User;
use pathway_db::repositories::{
    ConversationRepo, ProfileRepo, ShortlistRepo, TaskRepo, UniversityRepo, UserRepo,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::auth::current_user;
use crate::lifecycle;
use crate::middleware::auth::AuthUser;
use crate::response::MessageResponse;
use crate::state::AppState;

/// Default and upper bound for `GET /counsellor/history?limit=`.
const DEFAULT_HISTORY_LIMIT: i64 = 50;
const MAX_HISTORY_LIMIT: i64 = 500;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct VoiceRequest {
    pub transcript: String,
    pub current_step: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UniversityActionRequest {
    pub university_id: DbId,
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskActionRequest {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// Outcome of an assistant-initiated action. Lifecycle refusals are
/// reported with `success: false` rather than as errors.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub message: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<DbId>,
}

impl ActionResponse {
    fn ok(message: String) -> Self {
        Self {
            message,
            success: true,
            task_id: None,
        }
    }

    fn refused(message: String) -> Self {
        Self {
            message,
            success: false,
            task_id: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// POST /api/counsellor/chat
///
/// Before onboarding is complete a fixed reply is returned and nothing is
/// stored. Otherwise both turns are persisted.
pub async fn chat(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<ChatRequest>,
) -> AppResult<Json<ChatReply>> {
    let message = input.message.trim();
    if message.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Message must not be empty".into(),
        )));
    }

    let user = current_user(&state, auth).await?;
    if !user.onboarding_completed {
        return Ok(Json(onboarding_required_reply()));
    }

    let context = build_context(&state, &user).await?;
    ConversationRepo::append(&state.pool, user.id, ROLE_USER, message).await?;

    let reply = state.counsellor.chat(message, &context).await;

    ConversationRepo::append(&state.pool, user.id, ROLE_ASSISTANT, &reply.message).await?;
    tracing::info!(
        user_id = user.id,
        stage = user.current_stage,
        actions = reply.actions.as_ref().map_or(0, Vec::len),
        "Counsellor replied"
    );
    Ok(Json(reply))
}

/// Everything the counsellor sees: profile, shortlist with names, pending
/// tasks and the most recent turns (excluding the message being answered).
async fn build_context(state: &AppState, user: &User) -> AppResult<ChatContext> {
    let profile = ProfileRepo::find_by_user(&state.pool, user.id).await?;

    let entries = ShortlistRepo::list_for_user(&state.pool, user.id).await?;
    let ids: Vec<DbId> = entries.iter().map(|e| e.university_id).collect();
    let universities = UniversityRepo::find_by_ids(&state.pool, &ids).await?;
    let shortlisted = entries
        .iter()
        .filter_map(|entry| {
            let uni = universities.iter().find(|u| u.id == entry.university_id)?;
            Some(ShortlistSummary {
                name: uni.name.clone(),
                country: uni.country.clone(),
                category: entry.category.clone(),
                is_locked: entry.is_locked,
            })
        })
        .collect();

    let pending_filter = TaskFilter {
        is_completed: Some(false),
        ..TaskFilter::default()
    };
    let pending_tasks = TaskRepo::list(&state.pool, user.id, &pending_filter)
        .await?
        .into_iter()
        .map(|t| PendingTaskSummary {
            title: t.title,
            category: t.category,
            priority: t.priority,
        })
        .collect();

    let history = ConversationRepo::recent(&state.pool, user.id, CONTEXT_HISTORY_TURNS)
        .await?
        .into_iter()
        .map(ChatTurn::from)
        .collect();

    Ok(ChatContext {
        user_name: user.full_name.clone(),
        current_stage: user.stage(),
        profile: profile.as_ref().map(|p| p.snapshot()),
        shortlisted,
        pending_tasks,
        history,
    })
}

// ---------------------------------------------------------------------------
// Voice onboarding
// ---------------------------------------------------------------------------

/// POST /api/counsellor/voice-onboarding
///
/// Extracted answers are merged into the profile through the allow-listed
/// patch. The final step marks onboarding complete.
pub async fn voice_onboarding(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<VoiceRequest>,
) -> AppResult<Json<VoiceReply>> {
    let stored = ProfileRepo::find_by_user(&state.pool, auth.user_id).await?;
    let snapshot = stored.as_ref().map(|p| p.snapshot()).unwrap_or_default();

    let reply = state
        .counsellor
        .voice_onboarding(&input.transcript, input.current_step.as_deref(), &snapshot)
        .await;

    let mut patch = ProfilePatch::from_extracted(&reply.extracted_data);
    let (stored_min, stored_max) = stored
        .as_ref()
        .map_or((None, None), |p| (p.budget_min, p.budget_max));
    if patch.validate_budget_over(stored_min, stored_max).is_err() {
        tracing::debug!(user_id = auth.user_id, "Dropping extracted budget that inverts the stored range");
        patch.budget_min = None;
        patch.budget_max = None;
    }
    if !patch.is_empty() {
        ProfileRepo::update(&state.pool, auth.user_id, &patch).await?;
        tracing::debug!(user_id = auth.user_id, "Voice onboarding answers saved");
    }

    if reply.is_complete {
        UserRepo::mark_onboarded(&state.pool, auth.user_id)
            .await?
            .ok_or(AppError::Core(CoreError::not_found("User", auth.user_id)))?;
        tracing::info!(user_id = auth.user_id, "Voice onboarding completed");
    }

    Ok(Json(reply))
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// POST /api/counsellor/action/shortlist
pub async fn shortlist_action(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UniversityActionRequest>,
) -> AppResult<Json<ActionResponse>> {
    let university = lifecycle::find_university(&state.pool, input.university_id).await?;

    match lifecycle::add(&state.pool, auth.user_id, input.university_id, None, None).await {
        Ok(_) => Ok(Json(ActionResponse::ok(format!(
            "Added {} to your shortlist!",
            university.name
        )))),
        Err(e) if is_duplicate(&e) => Ok(Json(ActionResponse::refused(format!(
            "{} is already in your shortlist",
            university.name
        )))),
        Err(e) => Err(e),
    }
}

/// POST /api/counsellor/action/lock
///
/// Runs the full lock transition, application tasks included.
pub async fn lock_action(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UniversityActionRequest>,
) -> AppResult<Json<ActionResponse>> {
    match lifecycle::lock(&state.pool, auth.user_id, input.university_id).await {
        Ok(_) => {
            let university = lifecycle::find_university(&state.pool, input.university_id).await?;
            Ok(Json(ActionResponse::ok(format!(
                "Locked {}! Application guidance is now available.",
                university.name
            ))))
        }
        Err(AppError::Core(CoreError::NotFound { .. })) => Ok(Json(ActionResponse::refused(
            "Please add this university to your shortlist first".into(),
        ))),
        Err(AppError::Core(CoreError::Conflict(_))) => Ok(Json(ActionResponse::refused(
            "This university is already locked".into(),
        ))),
        Err(e) => Err(e),
    }
}

/// POST /api/counsellor/action/create-task
pub async fn create_task_action(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateTaskActionRequest>,
) -> AppResult<Json<ActionResponse>> {
    validate_title(&input.title)?;
    if let Some(priority) = &input.priority {
        validate_priority(priority)?;
    }

    let title = input.title.trim().to_string();
    let task = TaskRepo::create(
        &state.pool,
        auth.user_id,
        &CreateTask {
            university_id: None,
            title: title.clone(),
            description: input.description,
            category: Some(CATEGORY_GENERAL.to_string()),
            priority: input.priority,
            due_date: None,
        },
    )
    .await?;

    tracing::info!(user_id = auth.user_id, task_id = task.id, "Task created by counsellor");
    Ok(Json(ActionResponse {
        message: format!("Created task: {title}"),
        success: true,
        task_id: Some(task.id),
    }))
}

/// A shortlist conflict, whether caught by the guard or, under a race, by
/// the unique constraint.
fn is_duplicate(err: &AppError) -> bool {
    match err {
        AppError::Core(CoreError::Conflict(_)) => true,
        AppError::Database(sqlx::Error::Database(db_err)) => {
            db_err.code().as_deref() == Some("23505")
        }
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// GET /api/counsellor/history?limit=50
///
/// The most recent turns, oldest first.
pub async fn history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<ConversationMessage>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);
    let turns = ConversationRepo::recent(&state.pool, auth.user_id, limit).await?;
    Ok(Json(turns))
}

/// DELETE /api/counsellor/history
pub async fn clear_history(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<MessageResponse>> {
    let removed = ConversationRepo::clear(&state.pool, auth.user_id).await?;
    tracing::info!(user_id = auth.user_id, removed, "Conversation history cleared");
    Ok(Json(MessageResponse::new("Conversation history cleared")))
}

//! Handlers for the `/tasks` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use pathway_core::error::CoreError;
use pathway_core::tasks::{resolve_completed_at, validate_category, validate_priority, validate_title};
use pathway_core::types::DbId;
use pathway_db::models::task::{CreateTask, Task, TaskFilter, UpdateTask};
use pathway_db::repositories::TaskRepo;

use crate::error::{AppError, AppResult};
use crate::lifecycle;
use crate::middleware::auth::AuthUser;
use crate::response::MessageResponse;
use crate::state::AppState;

/// GET /api/tasks?category=&is_completed=&university_id=
///
/// High priority first, then newest first.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(filter): Query<TaskFilter>,
) -> AppResult<Json<Vec<Task>>> {
    let tasks = TaskRepo::list(&state.pool, auth.user_id, &filter).await?;
    Ok(Json(tasks))
}

/// POST /api/tasks
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(mut input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<Task>)> {
    validate_title(&input.title)?;
    input.title = input.title.trim().to_string();
    if let Some(priority) = &input.priority {
        validate_priority(priority)?;
    }
    if let Some(category) = &input.category {
        validate_category(category)?;
    }
    if let Some(university_id) = input.university_id {
        lifecycle::find_university(&state.pool, university_id).await?;
    }

    let task = TaskRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(user_id = auth.user_id, task_id = task.id, "Task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /api/tasks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Task>> {
    Ok(Json(find_task(&state, auth, id).await?))
}

/// PUT /api/tasks/{id}
///
/// Only fields present in the body change.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTask>,
) -> AppResult<Json<Task>> {
    if let Some(title) = &input.title {
        validate_title(title)?;
    }
    if let Some(priority) = &input.priority {
        validate_priority(priority)?;
    }
    if let Some(category) = &input.category {
        validate_category(category)?;
    }
    apply_update(&state, auth, id, input).await.map(Json)
}

/// DELETE /api/tasks/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if TaskRepo::delete(&state.pool, id, auth.user_id).await? {
        tracing::info!(user_id = auth.user_id, task_id = id, "Task deleted");
        Ok(Json(MessageResponse::new("Task deleted")))
    } else {
        Err(AppError::Core(CoreError::not_found("Task", id)))
    }
}

/// POST /api/tasks/{id}/complete
pub async fn complete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Task>> {
    set_completed(&state, auth, id, true).await.map(Json)
}

/// POST /api/tasks/{id}/uncomplete
pub async fn uncomplete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Task>> {
    set_completed(&state, auth, id, false).await.map(Json)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_task(state: &AppState, auth: AuthUser, id: DbId) -> AppResult<Task> {
    TaskRepo::find_for_user(&state.pool, id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Task", id)))
}

async fn set_completed(state: &AppState, auth: AuthUser, id: DbId, done: bool) -> AppResult<Task> {
    let input = UpdateTask {
        is_completed: Some(done),
        ..UpdateTask::default()
    };
    apply_update(state, auth, id, input).await
}

/// Write an update, resolving `completed_at` against the stored task so the
/// timestamp is present exactly when the task is complete.
async fn apply_update(
    state: &AppState,
    auth: AuthUser,
    id: DbId,
    mut input: UpdateTask,
) -> AppResult<Task> {
    let existing = find_task(state, auth, id).await?;

    let completed_at = input.is_completed.and_then(|now_completed| {
        resolve_completed_at(
            existing.is_completed,
            existing.completed_at,
            now_completed,
            Utc::now(),
        )
    });
    if let Some(title) = input.title.take() {
        input.title = Some(title.trim().to_string());
    }

    let task = TaskRepo::update(&state.pool, id, auth.user_id, &input, completed_at)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Task", id)))?;

    if input.is_completed.is_some() {
        tracing::info!(
            user_id = auth.user_id,
            task_id = id,
            is_completed = task.is_completed,
            "Task completion changed"
        );
    }
    Ok(task)
}

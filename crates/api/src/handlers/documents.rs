//! Handlers for the `/documents` resource: upload bookkeeping for the
//! applicant's files.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use pathway_core::documents::{self, DEFAULT_DOCUMENT_CATEGORY};
use pathway_core::error::CoreError;
use pathway_core::types::DbId;
use pathway_db::models::document::{CreateDocument, Document};
use pathway_db::repositories::DocumentRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::MessageResponse;
use crate::state::AppState;

/// GET /api/documents
///
/// Newest first.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<Document>>> {
    let docs = DocumentRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(docs))
}

/// POST /api/documents/upload
///
/// Multipart fields: `file` (required) and `category` (default `academic`).
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<Document>)> {
    let mut file_data: Option<(String, Vec<u8>)> = None;
    let mut category: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file_data = Some((filename, data.to_vec()));
            }
            "category" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let text = text.trim();
                if !text.is_empty() {
                    category = Some(text.to_string());
                }
            }
            _ => {}
        }
    }

    let (filename, data) =
        file_data.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    let max = state.config.max_upload_bytes;
    if data.len() > max {
        return Err(AppError::Core(CoreError::Validation(format!(
            "File exceeds the maximum upload size of {}",
            documents::size_label(max as u64)
        ))));
    }

    let category = category.unwrap_or_else(|| DEFAULT_DOCUMENT_CATEGORY.to_string());
    documents::validate_category(&category)?;

    let path = state
        .documents
        .save(auth.user_id, Utc::now(), &filename, &data)
        .await
        .map_err(|e| AppError::InternalError(format!("Could not save file: {e}")))?;
    let file_path = path.to_string_lossy().to_string();

    let input = CreateDocument {
        name: filename.clone(),
        file_type: documents::file_type(&filename),
        size_label: documents::size_label(data.len() as u64),
        category,
        file_path: file_path.clone(),
    };

    let doc = match DocumentRepo::create(&state.pool, auth.user_id, &input).await {
        Ok(doc) => doc,
        Err(e) => {
            state.documents.remove(&file_path).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        user_id = auth.user_id,
        document_id = doc.id,
        bytes = data.len(),
        "Document uploaded"
    );
    Ok((StatusCode::CREATED, Json(doc)))
}

/// DELETE /api/documents/{id}
///
/// Removes the record, then the stored file if it is still there.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let doc = DocumentRepo::delete(&state.pool, id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Document", id)))?;

    if let Some(path) = &doc.file_path {
        state.documents.remove(path).await;
    }

    tracing::info!(user_id = auth.user_id, document_id = id, "Document deleted");
    Ok(Json(MessageResponse::new("Document deleted")))
}

//! Repository for the `documents` table.

use pathway_core::documents::STATUS_PENDING;
use pathway_core::types::DbId;
use sqlx::PgPool;

use crate::models::document::{CreateDocument, Document};

const COLUMNS: &str = "id, user_id, name, file_type, size_label, category, status, file_path, \
                       created_at, updated_at";

pub struct DocumentRepo;

impl DocumentRepo {
    /// Record an uploaded file. New documents start as `pending`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateDocument,
    ) -> Result<Document, sqlx::Error> {
        let query = format!(
            "INSERT INTO documents (user_id, name, file_type, size_label, category, status, file_path)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.file_type)
            .bind(&input.size_label)
            .bind(&input.category)
            .bind(STATUS_PENDING)
            .bind(&input.file_path)
            .fetch_one(pool)
            .await
    }

    /// A user's documents, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Document>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM documents WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a user's document, returning the removed row so the caller can
    /// clean up the stored file.
    pub async fn delete(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Document>, sqlx::Error> {
        let query =
            format!("DELETE FROM documents WHERE id = $1 AND user_id = $2 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}

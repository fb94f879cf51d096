//! Uploaded document record.

use pathway_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `documents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Document {
    pub id: DbId,
    pub user_id: DbId,
    /// Original client filename.
    pub name: String,
    /// Upper-cased extension, e.g. `PDF`.
    pub file_type: Option<String>,
    /// Display size, e.g. `12.5 KB`.
    pub size_label: Option<String>,
    pub category: Option<String>,
    pub status: String,
    #[serde(skip_serializing)]
    pub file_path: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateDocument {
    pub name: String,
    pub file_type: Option<String>,
    pub size_label: String,
    pub category: String,
    pub file_path: String,
}

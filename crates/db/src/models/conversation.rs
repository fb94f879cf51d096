//! Counsellor conversation turn.

use pathway_core::counsellor::ChatTurn;
use pathway_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `conversations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ConversationMessage {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub user_id: DbId,
    /// `user` or `assistant`.
    pub role: String,
    pub message: String,
    pub created_at: Timestamp,
}

impl From<ConversationMessage> for ChatTurn {
    fn from(m: ConversationMessage) -> Self {
        ChatTurn {
            role: m.role,
            content: m.message,
        }
    }
}

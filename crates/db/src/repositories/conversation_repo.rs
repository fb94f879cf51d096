//! Repository for the `conversations` table.

use pathway_core::types::DbId;
use sqlx::PgPool;

use crate::models::conversation::ConversationMessage;

const COLUMNS: &str = "id, user_id, role, message, created_at";

pub struct ConversationRepo;

impl ConversationRepo {
    pub async fn append(
        pool: &PgPool,
        user_id: DbId,
        role: &str,
        message: &str,
    ) -> Result<ConversationMessage, sqlx::Error> {
        let query = format!(
            "INSERT INTO conversations (user_id, role, message)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ConversationMessage>(&query)
            .bind(user_id)
            .bind(role)
            .bind(message)
            .fetch_one(pool)
            .await
    }

    /// The most recent `limit` turns, returned oldest first.
    pub async fn recent(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<ConversationMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM conversations
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2"
        );
        let mut turns = sqlx::query_as::<_, ConversationMessage>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        turns.reverse();
        Ok(turns)
    }

    /// Delete a user's whole history. Returns the number of turns removed.
    pub async fn clear(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM conversations WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

//! Shortlist entry model and lifecycle outcomes.

use pathway_core::shortlist::ShortlistState;
use pathway_core::stage::JourneyStage;
use pathway_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::task::Task;
use crate::models::university::ScoredUniversity;

/// A row from the `shortlisted_universities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ShortlistEntry {
    pub id: DbId,
    pub user_id: DbId,
    pub university_id: DbId,
    pub category: Option<String>,
    pub application_status: String,
    pub is_locked: bool,
    pub locked_at: Option<Timestamp>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

impl ShortlistEntry {
    pub fn state(&self) -> ShortlistState {
        ShortlistState::of(Some(self.is_locked))
    }
}

/// State of an optional entry; `None` is [`ShortlistState::Absent`].
pub fn state_of(entry: Option<&ShortlistEntry>) -> ShortlistState {
    ShortlistState::of(entry.map(|e| e.is_locked))
}

/// Insert DTO. `category` is already resolved (caller's or computed).
#[derive(Debug, Clone)]
pub struct CreateShortlistEntry {
    pub university_id: DbId,
    pub category: String,
    pub notes: Option<String>,
}

/// An entry with its university embedded, as listed to the user.
#[derive(Debug, Clone, Serialize)]
pub struct ShortlistEntryWithUniversity {
    #[serde(flatten)]
    pub entry: ShortlistEntry,
    pub university: ScoredUniversity,
}

/// Counts used by the dashboard and the stage tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow, Serialize)]
pub struct ShortlistCounts {
    pub shortlisted: i64,
    pub locked: i64,
}

/// Result of adding a university to the shortlist.
#[derive(Debug, Clone, Serialize)]
pub struct AddOutcome {
    pub entry: ShortlistEntry,
    pub current_stage: JourneyStage,
}

/// Result of locking a shortlisted university.
#[derive(Debug, Clone, Serialize)]
pub struct LockOutcome {
    pub entry: ShortlistEntry,
    pub tasks_created: Vec<Task>,
    pub current_stage: JourneyStage,
}

/// Result of unlocking a locked university.
#[derive(Debug, Clone, Serialize)]
pub struct UnlockOutcome {
    pub entry: ShortlistEntry,
    pub tasks_removed: u64,
    pub remaining_locked: i64,
    pub current_stage: JourneyStage,
}

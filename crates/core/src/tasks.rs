//! To-do task rules: priorities, categories, completion bookkeeping.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const PRIORITY_LOW: &str = "low";
pub const PRIORITY_MEDIUM: &str = "medium";
pub const PRIORITY_HIGH: &str = "high";

/// All valid priorities, lowest first.
pub const VALID_PRIORITIES: &[&str] = &[PRIORITY_LOW, PRIORITY_MEDIUM, PRIORITY_HIGH];

/// Priority assigned when the caller supplies none.
pub const DEFAULT_PRIORITY: &str = PRIORITY_MEDIUM;

pub const CATEGORY_DOCUMENT: &str = "document";
pub const CATEGORY_EXAM: &str = "exam";
pub const CATEGORY_APPLICATION: &str = "application";
pub const CATEGORY_GENERAL: &str = "general";

pub const VALID_TASK_CATEGORIES: &[&str] = &[
    CATEGORY_DOCUMENT,
    CATEGORY_EXAM,
    CATEGORY_APPLICATION,
    CATEGORY_GENERAL,
];

/// Maximum task title length in characters.
pub const MAX_TITLE_LENGTH: usize = 255;

// ---------------------------------------------------------------------------
// Drafts
// ---------------------------------------------------------------------------

/// A task the system creates on the user's behalf (onboarding, lock).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDraft {
    pub university_id: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    pub category: &'static str,
    pub priority: &'static str,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate_priority(priority: &str) -> Result<(), CoreError> {
    if VALID_PRIORITIES.contains(&priority) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid priority '{priority}'. Must be one of: {}",
            VALID_PRIORITIES.join(", ")
        )))
    }
}

pub fn validate_category(category: &str) -> Result<(), CoreError> {
    if VALID_TASK_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid task category '{category}'. Must be one of: {}",
            VALID_TASK_CATEGORIES.join(", ")
        )))
    }
}

pub fn validate_title(title: &str) -> Result<(), CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Task title must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Task title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Resolve `completed_at` when a task's completion flag is (re)set.
///
/// Keeps the invariant "timestamp present iff completed": marking a pending
/// task complete stamps `now`, re-marking a completed task keeps its
/// original timestamp, and marking incomplete clears it.
pub fn resolve_completed_at(
    was_completed: bool,
    previous: Option<Timestamp>,
    now_completed: bool,
    now: Timestamp,
) -> Option<Timestamp> {
    match (was_completed, now_completed) {
        (_, false) => None,
        (true, true) => previous.or(Some(now)),
        (false, true) => Some(now),
    }
}

//! Shortlist lifecycle: states, guarded transitions, application tasks.
//!
//! Each (user, university) pair is in exactly one [`ShortlistState`]:
//!
//! ```text
//! Absent --add--> Shortlisted --lock--> Locked
//!   ^                 |  ^                 |
//!   +-----remove------+  +--unlock(confirm)-+
//! ```
//!
//! The guard functions here decide whether a transition is allowed given
//! the current state; the persistence layer applies the effects.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::tasks::{TaskDraft, CATEGORY_APPLICATION, CATEGORY_DOCUMENT, PRIORITY_HIGH};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Application status
// ---------------------------------------------------------------------------

pub const STATUS_SHORTLISTED: &str = "shortlisted";
pub const STATUS_PREPARING: &str = "preparing";
pub const STATUS_SUBMITTED: &str = "submitted";
pub const STATUS_INTERVIEW: &str = "interview";
pub const STATUS_OFFER: &str = "offer";
pub const STATUS_REJECTED: &str = "rejected";

/// All valid application status strings.
pub const VALID_APPLICATION_STATUSES: &[&str] = &[
    STATUS_SHORTLISTED,
    STATUS_PREPARING,
    STATUS_SUBMITTED,
    STATUS_INTERVIEW,
    STATUS_OFFER,
    STATUS_REJECTED,
];

/// Validate an application status string.
pub fn validate_application_status(status: &str) -> Result<(), CoreError> {
    if VALID_APPLICATION_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid application status '{status}'. Must be one of: {}",
            VALID_APPLICATION_STATUSES.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// States and guards
// ---------------------------------------------------------------------------

/// Lifecycle state of one (user, university) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortlistState {
    Absent,
    Shortlisted,
    Locked,
}

impl ShortlistState {
    /// State of a pair given its (optional) entry's lock flag.
    pub fn of(entry_is_locked: Option<bool>) -> Self {
        match entry_is_locked {
            None => Self::Absent,
            Some(false) => Self::Shortlisted,
            Some(true) => Self::Locked,
        }
    }
}

/// Absent -> Shortlisted.
pub fn check_add(state: ShortlistState) -> Result<(), CoreError> {
    match state {
        ShortlistState::Absent => Ok(()),
        ShortlistState::Shortlisted | ShortlistState::Locked => Err(CoreError::Conflict(
            "University already in shortlist".into(),
        )),
    }
}

/// Shortlisted -> Locked.
pub fn check_lock(state: ShortlistState, university_id: DbId) -> Result<(), CoreError> {
    match state {
        ShortlistState::Shortlisted => Ok(()),
        ShortlistState::Locked => Err(CoreError::Conflict("University already locked".into())),
        ShortlistState::Absent => Err(not_in_shortlist(university_id)),
    }
}

/// Locked -> Shortlisted. Requires an explicit confirmation.
///
/// The confirmation is checked first: a request without it is rejected
/// regardless of the current state.
pub fn check_unlock(
    state: ShortlistState,
    confirmed: bool,
    university_id: DbId,
) -> Result<(), CoreError> {
    if !confirmed {
        return Err(CoreError::Validation(
            "Please confirm unlocking. This will remove associated tasks.".into(),
        ));
    }
    match state {
        ShortlistState::Locked => Ok(()),
        ShortlistState::Shortlisted => {
            Err(CoreError::Conflict("University is not locked".into()))
        }
        ShortlistState::Absent => Err(not_in_shortlist(university_id)),
    }
}

/// Shortlisted -> Absent.
pub fn check_remove(state: ShortlistState, university_id: DbId) -> Result<(), CoreError> {
    match state {
        ShortlistState::Shortlisted => Ok(()),
        ShortlistState::Locked => Err(CoreError::Conflict(
            "Cannot remove a locked university. Unlock it first.".into(),
        )),
        ShortlistState::Absent => Err(not_in_shortlist(university_id)),
    }
}

fn not_in_shortlist(university_id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "ShortlistEntry",
        id: university_id,
    }
}

// ---------------------------------------------------------------------------
// Lock side effects
// ---------------------------------------------------------------------------

/// Number of tasks generated when a university is locked.
pub const APPLICATION_TASK_COUNT: usize = 4;

/// The fixed application tasks generated on lock, all high priority and
/// tied to the locked university.
pub fn application_tasks(university_id: DbId, university_name: &str) -> Vec<TaskDraft> {
    let draft = |title: String, description: &str, category: &'static str| TaskDraft {
        university_id: Some(university_id),
        title,
        description: Some(description.to_string()),
        category,
        priority: PRIORITY_HIGH,
    };

    vec![
        draft(
            format!("Complete SOP for {university_name}"),
            "Write a tailored Statement of Purpose for this university",
            CATEGORY_DOCUMENT,
        ),
        draft(
            format!("Gather transcripts for {university_name}"),
            "Request official transcripts from your institution",
            CATEGORY_DOCUMENT,
        ),
        draft(
            format!("Get recommendation letters for {university_name}"),
            "Request 2-3 recommendation letters from professors/employers",
            CATEGORY_DOCUMENT,
        ),
        draft(
            format!("Submit application to {university_name}"),
            "Complete and submit the online application",
            CATEGORY_APPLICATION,
        ),
    ]
}

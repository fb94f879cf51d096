//! User journey stage tracking.
//!
//! The stage is a coarse 1-4 phase stored on the user row and advanced as a
//! side effect of onboarding, shortlisting and locking. It only moves
//! forward, with one exception: unlocking the last locked university drops
//! the user back to [`JourneyStage::FinalizingUniversities`].

use serde::{Deserialize, Serialize};

/// The four journey phases, stored as integers `1..=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum JourneyStage {
    /// Profile incomplete.
    BuildingProfile = 1,
    /// Onboarding complete, nothing shortlisted yet.
    DiscoveringUniversities = 2,
    /// At least one shortlisted, none locked.
    FinalizingUniversities = 3,
    /// At least one locked.
    PreparingApplications = 4,
}

impl JourneyStage {
    /// Convert from the stored integer. Out-of-range values are rejected.
    pub fn from_i32(value: i32) -> Result<Self, String> {
        match value {
            1 => Ok(Self::BuildingProfile),
            2 => Ok(Self::DiscoveringUniversities),
            3 => Ok(Self::FinalizingUniversities),
            4 => Ok(Self::PreparingApplications),
            _ => Err(format!("Invalid stage {value}. Must be between 1 and 4")),
        }
    }

    /// Convert from the stored integer, clamping out-of-range values.
    pub fn from_i32_lossy(value: i32) -> Self {
        Self::from_i32(value.clamp(1, 4)).unwrap_or(Self::BuildingProfile)
    }

    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    /// Display name shown to users and embedded in counsellor prompts.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BuildingProfile => "Building Profile",
            Self::DiscoveringUniversities => "Discovering Universities",
            Self::FinalizingUniversities => "Finalizing Universities",
            Self::PreparingApplications => "Preparing Applications",
        }
    }
}

impl From<JourneyStage> for i32 {
    fn from(stage: JourneyStage) -> Self {
        stage.as_i32()
    }
}

impl TryFrom<i32> for JourneyStage {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::from_i32(value)
    }
}

/// Stage name for a raw stored value, `"Unknown"` when out of range.
pub fn stage_name(value: i32) -> &'static str {
    JourneyStage::from_i32(value)
        .map(|s| s.name())
        .unwrap_or("Unknown")
}

/// Stage after onboarding completes. Never lowers a later stage.
pub fn after_onboarding(current: JourneyStage) -> JourneyStage {
    current.max(JourneyStage::DiscoveringUniversities)
}

/// Stage after a university is added to the shortlist.
pub fn after_shortlist(current: JourneyStage) -> JourneyStage {
    current.max(JourneyStage::FinalizingUniversities)
}

/// Stage after a university is locked. Always the final stage.
pub fn after_lock(_current: JourneyStage) -> JourneyStage {
    JourneyStage::PreparingApplications
}

/// Stage after a university is unlocked.
///
/// With no locked entries left the user returns to stage 3, even when the
/// shortlist itself is empty. Otherwise the stage is unchanged.
pub fn after_unlock(current: JourneyStage, remaining_locked: i64) -> JourneyStage {
    if remaining_locked == 0 {
        JourneyStage::FinalizingUniversities
    } else {
        current
    }
}

//! Applicant profile rules: status vocabularies, the allow-listed partial
//! update, profile strength and the initial onboarding task set.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::fit::ApplicantFacts;
use crate::tasks::{
    TaskDraft, CATEGORY_DOCUMENT, CATEGORY_EXAM, CATEGORY_GENERAL, PRIORITY_HIGH, PRIORITY_MEDIUM,
};

// ---------------------------------------------------------------------------
// Status vocabularies
// ---------------------------------------------------------------------------

pub const EXAM_NOT_STARTED: &str = "not_started";
pub const EXAM_PREPARING: &str = "preparing";
pub const EXAM_COMPLETED: &str = "completed";

pub const VALID_EXAM_STATUSES: &[&str] = &[EXAM_NOT_STARTED, EXAM_PREPARING, EXAM_COMPLETED];

pub const SOP_NOT_STARTED: &str = "not_started";
pub const SOP_DRAFT: &str = "draft";
pub const SOP_READY: &str = "ready";

pub const VALID_SOP_STATUSES: &[&str] = &[SOP_NOT_STARTED, SOP_DRAFT, SOP_READY];

/// Intended degrees for which a GRE preparation task is created.
const GRE_DEGREES: &[&str] = &["masters", "phd"];

/// Maximum GPA on the 4.0 scale.
pub const MAX_GPA: f64 = 4.0;

fn validate_in(field: &str, value: &str, allowed: &[&str]) -> Result<(), CoreError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid {field} '{value}'. Must be one of: {}",
            allowed.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Partial update
// ---------------------------------------------------------------------------

/// Allow-listed partial profile update.
///
/// Only the fields named here can ever be written; `None` means "leave the
/// stored value unchanged". Unknown JSON keys are ignored on deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intended_degree: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_intake: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_countries: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_min: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_max: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ielts_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ielts_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toefl_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toefl_score: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gre_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gre_score: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gmat_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gmat_score: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sop_status: Option<String>,
}

impl ProfilePatch {
    /// True when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Validate enum-valued and numeric fields that are present.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (field, value) in [
            ("ielts_status", &self.ielts_status),
            ("toefl_status", &self.toefl_status),
            ("gre_status", &self.gre_status),
            ("gmat_status", &self.gmat_status),
        ] {
            if let Some(v) = value {
                validate_in(field, v, VALID_EXAM_STATUSES)?;
            }
        }
        if let Some(v) = &self.sop_status {
            validate_in("sop_status", v, VALID_SOP_STATUSES)?;
        }
        if let Some(gpa) = self.gpa {
            if !(0.0..=MAX_GPA).contains(&gpa) {
                return Err(CoreError::Validation(format!(
                    "GPA must be between 0 and {MAX_GPA}"
                )));
            }
        }
        for (field, value) in [("budget_min", self.budget_min), ("budget_max", self.budget_max)] {
            if value.is_some_and(|v| v < 0) {
                return Err(CoreError::Validation(format!("{field} must not be negative")));
            }
        }
        if let (Some(min), Some(max)) = (self.budget_min, self.budget_max) {
            if min > max {
                return Err(CoreError::Validation(
                    "budget_min must not exceed budget_max".into(),
                ));
            }
        }
        Ok(())
    }

    /// Reject a patch that would leave `budget_min > budget_max` once merged
    /// over the stored values.
    pub fn validate_budget_over(
        &self,
        stored_min: Option<i32>,
        stored_max: Option<i32>,
    ) -> Result<(), CoreError> {
        match (self.budget_min.or(stored_min), self.budget_max.or(stored_max)) {
            (Some(min), Some(max)) if min > max => Err(CoreError::Validation(
                "budget_min must not exceed budget_max".into(),
            )),
            _ => Ok(()),
        }
    }

    /// Build a patch from loosely-typed extracted data (LLM or keyword
    /// extraction).
    ///
    /// Unknown keys and nulls are dropped. Numbers given as strings are
    /// parsed; preferred countries may be an array, a JSON-encoded array
    /// string or a comma-separated string. Values that cannot be coerced
    /// are dropped, as are enum values outside their vocabulary.
    pub fn from_extracted(data: &Map<String, Value>) -> Self {
        let text = |key: &str| data.get(key).and_then(coerce_string);
        let int = |key: &str| data.get(key).and_then(coerce_i32);
        let float = |key: &str| data.get(key).and_then(coerce_f64);
        let status = |key: &str, allowed: &[&str]| {
            text(key).filter(|s| allowed.contains(&s.as_str()))
        };

        Self {
            education_level: text("education_level"),
            degree: text("degree"),
            major: text("major"),
            graduation_year: int("graduation_year"),
            gpa: float("gpa").filter(|g| (0.0..=MAX_GPA).contains(g)),
            intended_degree: text("intended_degree"),
            field_of_study: text("field_of_study"),
            target_intake: text("target_intake"),
            preferred_countries: data.get("preferred_countries").and_then(coerce_countries),
            budget_min: int("budget_min").filter(|b| *b >= 0),
            budget_max: int("budget_max").filter(|b| *b >= 0),
            funding_type: text("funding_type"),
            ielts_status: status("ielts_status", VALID_EXAM_STATUSES),
            ielts_score: float("ielts_score"),
            toefl_status: status("toefl_status", VALID_EXAM_STATUSES),
            toefl_score: int("toefl_score"),
            gre_status: status("gre_status", VALID_EXAM_STATUSES),
            gre_score: int("gre_score"),
            gmat_status: status("gmat_status", VALID_EXAM_STATUSES),
            gmat_score: int("gmat_score"),
            sop_status: status("sop_status", VALID_SOP_STATUSES),
        }
    }
}

fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_i32(value: &Value) -> Option<i32> {
    coerce_f64(value)
        .filter(|f| f.is_finite() && *f >= i32::MIN as f64 && *f <= i32::MAX as f64)
        .map(|f| f.round() as i32)
}

fn coerce_countries(value: &Value) -> Option<Vec<String>> {
    let countries: Vec<String> = match value {
        Value::Array(items) => items.iter().filter_map(coerce_string).collect(),
        Value::String(s) => match serde_json::from_str::<Vec<String>>(s) {
            Ok(list) => list,
            Err(_) => s.split(',').map(str::to_string).collect(),
        },
        _ => return None,
    };
    let countries: Vec<String> = countries
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    (!countries.is_empty()).then_some(countries)
}

// ---------------------------------------------------------------------------
// Read-side view
// ---------------------------------------------------------------------------

/// Borrowed view over the profile fields the rules in this module read.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileSummary<'a> {
    pub gpa: Option<f64>,
    pub degree: Option<&'a str>,
    pub major: Option<&'a str>,
    pub intended_degree: Option<&'a str>,
    pub budget_max: Option<i32>,
    pub ielts_status: Option<&'a str>,
    pub ielts_score: Option<f64>,
    pub gre_status: Option<&'a str>,
    pub gre_score: Option<i32>,
    pub sop_status: Option<&'a str>,
    pub preferred_countries: &'a [String],
}

impl<'a> ProfileSummary<'a> {
    /// Inputs for the fit scorer.
    pub fn applicant_facts(&self) -> ApplicantFacts<'a> {
        ApplicantFacts {
            gpa: self.gpa,
            budget_max: self.budget_max,
            ielts_score: self.ielts_score,
            gre_score: self.gre_score,
            preferred_countries: self.preferred_countries,
        }
    }
}

// ---------------------------------------------------------------------------
// Strength
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileStrength {
    /// `strong`, `average` or `weak`.
    pub academics: &'static str,
    /// `completed`, `in_progress` or `not_started`.
    pub exams: &'static str,
    pub sop: String,
    pub overall_score: i32,
}

pub fn profile_strength(profile: &ProfileSummary<'_>) -> ProfileStrength {
    let academic_points = [
        profile.gpa.is_some_and(|g| g > 0.0),
        profile.degree.is_some(),
        profile.major.is_some(),
    ]
    .iter()
    .filter(|present| **present)
    .count();

    let academics = match academic_points {
        3 => "strong",
        1 | 2 => "average",
        _ => "weak",
    };

    let ielts = profile.ielts_status.unwrap_or(EXAM_NOT_STARTED);
    let gre = profile.gre_status.unwrap_or(EXAM_NOT_STARTED);
    let exams = if ielts == EXAM_COMPLETED && gre == EXAM_COMPLETED {
        "completed"
    } else if ielts == EXAM_PREPARING || gre == EXAM_PREPARING {
        "in_progress"
    } else {
        "not_started"
    };

    let sop = profile.sop_status.unwrap_or(SOP_NOT_STARTED);

    let mut overall = 0;
    overall += match academics {
        "strong" => 30,
        "average" => 15,
        _ => 0,
    };
    overall += match exams {
        "completed" => 30,
        "in_progress" => 15,
        _ => 0,
    };
    overall += match sop {
        SOP_READY => 20,
        SOP_DRAFT => 10,
        _ => 0,
    };
    if !profile.preferred_countries.is_empty() {
        overall += 20;
    }

    ProfileStrength {
        academics,
        exams,
        sop: sop.to_string(),
        overall_score: overall,
    }
}

// ---------------------------------------------------------------------------
// Onboarding tasks
// ---------------------------------------------------------------------------

/// Tasks created when onboarding completes, tailored to the profile.
pub fn initial_tasks(profile: &ProfileSummary<'_>) -> Vec<TaskDraft> {
    let draft = |title: &str, description: &str, category, priority| TaskDraft {
        university_id: None,
        title: title.to_string(),
        description: Some(description.to_string()),
        category,
        priority,
    };

    let mut tasks = Vec::new();

    if profile.ielts_status != Some(EXAM_COMPLETED) {
        tasks.push(draft(
            "Prepare for IELTS/TOEFL",
            "Register and prepare for English proficiency test",
            CATEGORY_EXAM,
            PRIORITY_HIGH,
        ));
    }

    let wants_gre = profile
        .intended_degree
        .is_some_and(|d| GRE_DEGREES.contains(&d));
    if profile.gre_status != Some(EXAM_COMPLETED) && wants_gre {
        tasks.push(draft(
            "Prepare for GRE",
            "Register and prepare for GRE exam",
            CATEGORY_EXAM,
            PRIORITY_HIGH,
        ));
    }

    if profile.sop_status != Some(SOP_READY) {
        tasks.push(draft(
            "Draft Statement of Purpose",
            "Write the first draft of your SOP",
            CATEGORY_DOCUMENT,
            PRIORITY_MEDIUM,
        ));
    }

    tasks.push(draft(
        "Research universities",
        "Use AI Counsellor to discover matching universities",
        CATEGORY_GENERAL,
        PRIORITY_HIGH,
    ));

    tasks
}

//! Applicant profile model.

use pathway_core::counsellor::ProfileSnapshot;
use pathway_core::profile::ProfileSummary;
use pathway_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Partial profile update; only allow-listed fields exist on it.
pub use pathway_core::profile::ProfilePatch as UpdateProfile;

/// A row from the `profiles` table. Exactly one per user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub user_id: DbId,
    pub education_level: Option<String>,
    pub degree: Option<String>,
    pub major: Option<String>,
    pub graduation_year: Option<i32>,
    pub gpa: Option<f64>,
    pub intended_degree: Option<String>,
    pub field_of_study: Option<String>,
    pub target_intake: Option<String>,
    pub preferred_countries: Vec<String>,
    pub budget_min: Option<i32>,
    pub budget_max: Option<i32>,
    pub funding_type: Option<String>,
    pub ielts_status: Option<String>,
    pub ielts_score: Option<f64>,
    pub toefl_status: Option<String>,
    pub toefl_score: Option<i32>,
    pub gre_status: Option<String>,
    pub gre_score: Option<i32>,
    pub gmat_status: Option<String>,
    pub gmat_score: Option<i32>,
    pub sop_status: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Profile {
    /// Borrowed view used by scoring, strength and onboarding rules.
    pub fn summary(&self) -> ProfileSummary<'_> {
        ProfileSummary {
            gpa: self.gpa,
            degree: self.degree.as_deref(),
            major: self.major.as_deref(),
            intended_degree: self.intended_degree.as_deref(),
            budget_max: self.budget_max,
            ielts_status: self.ielts_status.as_deref(),
            ielts_score: self.ielts_score,
            gre_status: self.gre_status.as_deref(),
            gre_score: self.gre_score,
            sop_status: self.sop_status.as_deref(),
            preferred_countries: &self.preferred_countries,
        }
    }

    /// Owned copy of the fields shown to the counsellor.
    pub fn snapshot(&self) -> ProfileSnapshot {
        ProfileSnapshot {
            education_level: self.education_level.clone(),
            degree: self.degree.clone(),
            major: self.major.clone(),
            graduation_year: self.graduation_year,
            gpa: self.gpa,
            intended_degree: self.intended_degree.clone(),
            field_of_study: self.field_of_study.clone(),
            target_intake: self.target_intake.clone(),
            preferred_countries: self.preferred_countries.clone(),
            budget_min: self.budget_min,
            budget_max: self.budget_max,
            funding_type: self.funding_type.clone(),
            ielts_status: self.ielts_status.clone(),
            ielts_score: self.ielts_score,
            gre_status: self.gre_status.clone(),
            gre_score: self.gre_score,
            sop_status: self.sop_status.clone(),
        }
    }
}

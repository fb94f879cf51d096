//! University catalog model.

use pathway_core::fit::{assess_fit, ApplicantFacts, UniversityFacts};
use pathway_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `universities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct University {
    pub id: DbId,
    pub name: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub ranking: Option<i32>,
    pub tuition_min: Option<i32>,
    pub tuition_max: Option<i32>,
    pub programs: Vec<String>,
    /// Percentage, e.g. `4.0` for 4%.
    pub acceptance_rate: Option<f64>,
    pub ielts_requirement: Option<f64>,
    pub gre_requirement: Option<i32>,
    pub toefl_requirement: Option<i32>,
    pub application_deadline: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

impl University {
    pub fn facts(&self) -> UniversityFacts<'_> {
        UniversityFacts {
            country: self.country.as_deref(),
            tuition_min: self.tuition_min,
            tuition_max: self.tuition_max,
            acceptance_rate: self.acceptance_rate,
            ielts_requirement: self.ielts_requirement,
            gre_requirement: self.gre_requirement,
        }
    }

    /// Attach a fit assessment for the given applicant.
    pub fn assess(self, applicant: Option<&ApplicantFacts<'_>>) -> ScoredUniversity {
        let fit = assess_fit(&self.facts(), applicant);
        ScoredUniversity {
            university: self,
            fit_score: fit.fit_score,
            category: fit.category.as_str(),
            risk_level: fit.risk_level.as_str(),
        }
    }
}

/// A university annotated with its fit for the requesting user.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredUniversity {
    #[serde(flatten)]
    pub university: University,
    pub fit_score: i32,
    pub category: &'static str,
    pub risk_level: &'static str,
}

/// Score every university and order by fit, best first. Ties keep catalog
/// order.
pub fn rank_by_fit(
    universities: Vec<University>,
    applicant: Option<&ApplicantFacts<'_>>,
) -> Vec<ScoredUniversity> {
    let mut scored: Vec<ScoredUniversity> = universities
        .into_iter()
        .map(|u| u.assess(applicant))
        .collect();
    scored.sort_by(|a, b| b.fit_score.cmp(&a.fit_score));
    scored
}

/// Catalog filters. Absent fields do not filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UniversityFilter {
    /// Case-insensitive substring of the country.
    pub country: Option<String>,
    /// Upper bound on `tuition_max`.
    pub budget_max: Option<i32>,
    /// Case-insensitive substring of any program name.
    pub program: Option<String>,
}

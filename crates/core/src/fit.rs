//! University fit scoring and admission-difficulty categorisation.
//!
//! [`assess_fit`] is a deterministic additive point system: it starts at
//! [`BASE_SCORE`], adds or subtracts points for GPA, budget, exam scores and
//! country preference, and clamps the result to `0..=100`. The category and
//! risk labels are then derived from the university's acceptance rate when
//! one is known, or from the score alone when it is not.
//!
//! The two derivation branches use different score thresholds for the same
//! label. That asymmetry is long-standing observable behaviour and is kept
//! exactly as is; see [`categorize`].
//!
//! Optional inputs that are zero are treated as absent, so a GPA of `0.0` or
//! an acceptance rate of `0.0` contributes nothing and selects the same
//! branch as a missing value.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Starting score before any adjustment.
pub const BASE_SCORE: i32 = 50;

/// Lowest possible fit score after clamping.
pub const MIN_SCORE: i32 = 0;

/// Highest possible fit score after clamping.
pub const MAX_SCORE: i32 = 100;

/// Acceptance rate (percent) below which a university is always a dream pick.
pub const DREAM_ACCEPTANCE_RATE: f64 = 15.0;

/// Acceptance rate (percent) below which a university is at best a target.
pub const TARGET_ACCEPTANCE_RATE: f64 = 35.0;

/// Score below which a university is a dream pick.
pub const DREAM_SCORE_BELOW: i32 = 50;

/// Score below which a university is at best a target.
pub const TARGET_SCORE_BELOW: i32 = 70;

/// Recommendations tolerate tuition up to this multiple of the user's budget.
pub const RECOMMENDATION_BUDGET_BUFFER: f64 = 1.2;

pub const CATEGORY_DREAM: &str = "dream";
pub const CATEGORY_TARGET: &str = "target";
pub const CATEGORY_SAFE: &str = "safe";

/// All valid category strings.
pub const VALID_CATEGORIES: &[&str] = &[CATEGORY_DREAM, CATEGORY_TARGET, CATEGORY_SAFE];

pub const RISK_HIGH: &str = "high";
pub const RISK_MEDIUM: &str = "medium";
pub const RISK_LOW: &str = "low";

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Admission-difficulty label for a university relative to a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Dream,
    Target,
    Safe,
}

impl Category {
    /// Convert from a stored string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            CATEGORY_DREAM => Ok(Self::Dream),
            CATEGORY_TARGET => Ok(Self::Target),
            CATEGORY_SAFE => Ok(Self::Safe),
            _ => Err(format!(
                "Invalid category '{s}'. Must be one of: {}",
                VALID_CATEGORIES.join(", ")
            )),
        }
    }

    /// Convert to the stored string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dream => CATEGORY_DREAM,
            Self::Target => CATEGORY_TARGET,
            Self::Safe => CATEGORY_SAFE,
        }
    }

    /// The risk level that always accompanies this category.
    pub fn risk(&self) -> RiskLevel {
        match self {
            Self::Dream => RiskLevel::High,
            Self::Target => RiskLevel::Medium,
            Self::Safe => RiskLevel::Low,
        }
    }
}

/// Admission risk paired with a [`Category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => RISK_HIGH,
            Self::Medium => RISK_MEDIUM,
            Self::Low => RISK_LOW,
        }
    }
}

// ---------------------------------------------------------------------------
// Inputs and output
// ---------------------------------------------------------------------------

/// The university attributes the scorer reads. Built from a catalog row.
#[derive(Debug, Clone, Default)]
pub struct UniversityFacts<'a> {
    pub country: Option<&'a str>,
    pub tuition_min: Option<i32>,
    pub tuition_max: Option<i32>,
    /// Percentage in `0..=100`.
    pub acceptance_rate: Option<f64>,
    pub ielts_requirement: Option<f64>,
    pub gre_requirement: Option<i32>,
}

/// The applicant attributes the scorer reads. Built from a profile row.
#[derive(Debug, Clone, Default)]
pub struct ApplicantFacts<'a> {
    pub gpa: Option<f64>,
    pub budget_max: Option<i32>,
    pub ielts_score: Option<f64>,
    pub gre_score: Option<i32>,
    pub preferred_countries: &'a [String],
}

/// Result of scoring one university against one profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitAssessment {
    /// Clamped to `0..=100`.
    pub fit_score: i32,
    pub category: Category,
    pub risk_level: RiskLevel,
}

impl FitAssessment {
    /// The assessment used when no profile is available.
    pub const NEUTRAL: FitAssessment = FitAssessment {
        fit_score: BASE_SCORE,
        category: Category::Target,
        risk_level: RiskLevel::Medium,
    };
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

fn present_f64(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

fn present_i32(value: Option<i32>) -> Option<i32> {
    value.filter(|v| *v != 0)
}

/// Points for GPA. Only counted when the university reports an acceptance rate.
fn gpa_points(gpa: f64) -> i32 {
    if gpa >= 3.7 {
        15
    } else if gpa >= 3.3 {
        10
    } else if gpa >= 3.0 {
        5
    } else {
        0
    }
}

/// Points for budget against the tuition range.
///
/// An unknown minimum tuition never satisfies the middle tier.
fn budget_points(budget_max: i32, tuition_min: Option<i32>, tuition_max: i32) -> i32 {
    if budget_max >= tuition_max {
        15
    } else if tuition_min.is_some_and(|min| budget_max >= min) {
        8
    } else {
        -10
    }
}

fn exam_points<T: PartialOrd>(score: T, requirement: T) -> i32 {
    if score >= requirement {
        10
    } else {
        -5
    }
}

fn prefers_country(preferred: &[String], country: &str) -> bool {
    let country = country.to_lowercase();
    preferred.iter().any(|c| c.to_lowercase() == country)
}

/// Compute the raw, unclamped additive score.
pub fn raw_score(university: &UniversityFacts<'_>, profile: &ApplicantFacts<'_>) -> i32 {
    let mut score = BASE_SCORE;
    let acceptance_rate = present_f64(university.acceptance_rate);

    if let (Some(gpa), Some(_)) = (present_f64(profile.gpa), acceptance_rate) {
        score += gpa_points(gpa);
    }

    if let (Some(budget), Some(tuition_max)) = (
        present_i32(profile.budget_max),
        present_i32(university.tuition_max),
    ) {
        score += budget_points(budget, university.tuition_min, tuition_max);
    }

    if let (Some(ielts), Some(required)) = (
        present_f64(profile.ielts_score),
        present_f64(university.ielts_requirement),
    ) {
        score += exam_points(ielts, required);
    }

    if let (Some(gre), Some(required)) = (
        present_i32(profile.gre_score),
        present_i32(university.gre_requirement),
    ) {
        score += exam_points(gre, required);
    }

    if let Some(country) = university.country {
        if prefers_country(profile.preferred_countries, country) {
            score += 10;
        }
    }

    score
}

/// Derive the category from the acceptance rate (when known) and the score.
///
/// Rate known: rate < 15 or score < 50 is dream; rate < 35 or score < 70 is
/// target; otherwise safe. Rate unknown: score >= 70 is safe; score >= 50 is
/// target; otherwise dream.
pub fn categorize(acceptance_rate: Option<f64>, score: i32) -> Category {
    match present_f64(acceptance_rate) {
        Some(rate) => {
            if rate < DREAM_ACCEPTANCE_RATE || score < DREAM_SCORE_BELOW {
                Category::Dream
            } else if rate < TARGET_ACCEPTANCE_RATE || score < TARGET_SCORE_BELOW {
                Category::Target
            } else {
                Category::Safe
            }
        }
        None => {
            if score >= TARGET_SCORE_BELOW {
                Category::Safe
            } else if score >= DREAM_SCORE_BELOW {
                Category::Target
            } else {
                Category::Dream
            }
        }
    }
}

/// Score a university against an optional profile.
///
/// An absent profile yields [`FitAssessment::NEUTRAL`]. Never fails.
pub fn assess_fit(
    university: &UniversityFacts<'_>,
    profile: Option<&ApplicantFacts<'_>>,
) -> FitAssessment {
    let Some(profile) = profile else {
        return FitAssessment::NEUTRAL;
    };

    let score = raw_score(university, profile);
    let category = categorize(university.acceptance_rate, score);

    FitAssessment {
        fit_score: score.clamp(MIN_SCORE, MAX_SCORE),
        category,
        risk_level: category.risk(),
    }
}

/// Upper tuition bound used to filter recommendations for a budget.
pub fn recommendation_tuition_ceiling(budget_max: i32) -> f64 {
    f64::from(budget_max) * RECOMMENDATION_BUDGET_BUFFER
}

/// Validate a caller-supplied category string.
pub fn validate_category(category: &str) -> Result<(), String> {
    Category::from_str_value(category).map(|_| ())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Voice onboarding: the step flow, the model prompt, reply parsing and the
//! keyword extractor used when no model is available.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::counsellor::ProfileSnapshot;

/// Onboarding steps in the order they are asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    Start,
    EducationLevel,
    DegreeMajor,
    GraduationYear,
    IntendedDegree,
    FieldOfStudy,
    PreferredCountries,
    TargetIntake,
    Budget,
    Exams,
    Complete,
}

impl OnboardingStep {
    pub const ALL: [OnboardingStep; 11] = [
        Self::Start,
        Self::EducationLevel,
        Self::DegreeMajor,
        Self::GraduationYear,
        Self::IntendedDegree,
        Self::FieldOfStudy,
        Self::PreferredCountries,
        Self::TargetIntake,
        Self::Budget,
        Self::Exams,
        Self::Complete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::EducationLevel => "education_level",
            Self::DegreeMajor => "degree_major",
            Self::GraduationYear => "graduation_year",
            Self::IntendedDegree => "intended_degree",
            Self::FieldOfStudy => "field_of_study",
            Self::PreferredCountries => "preferred_countries",
            Self::TargetIntake => "target_intake",
            Self::Budget => "budget",
            Self::Exams => "exams",
            Self::Complete => "complete",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|step| step.as_str() == s)
    }

    /// The step asked after this one. `Complete` is terminal.
    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1).min(Self::ALL.len() - 1)]
    }
}

/// One turn of the voice onboarding conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceReply {
    pub response_text: String,
    #[serde(default)]
    pub next_step: Option<String>,
    #[serde(default)]
    pub extracted_data: Map<String, Value>,
    #[serde(default)]
    pub is_complete: bool,
}

// ---------------------------------------------------------------------------
// Model path
// ---------------------------------------------------------------------------

pub fn voice_prompt(transcript: &str, current_step: Option<&str>, profile: &ProfileSnapshot) -> String {
    let profile_json = serde_json::to_string_pretty(profile).unwrap_or_else(|_| "{}".into());
    let steps = OnboardingStep::ALL
        .iter()
        .skip(1)
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"You are helping a student set up a study-abroad profile by voice.

Current onboarding step: {step}
Current profile data: {profile_json}

The student said: "{transcript}"

Extract any profile information from what they said, write a short friendly spoken reply
that asks the next question, and choose the next step.

Steps, in order: {steps}

Reply with only a JSON object:
{{
    "response_text": "your spoken reply",
    "next_step": "the next step",
    "extracted_data": {{ "field_name": "value" }},
    "is_complete": false
}}

Fields you may extract: education_level, degree, major, graduation_year, gpa,
intended_degree, field_of_study, target_intake, preferred_countries (JSON array),
budget_min, budget_max, funding_type, ielts_status, ielts_score, gre_status,
gre_score, sop_status. Exam statuses are not_started, preparing or completed;
sop_status is not_started, draft or ready.
"#,
        step = current_step.unwrap_or("start"),
    )
}

/// Parse model output into a [`VoiceReply`], tolerating Markdown code fences.
pub fn parse_model_reply(text: &str) -> Result<VoiceReply, String> {
    let body = strip_code_fence(text);
    serde_json::from_str(body).map_err(|e| format!("Invalid onboarding reply: {e}"))
}

fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let inner = if let Some((_, rest)) = text.split_once("```json") {
        rest
    } else if let Some((_, rest)) = text.split_once("```") {
        rest
    } else {
        return text;
    };
    inner.split("```").next().unwrap_or(inner).trim()
}

// ---------------------------------------------------------------------------
// Fallback path
// ---------------------------------------------------------------------------

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"20\d{2}").expect("valid year regex"));
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid number regex"));
static INTAKE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(fall|spring|summer|winter)\D*(20\d{2})").expect("valid intake regex")
});

fn has_word(text: &str, words: &[&str]) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .any(|token| words.contains(&token))
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Budgets under 100 are read as thousands ("30 to 50" means 30k-50k).
fn budget_amount(n: i64) -> i64 {
    if n < 100 {
        n * 1000
    } else {
        n
    }
}

fn reply(text: &str, next: OnboardingStep, extracted: Map<String, Value>) -> VoiceReply {
    VoiceReply {
        response_text: text.to_string(),
        next_step: Some(next.as_str().to_string()),
        is_complete: next == OnboardingStep::Complete,
        extracted_data: extracted,
    }
}

/// Keyword extraction for one onboarding step.
pub fn fallback_turn(transcript: &str, current_step: Option<&str>) -> VoiceReply {
    let step = match current_step {
        None | Some("") => OnboardingStep::Start,
        Some(s) => match OnboardingStep::parse(s) {
            Some(step) => step,
            None => {
                return VoiceReply {
                    response_text: "I didn't quite catch that. Could you please repeat?".into(),
                    next_step: Some(s.to_string()),
                    extracted_data: Map::new(),
                    is_complete: false,
                }
            }
        },
    };

    let lower = transcript.to_lowercase();
    let mut data = Map::new();
    let next = step.next();

    let text = match step {
        OnboardingStep::Start => {
            "Hi! I'm your AI counsellor. Let's set up your profile together. What's your \
             current education level? Are you in high school, doing a bachelor's, or have \
             you completed a master's?"
        }
        OnboardingStep::EducationLevel => {
            let level = if lower.contains("bachelor") {
                Some("bachelors")
            } else if lower.contains("master") {
                Some("masters")
            } else if lower.contains("school") {
                Some("high_school")
            } else {
                None
            };
            if let Some(level) = level {
                data.insert("education_level".into(), json!(level));
            }
            "Great! What's your degree and major? For example, Bachelor's in Computer Science."
        }
        OnboardingStep::DegreeMajor => {
            let major = if lower.contains("computer") {
                Some("Computer Science")
            } else if lower.contains("business") {
                Some("Business Administration")
            } else if lower.contains("engineer") {
                Some("Engineering")
            } else {
                None
            };
            if let Some(major) = major {
                data.insert("major".into(), json!(major));
            }
            "Good! What year are you graduating or did you graduate?"
        }
        OnboardingStep::GraduationYear => {
            if let Some(year) = YEAR_RE
                .find(transcript)
                .and_then(|m| m.as_str().parse::<i32>().ok())
            {
                data.insert("graduation_year".into(), json!(year));
            }
            "Perfect! What degree are you planning to pursue abroad? Bachelor's, Master's, \
             MBA, or PhD?"
        }
        OnboardingStep::IntendedDegree => {
            let degree = if lower.contains("master") || has_word(&lower, &["ms", "msc"]) {
                Some("masters")
            } else if lower.contains("mba") {
                Some("mba")
            } else if lower.contains("phd") || lower.contains("doctor") {
                Some("phd")
            } else if lower.contains("bachelor") {
                Some("bachelors")
            } else {
                None
            };
            if let Some(degree) = degree {
                data.insert("intended_degree".into(), json!(degree));
            }
            "What field would you like to study?"
        }
        OnboardingStep::FieldOfStudy => {
            let field = title_case(transcript.trim());
            if !field.is_empty() {
                data.insert("field_of_study".into(), json!(field));
            }
            "Which countries are you interested in? You can mention multiple, like USA, \
             Canada, or UK."
        }
        OnboardingStep::PreferredCountries => {
            let mut countries = Vec::new();
            if has_word(&lower, &["usa", "us", "america"]) || lower.contains("united states") {
                countries.push("USA");
            }
            if lower.contains("canada") {
                countries.push("Canada");
            }
            if has_word(&lower, &["uk", "britain", "england"]) || lower.contains("united kingdom") {
                countries.push("UK");
            }
            if lower.contains("germany") {
                countries.push("Germany");
            }
            if lower.contains("australia") {
                countries.push("Australia");
            }
            if !countries.is_empty() {
                data.insert("preferred_countries".into(), json!(countries));
            }
            "When do you want to start your studies? Fall 2025, Spring 2026, or later?"
        }
        OnboardingStep::TargetIntake => {
            if let Some(caps) = INTAKE_RE.captures(&lower) {
                data.insert(
                    "target_intake".into(),
                    json!(format!("{}_{}", &caps[1], &caps[2])),
                );
            }
            "What's your budget per year for tuition? You can give me a range."
        }
        OnboardingStep::Budget => {
            let cleaned = transcript.replace(',', "");
            let numbers: Vec<i64> = NUMBER_RE
                .find_iter(&cleaned)
                .filter_map(|m| m.as_str().parse::<f64>().ok())
                .map(|n| n as i64)
                .collect();
            match numbers.as_slice() {
                [] => {}
                [only] => {
                    data.insert("budget_min".into(), json!(0));
                    data.insert("budget_max".into(), json!(budget_amount(*only)));
                }
                [first, second, ..] => {
                    data.insert("budget_min".into(), json!(budget_amount(*first)));
                    data.insert("budget_max".into(), json!(budget_amount(*second)));
                }
            }
            "Last question - have you taken IELTS or TOEFL? If yes, what was your score?"
        }
        OnboardingStep::Exams => {
            if has_word(&lower, &["no", "not", "haven't", "havent"]) {
                data.insert("ielts_status".into(), json!("not_started"));
            } else if lower.contains("preparing") || lower.contains("studying") {
                data.insert("ielts_status".into(), json!("preparing"));
            } else {
                data.insert("ielts_status".into(), json!("completed"));
                let score = NUMBER_RE
                    .find_iter(transcript)
                    .filter_map(|m| m.as_str().parse::<f64>().ok())
                    .find(|s| (5.0..=9.0).contains(s));
                if let Some(score) = score {
                    data.insert("ielts_score".into(), json!(score));
                }
            }
            "Excellent! I now have all the information I need. Your profile is complete! You \
             can now access the AI Counsellor for personalized university recommendations."
        }
        OnboardingStep::Complete => {
            return VoiceReply {
                response_text: "Your profile is already complete. Head to your dashboard to \
                                continue."
                    .into(),
                next_step: Some(OnboardingStep::Complete.as_str().to_string()),
                extracted_data: Map::new(),
                is_complete: true,
            }
        }
    };

    reply(text, next, data)
}

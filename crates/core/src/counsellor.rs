//! Counsellor conversation: context, prompt assembly and canned replies.
//!
//! The text-generation call itself lives in `pathway-llm`. Everything here
//! is deterministic so both the prompt and the fallback path are testable
//! without a model.

use serde::{Deserialize, Serialize};

use crate::profile::{EXAM_COMPLETED, SOP_READY};
use crate::stage::JourneyStage;
use crate::types::DbId;

/// Conversation turns loaded into the context.
pub const CONTEXT_HISTORY_TURNS: i64 = 10;

/// Of those, turns replayed to the model.
pub const PROMPT_HISTORY_TURNS: usize = 6;

pub const ROLE_USER: &str = "user";
pub const ROLE_ASSISTANT: &str = "assistant";

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Profile fields exposed to the counsellor.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileSnapshot {
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
    pub gre_status: Option<String>,
    pub gre_score: Option<i32>,
    pub sop_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortlistSummary {
    pub name: String,
    pub country: Option<String>,
    pub category: Option<String>,
    pub is_locked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingTaskSummary {
    pub title: String,
    pub category: Option<String>,
    pub priority: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

/// Everything the counsellor knows about the user for one reply.
#[derive(Debug, Clone)]
pub struct ChatContext {
    pub user_name: String,
    pub current_stage: JourneyStage,
    pub profile: Option<ProfileSnapshot>,
    pub shortlisted: Vec<ShortlistSummary>,
    pub pending_tasks: Vec<PendingTaskSummary>,
    /// Oldest first.
    pub history: Vec<ChatTurn>,
}

impl ChatContext {
    pub fn locked(&self) -> Vec<&ShortlistSummary> {
        self.shortlisted.iter().filter(|s| s.is_locked).collect()
    }
}

// ---------------------------------------------------------------------------
// Reply
// ---------------------------------------------------------------------------

/// A structured follow-up the client can offer as a button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatAction {
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university_id: Option<DbId>,
}

impl ChatAction {
    fn shortlist(label: &str, university_id: DbId) -> Self {
        Self {
            kind: "shortlist".into(),
            label: label.into(),
            university_id: Some(university_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub message: String,
    pub actions: Option<Vec<ChatAction>>,
    pub suggestions: Option<Vec<String>>,
}

impl ChatReply {
    fn new(message: String, suggestions: &[&str]) -> Self {
        Self {
            message,
            actions: None,
            suggestions: Some(suggestions.iter().map(|s| s.to_string()).collect()),
        }
    }
}

/// Reply given before onboarding is complete.
pub fn onboarding_required_reply() -> ChatReply {
    ChatReply::new(
        "Please complete your onboarding first to unlock the AI Counsellor. I need to \
         understand your background to provide personalized guidance."
            .into(),
        &["Complete Onboarding"],
    )
}

/// Wrap model output with derived actions and stage suggestions.
pub fn generated_reply(text: String, context: &ChatContext) -> ChatReply {
    let actions = extract_actions(&text);
    ChatReply {
        message: text,
        actions,
        suggestions: Some(suggestions_for_stage(context.current_stage)),
    }
}

/// Actions implied by free reply text.
pub fn extract_actions(text: &str) -> Option<Vec<ChatAction>> {
    let lower = text.to_lowercase();
    if lower.contains("shortlist") && lower.contains("add") {
        Some(vec![ChatAction {
            kind: "suggest_shortlist".into(),
            label: "View recommendations".into(),
            university_id: None,
        }])
    } else {
        None
    }
}

pub fn suggestions_for_stage(stage: JourneyStage) -> Vec<String> {
    let items: &[&str] = match stage {
        JourneyStage::DiscoveringUniversities => &[
            "Recommend universities",
            "Show universities in USA",
            "What's my fit score?",
        ],
        JourneyStage::FinalizingUniversities => &[
            "Compare my shortlist",
            "Lock a university",
            "Show deadline calendar",
        ],
        JourneyStage::PreparingApplications => &[
            "Show application checklist",
            "Review my tasks",
            "Help with SOP",
        ],
        JourneyStage::BuildingProfile => &[
            "Analyze my profile",
            "What should I prepare?",
            "Show popular destinations",
        ],
    };
    items.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Prompt
// ---------------------------------------------------------------------------

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".into())
}

/// System instructions with the user's context embedded.
pub fn system_prompt(context: &ChatContext) -> String {
    format!(
        r#"You are an expert study-abroad counsellor named "AI Counsellor".
You help students make informed decisions about studying abroad.

CURRENT USER CONTEXT:
- Name: {name}
- Current Stage: {stage}
- Profile: {profile}
- Shortlisted Universities: {shortlisted}
- Locked Universities: {locked}
- Pending Tasks: {tasks}

YOUR ROLE:
1. Analyze the student's profile and point out strengths and gaps.
2. Recommend universities as DREAM (acceptance under 15% or under 50% chance),
   TARGET (50-70% chance) or SAFE (over 70% chance).
3. Explain why a university fits or carries risk.
4. Suggest concrete next steps for the current stage.
5. Be encouraging but realistic.
6. When the student agrees to shortlist or lock a university, mention you can do that for them.

STYLE:
- Answer a plain greeting with one or two friendly sentences and an open question.
- Decline abusive language politely and steer back to the study-abroad journey.
- Ask for clarification when the message is unintelligible.
- Reply in Hinglish when the student writes in Hinglish, otherwise in English.
- Keep replies short (under 150 words) unless the student asks for detail.
- Use bullet points for lists, sparingly.
- If the student asks about a specific university, check whether it is in their shortlist.
"#,
        name = context.user_name,
        stage = context.current_stage.name(),
        profile = pretty(&context.profile),
        shortlisted = pretty(&context.shortlisted),
        locked = pretty(&context.locked()),
        tasks = pretty(&context.pending_tasks),
    )
}

/// Full prompt: system text, recent turns, then the new message.
pub fn conversation_prompt(context: &ChatContext, message: &str) -> String {
    let mut prompt = system_prompt(context);
    prompt.push_str("\nCONVERSATION:\n");

    let skip = context.history.len().saturating_sub(PROMPT_HISTORY_TURNS);
    for turn in context.history.iter().skip(skip) {
        let speaker = if turn.role == ROLE_USER { "User" } else { "Counsellor" };
        prompt.push_str(&format!("{speaker}: {}\n", turn.content));
    }

    prompt.push_str(&format!("User: {message}\nCounsellor:"));
    prompt
}

// ---------------------------------------------------------------------------
// Fallback
// ---------------------------------------------------------------------------

fn mentions_word(text: &str, words: &[&str]) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .any(|token| words.contains(&token))
}

fn mentions_any(text: &str, fragments: &[&str]) -> bool {
    fragments.iter().any(|f| text.contains(f))
}

/// Canned reply chosen by keyword when no model is available.
pub fn fallback_reply(message: &str, context: &ChatContext) -> ChatReply {
    let lower = message.to_lowercase();
    let stage = context.current_stage;
    let empty = ProfileSnapshot::default();
    let profile = context.profile.as_ref().unwrap_or(&empty);

    if mentions_word(&lower, &["hello", "hi"]) {
        return ChatReply::new(
            format!(
                "Hello {}! I'm your AI Study Abroad Counsellor. You're currently in the \
                 **{}** stage. How can I help you today?",
                context.user_name,
                stage.name()
            ),
            &[
                "What universities should I apply to?",
                "Analyze my profile",
                "What should I do next?",
            ],
        );
    }

    if mentions_any(&lower, &["universit", "recommend", "apply"]) {
        return recommendations_reply(profile);
    }

    if mentions_any(&lower, &["profile", "strength", "analyz"]) {
        return ChatReply::new(
            profile_analysis(profile),
            &["Recommend universities", "What should I prepare next?", "Help me with SOP"],
        );
    }

    if mentions_any(&lower, &["next", "should", "step"]) {
        return ChatReply::new(
            format!(
                "Based on your current stage (**{}**), here's what to focus on:\n\n{}\n\n\
                 Would you like help with any of these?",
                stage.name(),
                stage_advice(stage, profile)
            ),
            &["Show my pending tasks", "Recommend universities", "Analyze my profile"],
        );
    }

    if mentions_any(&lower, &["shortlist", "add"]) {
        return ChatReply::new(
            "I can help you shortlist universities! Tell me which university you'd like to \
             add, or ask me for recommendations based on your profile."
                .into(),
            &[
                "Recommend universities for me",
                "Show my current shortlist",
                "What's the difference between Dream and Safe?",
            ],
        );
    }

    ChatReply::new(
        format!(
            "I'm here to help with your study abroad journey! I can:\n\n\
             - **Recommend universities** based on your profile\n\
             - **Analyze your profile** strengths and gaps\n\
             - **Guide you** through the application process\n\
             - **Create tasks** to keep you on track\n\n\
             What would you like to explore? You're currently in the **{}** stage.",
            stage.name()
        ),
        &["Recommend universities", "Analyze my profile", "What should I do next?"],
    )
}

fn recommendations_reply(profile: &ProfileSnapshot) -> ChatReply {
    let degree = profile.intended_degree.as_deref().unwrap_or("your degree");
    let message = format!(
        "Based on your profile, here are my recommendations for {degree} programs:\n\n\
         **DREAM Universities** (highly competitive):\n\
         - MIT (USA) - top CS program, 4% acceptance\n\
         - Stanford University (USA) - excellent reputation, 4% acceptance\n\n\
         **TARGET Universities** (good fit):\n\
         - University of Toronto (Canada) - strong programs, 43% acceptance\n\
         - TU Munich (Germany) - low tuition, great engineering\n\n\
         **SAFE Universities** (high chance):\n\
         - University of British Columbia (Canada) - 52% acceptance\n\
         - Arizona State University (USA) - good acceptance rate\n\n\
         Would you like me to add any of these to your shortlist?"
    );

    ChatReply {
        message,
        actions: Some(vec![
            ChatAction::shortlist("Add MIT to shortlist", 1),
            ChatAction::shortlist("Add U of Toronto to shortlist", 4),
        ]),
        suggestions: Some(
            [
                "Tell me more about MIT",
                "Add University of Toronto to shortlist",
                "What are my chances?",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        ),
    }
}

fn profile_analysis(profile: &ProfileSnapshot) -> String {
    let gpa_line = match profile.gpa {
        Some(gpa) if gpa >= 3.5 => format!("{gpa} (competitive)"),
        Some(gpa) => format!("{gpa} (consider highlighting other strengths)"),
        None => "not provided".to_string(),
    };
    let ielts = profile.ielts_status.as_deref().unwrap_or("not_started");
    let sop = profile.sop_status.as_deref().unwrap_or("not_started");
    let ielts_done = ielts == EXAM_COMPLETED;
    let sop_ready = sop == SOP_READY;

    format!(
        "Here's my analysis of your profile:\n\n\
         **Academic Background**\n\
         - GPA: {gpa_line}\n\
         - Degree: {degree} in {major}\n\n\
         **Test Readiness**\n\
         - IELTS/TOEFL: {ielts} {ielts_note}\n\
         - GRE/GMAT: {gre}\n\n\
         **Application Materials**\n\
         - SOP Status: {sop} {sop_note}\n\n\
         **Budget**\n\
         - Range: ${min} - ${max}/year\n\
         - Funding: {funding}\n\n\
         **Recommended Next Steps:**\n\
         1. {step1}\n\
         2. {step2}\n\
         3. Explore university options that match your profile\n\n\
         Would you like specific university recommendations?",
        degree = profile.degree.as_deref().unwrap_or("Not specified"),
        major = profile.major.as_deref().unwrap_or("Not specified"),
        ielts_note = if ielts_done { "(ready)" } else { "(priority action needed)" },
        gre = profile.gre_status.as_deref().unwrap_or("not_started"),
        sop_note = if sop_ready { "(good progress)" } else { "(needs attention)" },
        min = thousands(profile.budget_min.unwrap_or(0)),
        max = thousands(profile.budget_max.unwrap_or(0)),
        funding = profile.funding_type.as_deref().unwrap_or("Not specified"),
        step1 = if ielts_done { "IELTS done" } else { "Complete IELTS preparation" },
        step2 = if sop_ready { "SOP ready" } else { "Start working on your SOP" },
    )
}

fn thousands(value: i32) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if value < 0 {
        out.insert(0, '-');
    }
    out
}

/// Checklist for the user's current stage.
pub fn stage_advice(stage: JourneyStage, profile: &ProfileSnapshot) -> String {
    match stage {
        JourneyStage::BuildingProfile => "**Stage 1: Complete Your Profile**\n\
             - Fill in your academic background\n\
             - Set your study goals and preferences\n\
             - Define your budget range\n\
             - Update exam readiness status"
            .to_string(),
        JourneyStage::DiscoveringUniversities => "**Stage 2: Discover Universities**\n\
             - Browse universities matching your profile\n\
             - Consider Dream, Target, and Safe options\n\
             - Research program details and requirements\n\
             - Start shortlisting potential matches"
            .to_string(),
        JourneyStage::FinalizingUniversities => "**Stage 3: Finalize Your List**\n\
             - Review your shortlisted universities\n\
             - Compare costs, deadlines, and requirements\n\
             - Lock at least one university to proceed\n\
             - This commits you to the application stage"
            .to_string(),
        JourneyStage::PreparingApplications => {
            let mut lines = vec!["**Stage 4: Application Preparation**".to_string()];
            if profile.ielts_status.as_deref() != Some(EXAM_COMPLETED) {
                lines.push("- Complete IELTS/TOEFL exam".into());
            }
            if profile.sop_status.as_deref() != Some(SOP_READY) {
                lines.push("- Finalize your Statement of Purpose".into());
            }
            lines.extend(
                [
                    "- Gather official transcripts",
                    "- Request recommendation letters",
                    "- Prepare application documents",
                    "- Submit applications before deadlines",
                ]
                .map(String::from),
            );
            lines.join("\n")
        }
    }
}

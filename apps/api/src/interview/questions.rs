//! Question generation: turns a candidate profile into stored interview questions.
//!
//! Flow: validate profile → build prompt → one model call → split/clean the
//! returned text into ordered question lines → insert a new `mock_interview`
//! row (status=ongoing) → return the questions and the store-assigned id.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::interview::prompts::{GENERATE_QUESTIONS_TEMPLATE, INTERVIEWER_SYSTEM};
use crate::llm_client::ChatModel;
use crate::models::interview::{InterviewStatus, NewMockInterview, RecordId};
use crate::store::InterviewStore;

/// Free text is trimmed and capped to this many chars before prompt embedding.
/// Stored record fields keep the caller's original values.
const MAX_PROMPT_FIELD_CHARS: usize = 400;

/// Candidate profile submitted to the generation endpoint.
///
/// `questionType`, `company` and `position` are required and must be
/// non-blank; the rest is optional passthrough. `experience` accepts either a
/// JSON string or a number ("5" and 5 are both fine); `user_id` is an opaque
/// external identity reference forwarded to the store verbatim.
#[derive(Debug, Clone, Deserialize)]
pub struct InterviewProfile {
    pub skills: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub experience: Option<String>,
    #[serde(rename = "questionType")]
    pub question_type: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub user_id: Option<Value>,
}

/// Result of the generation operation.
#[derive(Debug)]
pub struct GeneratedQuestions {
    pub questions: Vec<String>,
    pub id: RecordId,
}

/// Runs the question generation operation.
///
/// One outbound model call, one store insert, in that order; a store failure
/// does not retry or undo the model call. Resubmitting the same profile
/// creates a new record (and, at temperature 0.7, likely different questions).
pub async fn generate_questions(
    model: &dyn ChatModel,
    store: &dyn InterviewStore,
    profile: InterviewProfile,
) -> Result<GeneratedQuestions, AppError> {
    validate_profile(&profile)?;

    let prompt = build_generation_prompt(&profile);
    let content = model
        .chat(&prompt, INTERVIEWER_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Question generation call failed: {e}")))?;

    let questions = parse_question_lines(&content);
    if questions.is_empty() {
        return Err(AppError::Llm(
            "model returned no usable question lines".to_string(),
        ));
    }

    let row = NewMockInterview {
        user_id: profile.user_id.clone(),
        interview_type: profile.question_type.clone().unwrap_or_default(),
        questions: questions.clone(),
        company_applied: profile.company.clone().unwrap_or_default(),
        position_applied: profile.position.clone().unwrap_or_default(),
        status: InterviewStatus::Ongoing,
    };
    let id = store.insert_interview(&row).await?;

    info!(
        "Stored mock interview {id} ({} questions, type {})",
        questions.len(),
        row.interview_type
    );

    Ok(GeneratedQuestions { questions, id })
}

/// Rejects profiles missing any of the three required fields. Blank-after-trim
/// counts as missing. Runs before any external call is made.
fn validate_profile(profile: &InterviewProfile) -> Result<(), AppError> {
    let mut missing = Vec::new();
    if is_blank(profile.question_type.as_deref()) {
        missing.push("questionType");
    }
    if is_blank(profile.company.as_deref()) {
        missing.push("company");
    }
    if is_blank(profile.position.as_deref()) {
        missing.push("position");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |s| s.trim().is_empty())
}

fn build_generation_prompt(profile: &InterviewProfile) -> String {
    GENERATE_QUESTIONS_TEMPLATE
        .replace("{question_type}", &prompt_field(profile.question_type.as_deref()))
        .replace("{skills}", &prompt_field(profile.skills.as_deref()))
        .replace("{experience}", &prompt_field(profile.experience.as_deref()))
        .replace("{company}", &prompt_field(profile.company.as_deref()))
        .replace("{position}", &prompt_field(profile.position.as_deref()))
}

fn prompt_field(value: Option<&str>) -> String {
    value
        .unwrap_or_default()
        .trim()
        .chars()
        .take(MAX_PROMPT_FIELD_CHARS)
        .collect()
}

/// Splits raw model output into the ordered question list: one question per
/// non-empty trimmed line, with a leading "N. " numbering prefix removed.
fn parse_question_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| strip_numbering_prefix(line).to_string())
        .collect()
}

/// Strips a leading "digits, dot, optional whitespace" prefix. Lines without
/// that exact shape are returned unchanged.
fn strip_numbering_prefix(line: &str) -> &str {
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == line.len() {
        return line;
    }
    match rest.strip_prefix('.') {
        Some(after_dot) => after_dot.trim_start(),
        None => line,
    }
}

/// Accepts a JSON string or number (the source clients send both for
/// experience years) and renders it as text.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    }))
}

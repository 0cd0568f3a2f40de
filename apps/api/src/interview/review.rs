//! Response evaluation: critiques candidate answers and completes the record.
//!
//! Flow: validate the parallel question/response arrays → one concurrent model
//! call per pair (a failed call degrades that item to fixed sentinels, never
//! its siblings) → parse each critique into a [`FeedbackItem`] → keyword-count
//! rating per item → numeric mean → elapsed minutes from the caller-supplied
//! start time → update the `mock_interview` row (status=completed).

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::interview::prompts::{REVIEW_SYSTEM, REVIEW_TEMPLATE};
use crate::llm_client::ChatModel;
use crate::models::interview::{FeedbackItem, InterviewStatus, MockInterviewUpdate};
use crate::store::InterviewStore;

/// Keywords whose presence in the model's critique drives the percentage
/// rating: one point per keyword present, repeats count once. This is a crude
/// lexical heuristic over the critique text, not a semantic evaluation.
const RATING_CRITERIA: [&str; 4] = ["coherent", "relevant", "detailed", "clear"];

// Fallbacks for a successful call whose output lacks the expected parts.
const NO_FEEDBACK_FALLBACK: &str = "No feedback available.";
const NO_APPROACH_FALLBACK: &str = "No approach guidance available.";
const NO_EXAMPLE_FALLBACK: &str = "No example available.";

// Sentinels substituted when the per-item model call itself fails.
const FEEDBACK_ERROR: &str = "Error generating feedback.";
const APPROACH_ERROR: &str = "Error generating approach.";
const EXAMPLE_ERROR: &str = "Error generating example.";
const ZERO_RATING: &str = "0%";

/// Body of the review endpoint.
///
/// `questions` and `responses` stay raw JSON so that "not an array" gets the
/// same client-input rejection as "missing" and "mismatched length" instead
/// of a framework-level deserialization failure.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub questions: Option<Value>,
    pub responses: Option<Value>,
    pub started_at: Option<String>,
}

/// Runs the response evaluation operation and returns the updated rows as the
/// store reports them. An id matching no row updates nothing and is still a
/// success; only a store-level failure errors the request.
pub async fn evaluate_responses(
    model: &dyn ChatModel,
    store: &dyn InterviewStore,
    id: &str,
    request: ReviewRequest,
) -> Result<Vec<Value>, AppError> {
    let (questions, responses) = validate_review_request(&request)?;

    info!("Reviewing {} answers for interview {id}", questions.len());

    let feedback_futures = questions
        .iter()
        .zip(responses.iter())
        .map(|(question, response)| generate_feedback_item(model, question, response));
    let feedback: Vec<FeedbackItem> = join_all(feedback_futures).await;

    let ratings: Vec<String> = feedback.iter().map(|item| item.rating.clone()).collect();
    let overall = overall_score(&ratings);
    let completed_at = Utc::now();

    let update = MockInterviewUpdate {
        answers: responses,
        feedback,
        rating: ratings,
        status: InterviewStatus::Completed,
        completed_at,
        duration: duration_minutes(request.started_at.as_deref(), completed_at),
        overall_score: overall,
    };

    let rows = store.update_interview(id, &update).await?;
    if rows.is_empty() {
        warn!("Review update for interview {id} matched no rows");
    } else {
        info!("Completed interview {id} (overall score {overall:.1})");
    }

    Ok(rows)
}

/// Both arrays must be present, be arrays, and have equal length. Runs before
/// any model call is made.
fn validate_review_request(request: &ReviewRequest) -> Result<(Vec<String>, Vec<String>), AppError> {
    let questions = as_string_vec(request.questions.as_ref());
    let responses = as_string_vec(request.responses.as_ref());

    match (questions, responses) {
        (Some(questions), Some(responses)) if questions.len() == responses.len() => {
            Ok((questions, responses))
        }
        _ => Err(AppError::Validation(
            "questions and responses must be provided as arrays of equal length".to_string(),
        )),
    }
}

/// JSON array to owned strings; non-string elements are rendered to their
/// JSON text rather than rejected.
fn as_string_vec(value: Option<&Value>) -> Option<Vec<String>> {
    value?.as_array().map(|items| {
        items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect()
    })
}

/// Issues one model call for a question/answer pair. A failed call degrades
/// to the error sentinels and never propagates, so sibling calls proceed.
async fn generate_feedback_item(
    model: &dyn ChatModel,
    question: &str,
    response: &str,
) -> FeedbackItem {
    let prompt = REVIEW_TEMPLATE
        .replace("{question}", question)
        .replace("{response}", response);

    match model.chat(&prompt, REVIEW_SYSTEM).await {
        Ok(content) => build_feedback_item(question, response, &content),
        Err(e) => {
            warn!("Feedback call failed for question {question:?}: {e}");
            error_feedback_item(question, response)
        }
    }
}

/// Parses a free-text critique. Line 0 (trimmed, non-empty) is the feedback;
/// following lines are approach guidance until the first line containing
/// "example" (case-insensitive), which becomes the example and stops the
/// scan. Absent parts get their fixed fallbacks.
fn build_feedback_item(question: &str, response: &str, raw: &str) -> FeedbackItem {
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let feedback = lines.first().copied().unwrap_or(NO_FEEDBACK_FALLBACK);

    let mut approach_lines: Vec<&str> = Vec::new();
    let mut example: Option<&str> = None;
    for line in lines.iter().skip(1) {
        if line.to_lowercase().contains("example") {
            example = Some(line);
            break;
        }
        approach_lines.push(line);
    }

    let approach = if approach_lines.is_empty() {
        NO_APPROACH_FALLBACK.to_string()
    } else {
        approach_lines.join(" ")
    };

    FeedbackItem {
        question: question.to_string(),
        response: response.to_string(),
        feedback: feedback.to_string(),
        approach,
        example: example.unwrap_or(NO_EXAMPLE_FALLBACK).to_string(),
        rating: rate_response(raw),
    }
}

/// The fixed sentinel item for a failed per-item model call.
fn error_feedback_item(question: &str, response: &str) -> FeedbackItem {
    FeedbackItem {
        question: question.to_string(),
        response: response.to_string(),
        feedback: FEEDBACK_ERROR.to_string(),
        approach: APPROACH_ERROR.to_string(),
        example: EXAMPLE_ERROR.to_string(),
        rating: ZERO_RATING.to_string(),
    }
}

/// Percentage rating from keyword membership in the raw critique text:
/// round(matches / 4 * 100), formatted "N%".
fn rate_response(content: &str) -> String {
    let lower = content.to_lowercase();
    let matches = RATING_CRITERIA
        .iter()
        .filter(|&&keyword| lower.contains(keyword))
        .count();
    let percent = ((matches as f64 / RATING_CRITERIA.len() as f64) * 100.0).round() as u32;
    format!("{percent}%")
}

/// Arithmetic mean of the numeric parts of "N%" ratings; 0.0 for an empty
/// list. The numeric parse is deliberate: percentage strings are never summed
/// as text.
fn overall_score(ratings: &[String]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let total: f64 = ratings
        .iter()
        .map(|rating| rating.trim_end_matches('%').parse::<f64>().unwrap_or(0.0))
        .sum();
    total / ratings.len() as f64
}

/// Whole minutes between the caller-supplied start and the observed
/// completion, rounded. Unclamped: a future start yields a negative duration.
/// A missing or unparseable timestamp yields None (persisted as null).
fn duration_minutes(started_at: Option<&str>, completed_at: DateTime<Utc>) -> Option<i64> {
    let started = started_at.and_then(|s| DateTime::parse_from_rfc3339(s).ok())?;
    let elapsed_ms = completed_at
        .signed_duration_since(started)
        .num_milliseconds();
    Some((elapsed_ms as f64 / 60_000.0).round() as i64)
}

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Store-assigned identifier of a mock-interview record.
///
/// The key type belongs to the store (integer identity columns and uuid/text keys
/// both occur in practice), so the id is carried opaquely and echoed back to
/// callers exactly as the store returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Str(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{n}"),
            RecordId::Str(s) => write!(f, "{s}"),
        }
    }
}

/// Lifecycle status of a mock-interview record. The only transition is
/// ongoing -> completed, performed once by the review operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewStatus {
    Ongoing,
    Completed,
}

/// Per-question structured critique derived from one model call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub question: String,
    pub response: String,
    pub feedback: String,
    pub approach: String,
    pub example: String,
    pub rating: String,
}

/// Insert payload for a new `mock_interview` row. Field names match the
/// store's column names.
#[derive(Debug, Clone, Serialize)]
pub struct NewMockInterview {
    pub user_id: Option<Value>,
    pub interview_type: String,
    pub questions: Vec<String>,
    pub company_applied: String,
    pub position_applied: String,
    pub status: InterviewStatus,
}

/// Update payload applied to a `mock_interview` row when a review completes.
///
/// `duration` is null when the caller supplied no usable start timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct MockInterviewUpdate {
    pub answers: Vec<String>,
    pub feedback: Vec<FeedbackItem>,
    pub rating: Vec<String>,
    pub status: InterviewStatus,
    pub completed_at: DateTime<Utc>,
    pub duration: Option<i64>,
    pub overall_score: f64,
}

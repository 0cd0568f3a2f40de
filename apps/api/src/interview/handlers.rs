use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::interview::questions::{generate_questions, GeneratedQuestions, InterviewProfile};
use crate::interview::review::{evaluate_responses, ReviewRequest};
use crate::models::interview::RecordId;
use crate::state::AppState;

#[derive(Serialize)]
pub struct GenerateQuestionsResponse {
    pub questions: Vec<String>,
    pub message: &'static str,
    pub id: RecordId,
}

#[derive(Serialize)]
pub struct ReviewResponse {
    pub message: &'static str,
    pub data: Vec<Value>,
}

/// POST /api/generate-questions
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    Json(profile): Json<InterviewProfile>,
) -> Result<Json<GenerateQuestionsResponse>, AppError> {
    let GeneratedQuestions { questions, id } =
        generate_questions(state.model.as_ref(), state.store.as_ref(), profile).await?;

    Ok(Json(GenerateQuestionsResponse {
        questions,
        message: "Questions saved successfully!",
        id,
    }))
}

/// GET /api/get-questions
pub async fn handle_get_questions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Value>>, AppError> {
    let rows = state.store.list_interview_questions().await?;
    Ok(Json(rows))
}

/// POST /api/interview_review/:id
pub async fn handle_interview_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, AppError> {
    let data = evaluate_responses(state.model.as_ref(), state.store.as_ref(), &id, request).await?;

    Ok(Json(ReviewResponse {
        message: "Feedback saved successfully",
        data,
    }))
}

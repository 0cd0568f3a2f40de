pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Mock interview API
        .route(
            "/api/generate-questions",
            post(handlers::handle_generate_questions),
        )
        .route("/api/get-questions", get(handlers::handle_get_questions))
        .route(
            "/api/interview_review/:id",
            post(handlers::handle_interview_review),
        )
        .with_state(state)
}

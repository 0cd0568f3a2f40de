use std::sync::Arc;

use crate::llm_client::ChatModel;
use crate::store::InterviewStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Chat model behind the question and review prompts. Production wires
    /// [`crate::llm_client::GroqClient`]; tests substitute scripted stubs.
    pub model: Arc<dyn ChatModel>,
    /// Interview persistence. Production wires [`crate::store::SupabaseStore`].
    pub store: Arc<dyn InterviewStore>,
}

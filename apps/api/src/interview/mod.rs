// Mock interview engine.
// Implements: question generation, answer review, critique parsing, rating.
// All LLM calls go through llm_client; no direct Groq API calls here.

pub mod handlers;
pub mod prompts;
pub mod questions;
pub mod review;

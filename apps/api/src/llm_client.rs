//! LLM client, the single point of entry for all Groq API calls.
//!
//! ARCHITECTURAL RULE: no other module may call the completion API directly.
//! All model interactions go through the [`ChatModel`] trait so operations can
//! be tested against stub models.
//!
//! Model: llama-3.3-70b-versatile (hardcoded; do not make configurable, to
//! prevent drift). Calls are single-shot: a failed call is never retried; the
//! caller decides whether the failure is request-fatal or degrades one item.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
/// The model used for all LLM calls.
pub const MODEL: &str = "llama-3.3-70b-versatile";
const MAX_TOKENS: u32 = 200;
const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 1.0;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// A completion-generating chat model: one system + user exchange in,
/// generated text out. Missing content deserializes to an empty string; it is
/// the caller's business whether that is an error.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn chat(&self, prompt: &str, system: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GroqError {
    error: GroqErrorBody,
}

#[derive(Debug, Deserialize)]
struct GroqErrorBody {
    message: String,
}

/// The Groq-backed [`ChatModel`] used in production.
#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    api_key: String,
}

impl GroqClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

#[async_trait]
impl ChatModel for GroqClient {
    async fn chat(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let request_body = ChatCompletionRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            stream: false,
        };

        let response = self
            .client
            .post(GROQ_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse the provider's error message out of the body
            let message = serde_json::from_str::<GroqError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;

        if let Some(usage) = &completion.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(extract_content(completion))
    }
}

/// Pulls the generated text out of a chat completion. An absent message or
/// content field yields an empty string rather than an error.
fn extract_content(completion: ChatCompletionResponse) -> String {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_content_from_completion() {
        let json = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "1. Tell me about yourself"}}
            ],
            "usage": {"prompt_tokens": 40, "completion_tokens": 12, "total_tokens": 52}
        }"#;
        let completion: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(extract_content(completion), "1. Tell me about yourself");
    }

    #[test]
    fn test_extract_content_handles_missing_content() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let completion: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(extract_content(completion), "");
    }

    #[test]
    fn test_extract_content_handles_empty_choices() {
        let json = r#"{"choices": []}"#;
        let completion: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(extract_content(completion), "");
    }

    #[test]
    fn test_provider_error_body_parses() {
        let body = r#"{"error": {"message": "Rate limit reached", "type": "tokens"}}"#;
        let parsed: GroqError = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.message, "Rate limit reached");
    }

    #[test]
    fn test_request_serializes_openai_compatible_shape() {
        let request = ChatCompletionRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "You are an expert interviewer",
                },
                ChatMessage {
                    role: "user",
                    content: "Generate questions",
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            stream: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama-3.3-70b-versatile");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["max_tokens"], 200);
        assert_eq!(json["stream"], false);
    }
}

//! Supabase record store client (PostgREST).
//!
//! The store is an externally hosted table API keyed by a base URL and a
//! privileged service-role key. Exactly three operations are used: insert a
//! `mock_interview` row returning its store-assigned id, update a
//! `mock_interview` row by id returning the updated rows, and list every row
//! of `interview_questions`. The two table names are intentionally distinct.
//!
//! All access goes through the [`InterviewStore`] trait so operations can be
//! tested against stub stores.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::interview::{MockInterviewUpdate, NewMockInterview, RecordId};

const REST_PATH: &str = "rest/v1";
const MOCK_INTERVIEW_TABLE: &str = "mock_interview";
const INTERVIEW_QUESTIONS_TABLE: &str = "interview_questions";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("unexpected store response: {0}")]
    Decode(String),
}

/// Persistence operations needed by the interview endpoints.
///
/// Updating an id that matches no row is NOT an error: the store reports zero
/// affected rows and callers surface that as-is.
#[async_trait]
pub trait InterviewStore: Send + Sync {
    /// Inserts a new mock-interview row and returns its store-assigned id.
    async fn insert_interview(&self, row: &NewMockInterview) -> Result<RecordId, StoreError>;

    /// Applies a completion update to the row with the given id and returns
    /// the updated rows as the store reports them (possibly none).
    async fn update_interview(
        &self,
        id: &str,
        update: &MockInterviewUpdate,
    ) -> Result<Vec<Value>, StoreError>;

    /// Returns every row of the `interview_questions` table.
    async fn list_interview_questions(&self) -> Result<Vec<Value>, StoreError>;
}

#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: String,
}

/// The Supabase-backed [`InterviewStore`] used in production.
#[derive(Clone)]
pub struct SupabaseStore {
    client: Client,
    base_url: String,
    service_role_key: String,
}

impl SupabaseStore {
    pub fn new(base_url: String, service_role_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_role_key,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}/{}", self.base_url, REST_PATH, table)
    }
}

#[async_trait]
impl InterviewStore for SupabaseStore {
    async fn insert_interview(&self, row: &NewMockInterview) -> Result<RecordId, StoreError> {
        let response = self
            .client
            .post(self.table_url(MOCK_INTERVIEW_TABLE))
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .header("Prefer", "return=representation")
            .json(&[row])
            .send()
            .await?;

        let rows = read_rows(response).await?;
        extract_inserted_id(&rows)
    }

    async fn update_interview(
        &self,
        id: &str,
        update: &MockInterviewUpdate,
    ) -> Result<Vec<Value>, StoreError> {
        let response = self
            .client
            .patch(self.table_url(MOCK_INTERVIEW_TABLE))
            .query(&[("id", format!("eq.{id}"))])
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .header("Prefer", "return=representation")
            .json(update)
            .send()
            .await?;

        read_rows(response).await
    }

    async fn list_interview_questions(&self) -> Result<Vec<Value>, StoreError> {
        let response = self
            .client
            .get(self.table_url(INTERVIEW_QUESTIONS_TABLE))
            .query(&[("select", "*")])
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .send()
            .await?;

        read_rows(response).await
    }
}

/// Maps a PostgREST response to its row array, converting non-2xx statuses to
/// a typed error carrying the provider's message when one is present.
async fn read_rows(response: reqwest::Response) -> Result<Vec<Value>, StoreError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<PostgrestError>(&body)
            .map(|e| e.message)
            .unwrap_or(body);
        return Err(StoreError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response.json().await?)
}

/// Pulls the store-assigned id out of an insert's returned representation.
fn extract_inserted_id(rows: &[Value]) -> Result<RecordId, StoreError> {
    let id_value = rows
        .first()
        .and_then(|row| row.get("id"))
        .cloned()
        .ok_or_else(|| StoreError::Decode("insert returned no id".to_string()))?;

    serde_json::from_value(id_value)
        .map_err(|e| StoreError::Decode(format!("unrecognized id value: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_inserted_id_integer_key() {
        let rows = vec![serde_json::json!({"id": 17, "status": "ongoing"})];
        let id = extract_inserted_id(&rows).unwrap();
        assert_eq!(id, RecordId::Int(17));
    }

    #[test]
    fn test_extract_inserted_id_uuid_key() {
        let rows = vec![serde_json::json!({"id": "6f1c1a2e-9d7b-4f7e-8a30-0d9f4c1f2ab3"})];
        let id = extract_inserted_id(&rows).unwrap();
        assert_eq!(
            id,
            RecordId::Str("6f1c1a2e-9d7b-4f7e-8a30-0d9f4c1f2ab3".to_string())
        );
    }

    #[test]
    fn test_extract_inserted_id_rejects_empty_representation() {
        let err = extract_inserted_id(&[]).unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[test]
    fn test_extract_inserted_id_rejects_row_without_id() {
        let rows = vec![serde_json::json!({"status": "ongoing"})];
        let err = extract_inserted_id(&rows).unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[test]
    fn test_table_url_handles_trailing_slash() {
        let store = SupabaseStore::new(
            "https://project.supabase.co/".to_string(),
            "service-role-key".to_string(),
        );
        assert_eq!(
            store.table_url("mock_interview"),
            "https://project.supabase.co/rest/v1/mock_interview"
        );
    }

    #[test]
    fn test_postgrest_error_body_parses() {
        let body = r#"{"code": "42P01", "message": "relation does not exist"}"#;
        let parsed: PostgrestError = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.message, "relation does not exist");
    }
}

//! HTTP conversation store implementation
//!
//! Calls the hosted conversation store's REST API using the reqwest HTTP
//! client. Responses use the store's envelope conventions: lists arrive as
//! `{ "data": [...] }`, single resources arrive bare.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{AssistantConfig, AssistantError, AssistantService, Thread, ThreadSummary};

/// List envelope for collection endpoints
#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    data: Vec<T>,
}

#[derive(Debug, Serialize)]
struct SubmitMessageRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeneratedNameResponse {
    name: String,
}

/// Store error response body
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// HTTP conversation store client
pub struct HttpAssistantClient {
    client: Client,
    config: AssistantConfig,
}

impl HttpAssistantClient {
    /// Create a new client against the configured base URL
    pub fn new(config: AssistantConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Map a non-success response into an `AssistantError`, surfacing the
    /// store's own message when the body parses as its error envelope.
    async fn error_from_response(
        &self,
        thread_id: Option<&str>,
        response: reqwest::Response,
    ) -> AssistantError {
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return AssistantError::NotFound(thread_id.unwrap_or("unknown").to_string());
        }

        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());

        if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_body) {
            return AssistantError::Response(format!(
                "Store returned {}: {}",
                status, error_response.error.message
            ));
        }

        AssistantError::Response(format!("Store returned {}: {}", status, error_body))
    }
}

#[async_trait::async_trait]
impl AssistantService for HttpAssistantClient {
    async fn list_threads(&self) -> Result<Vec<ThreadSummary>, AssistantError> {
        let response = self
            .client
            .get(self.url("/threads"))
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| AssistantError::Request(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(self.error_from_response(None, response).await);
        }

        let list: ListResponse<ThreadSummary> = response
            .json()
            .await
            .map_err(|e| AssistantError::Response(format!("Failed to parse response: {}", e)))?;

        Ok(list.data)
    }

    async fn create_thread(&self) -> Result<Thread, AssistantError> {
        let response = self
            .client
            .post(self.url("/threads"))
            .bearer_auth(&self.config.api_key)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| AssistantError::Request(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(self.error_from_response(None, response).await);
        }

        response
            .json()
            .await
            .map_err(|e| AssistantError::Response(format!("Failed to parse response: {}", e)))
    }

    async fn fetch_thread(&self, thread_id: &str) -> Result<Thread, AssistantError> {
        let response = self
            .client
            .get(self.url(&format!("/threads/{}", thread_id)))
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| AssistantError::Request(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(self.error_from_response(Some(thread_id), response).await);
        }

        response
            .json()
            .await
            .map_err(|e| AssistantError::Response(format!("Failed to parse response: {}", e)))
    }

    async fn submit_message(
        &self,
        thread_id: &str,
        text: &str,
    ) -> Result<Thread, AssistantError> {
        tracing::debug!(thread_id = %thread_id, "Submitting message to conversation store");

        let response = self
            .client
            .post(self.url(&format!("/threads/{}/messages", thread_id)))
            .bearer_auth(&self.config.api_key)
            .json(&SubmitMessageRequest { text })
            .send()
            .await
            .map_err(|e| AssistantError::Request(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(self.error_from_response(Some(thread_id), response).await);
        }

        response
            .json()
            .await
            .map_err(|e| AssistantError::Response(format!("Failed to parse response: {}", e)))
    }

    async fn generate_thread_name(&self, thread_id: &str) -> Result<String, AssistantError> {
        let response = self
            .client
            .post(self.url(&format!("/threads/{}/name", thread_id)))
            .bearer_auth(&self.config.api_key)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| AssistantError::Request(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(self.error_from_response(Some(thread_id), response).await);
        }

        let generated: GeneratedNameResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::Response(format!("Failed to parse response: {}", e)))?;

        Ok(generated.name)
    }

    async fn delete_thread(&self, thread_id: &str) -> Result<(), AssistantError> {
        let response = self
            .client
            .delete(self.url(&format!("/threads/{}", thread_id)))
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| AssistantError::Request(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(self.error_from_response(Some(thread_id), response).await);
        }

        Ok(())
    }
}

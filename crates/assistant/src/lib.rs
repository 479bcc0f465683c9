//! Canvasforge Conversation Store Client
//!
//! The conversation store is the external AI service that owns threads,
//! messages, and component generation. Canvasforge never interprets prompts
//! itself; it proxies conversation operations and reads the artifacts the
//! assistant attached to each message.
//!
//! - HTTP client for the hosted store
//! - Programmable mock with an in-memory thread store for testing

pub mod http;
pub mod mock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Assistant configuration error: {0}")]
    Configuration(String),

    #[error("Assistant request error: {0}")]
    Request(String),

    #[error("Assistant response error: {0}")]
    Response(String),

    #[error("Thread not found: {0}")]
    NotFound(String),
}

impl From<AssistantError> for canvasforge_common::Error {
    fn from(error: AssistantError) -> Self {
        match error {
            AssistantError::NotFound(message) => canvasforge_common::Error::NotFound(message),
            AssistantError::Configuration(message) => {
                canvasforge_common::Error::Configuration(message)
            }
            other => canvasforge_common::Error::Upstream(other.to_string()),
        }
    }
}

/// Message author role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One block of message content. The store sends text in typed parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type")]
    pub part_type: String,
    pub text: String,
}

/// A component invocation the assistant attached to a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentInvocation {
    pub name: String,
    pub props: serde_json::Value,
}

/// One message in a thread, including any generated component artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub id: String,
    pub role: MessageRole,
    #[serde(default)]
    pub content: Vec<ContentPart>,
    #[serde(default)]
    pub component: Option<ComponentInvocation>,
    #[serde(default)]
    pub rendered_html: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ThreadMessage {
    /// Concatenated text content of the message
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|part| part.text.as_str())
            .collect::<Vec<_>>()
            .join("")
    }

    /// True when the message carries no visible text (artifact-only turns)
    pub fn is_blank(&self) -> bool {
        self.text().trim().is_empty()
    }
}

/// Thread listing entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadSummary {
    pub id: String,
    pub name: Option<String>,
    pub message_count: i64,
    pub updated_at: DateTime<Utc>,
}

/// A full thread with its message log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    pub name: Option<String>,
    #[serde(default)]
    pub messages: Vec<ThreadMessage>,
}

/// Conversation store configuration
#[derive(Clone)]
pub struct AssistantConfig {
    pub provider: String,
    pub api_key: String,
    pub base_url: String,
}

impl std::fmt::Debug for AssistantConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantConfig")
            .field("provider", &self.provider)
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Conversation store operations used by the rest of the application
#[async_trait::async_trait]
pub trait AssistantService: Send + Sync {
    async fn list_threads(&self) -> Result<Vec<ThreadSummary>, AssistantError>;

    async fn create_thread(&self) -> Result<Thread, AssistantError>;

    async fn fetch_thread(&self, thread_id: &str) -> Result<Thread, AssistantError>;

    /// Append a user turn; the store replies with the full thread including
    /// the assistant turn and any component artifact it produced.
    async fn submit_message(&self, thread_id: &str, text: &str)
        -> Result<Thread, AssistantError>;

    /// Ask the store to derive a short display name from the conversation
    async fn generate_thread_name(&self, thread_id: &str) -> Result<String, AssistantError>;

    async fn delete_thread(&self, thread_id: &str) -> Result<(), AssistantError>;
}

/// Factory for creating AssistantService implementations
pub struct AssistantServiceFactory;

impl AssistantServiceFactory {
    pub fn create(config: AssistantConfig) -> Result<Arc<dyn AssistantService>, AssistantError> {
        match config.provider.as_str() {
            "openai" => {
                tracing::info!("Creating HTTP conversation store client");
                Ok(Arc::new(http::HttpAssistantClient::new(config)))
            }
            "mock" => {
                tracing::info!("Creating mock conversation store");
                Ok(Arc::new(mock::MockAssistantService::new()))
            }
            provider => Err(AssistantError::Configuration(format!(
                "Unknown assistant provider: {}. Supported providers: openai, mock",
                provider
            ))),
        }
    }
}

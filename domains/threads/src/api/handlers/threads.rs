//! Thread management API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use canvasforge_assistant::{MessageRole, Thread, ThreadMessage, ThreadSummary};
use canvasforge_common::{Pagination, Result, ValidatedJson};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::ThreadsState;

/// Request for submitting a message to a thread
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitMessageRequest {
    #[validate(length(min = 1, max = 4000))]
    pub text: String,
}

/// Thread listing entry DTO
#[derive(Debug, Serialize)]
pub struct ThreadSummaryResponse {
    pub id: String,
    pub name: Option<String>,
    pub message_count: i64,
    pub updated_at: DateTime<Utc>,
}

impl From<ThreadSummary> for ThreadSummaryResponse {
    fn from(summary: ThreadSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            message_count: summary.message_count,
            updated_at: summary.updated_at,
        }
    }
}

/// One visible transcript turn. Artifact payloads are served by the
/// canvas endpoint, not the transcript.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub role: MessageRole,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<&ThreadMessage> for MessageResponse {
    fn from(message: &ThreadMessage) -> Self {
        Self {
            id: message.id.clone(),
            role: message.role,
            text: message.text(),
            created_at: message.created_at,
        }
    }
}

/// Full thread DTO with its visible transcript
#[derive(Debug, Serialize)]
pub struct ThreadResponse {
    pub id: String,
    pub name: Option<String>,
    pub messages: Vec<MessageResponse>,
}

impl From<Thread> for ThreadResponse {
    fn from(thread: Thread) -> Self {
        let messages = canvasforge_canvas::transcript(&thread.messages)
            .into_iter()
            .map(Into::into)
            .collect();
        Self {
            id: thread.id,
            name: thread.name,
            messages,
        }
    }
}

/// One thread that could not be deleted during a bulk clear
#[derive(Debug, Serialize)]
pub struct BulkDeleteFailure {
    pub id: String,
    pub error: String,
}

/// Outcome of a bulk thread deletion
#[derive(Debug, Serialize)]
pub struct BulkDeleteResponse {
    pub deleted: usize,
    pub failed: Vec<BulkDeleteFailure>,
}

/// List threads known to the conversation store
pub async fn list_threads(
    State(state): State<ThreadsState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<ThreadSummaryResponse>>> {
    let summaries = state.assistant.list_threads().await?;

    let responses: Vec<ThreadSummaryResponse> = summaries
        .into_iter()
        .skip(pagination.offset())
        .take(pagination.limit())
        .map(Into::into)
        .collect();
    Ok(Json(responses))
}

/// Create a new empty thread
pub async fn create_thread(
    State(state): State<ThreadsState>,
) -> Result<(StatusCode, Json<ThreadResponse>)> {
    let thread = state.assistant.create_thread().await?;
    Ok((StatusCode::CREATED, Json(thread.into())))
}

/// Get a single thread with its visible transcript
pub async fn get_thread(
    State(state): State<ThreadsState>,
    Path(thread_id): Path<String>,
) -> Result<Json<ThreadResponse>> {
    let thread = state.assistant.fetch_thread(&thread_id).await?;
    Ok(Json(thread.into()))
}

/// Submit a user message and return the updated thread
pub async fn submit_message(
    State(state): State<ThreadsState>,
    Path(thread_id): Path<String>,
    ValidatedJson(req): ValidatedJson<SubmitMessageRequest>,
) -> Result<Json<ThreadResponse>> {
    let mut thread = state.assistant.submit_message(&thread_id, &req.text).await?;

    // Name the thread off its first exchange; a naming failure never
    // fails the message itself.
    if thread.name.is_none() && thread.messages.len() >= 2 {
        match state.assistant.generate_thread_name(&thread_id).await {
            Ok(name) => {
                tracing::debug!(thread_id = %thread_id, name = %name, "Auto-named thread");
                thread.name = Some(name);
            }
            Err(error) => {
                tracing::warn!(
                    thread_id = %thread_id,
                    error = %error,
                    "Thread auto-naming failed"
                );
            }
        }
    }

    Ok(Json(thread.into()))
}

/// Delete a single thread
pub async fn delete_thread(
    State(state): State<ThreadsState>,
    Path(thread_id): Path<String>,
) -> Result<StatusCode> {
    state.assistant.delete_thread(&thread_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete every thread, reporting per-thread failures instead of
/// aborting on the first one
pub async fn delete_all_threads(
    State(state): State<ThreadsState>,
) -> Result<Json<BulkDeleteResponse>> {
    let summaries = state.assistant.list_threads().await?;

    let deletes = summaries.into_iter().map(|summary| {
        let assistant = state.assistant.clone();
        async move {
            let outcome = assistant.delete_thread(&summary.id).await;
            (summary.id, outcome)
        }
    });

    let mut deleted = 0;
    let mut failed = Vec::new();
    for (id, outcome) in join_all(deletes).await {
        match outcome {
            Ok(()) => deleted += 1,
            Err(error) => {
                tracing::warn!(
                    thread_id = %id,
                    error = %error,
                    "Thread deletion failed during bulk clear"
                );
                failed.push(BulkDeleteFailure {
                    id,
                    error: error.to_string(),
                });
            }
        }
    }

    Ok(Json(BulkDeleteResponse { deleted, failed }))
}

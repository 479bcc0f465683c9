//! Canvas view API handler
//!
//! Serves the reduced canvas for a thread: the newest artifact per
//! component kind, in first-seen order.

use axum::{
    extract::{Path, State},
    Json,
};
use canvasforge_canvas::{reduce, Artifact, ComponentKind};
use canvasforge_common::Result;
use serde::Serialize;
use serde_json::Value;

use crate::api::middleware::ThreadsState;

/// One canvas slot: the newest artifact for a component kind
#[derive(Debug, Serialize)]
pub struct CanvasItemResponse {
    pub kind: ComponentKind,
    pub message_id: String,
    pub props: Value,
    pub rendered_html: String,
}

impl From<Artifact> for CanvasItemResponse {
    fn from(artifact: Artifact) -> Self {
        Self {
            kind: artifact.kind,
            message_id: artifact.message_id,
            props: artifact.props,
            rendered_html: artifact.rendered_html,
        }
    }
}

/// Reduced canvas for one thread
#[derive(Debug, Serialize)]
pub struct CanvasResponse {
    pub items: Vec<CanvasItemResponse>,
    pub empty: bool,
}

/// Get the reduced canvas for a thread
pub async fn get_canvas(
    State(state): State<ThreadsState>,
    Path(thread_id): Path<String>,
) -> Result<Json<CanvasResponse>> {
    let thread = state.assistant.fetch_thread(&thread_id).await?;

    let items: Vec<CanvasItemResponse> = reduce(&thread.messages)
        .into_values()
        .map(Into::into)
        .collect();
    let empty = items.is_empty();

    Ok(Json(CanvasResponse { items, empty }))
}

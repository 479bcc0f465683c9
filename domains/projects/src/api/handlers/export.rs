//! Project export API handler

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use canvasforge_canvas::reduce;
use canvasforge_common::{project_slug, Error, Result, DEFAULT_PROJECT_SLUG};
use canvasforge_session::{Sink, Visitor};

use crate::api::middleware::ProjectsState;
use crate::domain::archive::build_archive;
use crate::domain::materializer::materialize;

/// Export a thread's canvas as a zip archive of the materialized project
pub async fn export_project(
    Visitor { visitor_id }: Visitor,
    State(state): State<ProjectsState>,
    Path(thread_id): Path<String>,
) -> Result<Response> {
    let _guard = state
        .sessions
        .try_acquire(visitor_id, Sink::Export)
        .ok_or(Error::SinkBusy(Sink::Export.label()))?;

    let thread = state.assistant.fetch_thread(&thread_id).await?;
    let files = materialize(&reduce(&thread.messages))?;
    let bytes = build_archive(&files)?;

    let slug = thread
        .name
        .as_deref()
        .map(project_slug)
        .unwrap_or_else(|| DEFAULT_PROJECT_SLUG.to_string());

    tracing::info!(
        thread_id = %thread_id,
        files = files.len(),
        bytes = bytes.len(),
        "Exported project archive"
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}.zip\"", slug),
            ),
        ],
        bytes,
    )
        .into_response())
}

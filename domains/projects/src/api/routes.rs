//! Route definitions for Projects domain API

use axum::{routing::post, Router};

use super::handlers::{export, github, vercel};
use super::middleware::ProjectsState;

/// Create all Projects domain API routes. Every sink is a POST: each call
/// performs work against an external destination.
pub fn routes() -> Router<ProjectsState> {
    Router::new()
        .route(
            "/v1/threads/{thread_id}/export",
            post(export::export_project),
        )
        .route(
            "/v1/threads/{thread_id}/publish/github",
            post(github::publish_github),
        )
        .route(
            "/v1/threads/{thread_id}/publish/vercel",
            post(vercel::publish_vercel),
        )
}

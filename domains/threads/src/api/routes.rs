//! Route definitions for Threads domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{canvas, threads};
use super::middleware::ThreadsState;

/// Create thread management routes
fn thread_routes() -> Router<ThreadsState> {
    Router::new()
        .route(
            "/v1/threads",
            get(threads::list_threads)
                .post(threads::create_thread)
                .delete(threads::delete_all_threads),
        )
        .route(
            "/v1/threads/{thread_id}",
            get(threads::get_thread).delete(threads::delete_thread),
        )
        .route(
            "/v1/threads/{thread_id}/messages",
            post(threads::submit_message),
        )
}

/// Create canvas view routes
fn canvas_routes() -> Router<ThreadsState> {
    Router::new().route("/v1/threads/{thread_id}/canvas", get(canvas::get_canvas))
}

/// Create all Threads domain API routes
pub fn routes() -> Router<ThreadsState> {
    Router::new().merge(thread_routes()).merge(canvas_routes())
}

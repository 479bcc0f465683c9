//! Middleware and shared state for threads routes

use std::sync::Arc;

use canvasforge_assistant::AssistantService;

/// Shared state for threads routes
#[derive(Clone)]
pub struct ThreadsState {
    pub assistant: Arc<dyn AssistantService>,
}

//! Middleware and shared state for projects routes

use std::sync::Arc;

use axum::extract::FromRef;
use canvasforge_assistant::AssistantService;
use canvasforge_github::GithubApi;
use canvasforge_session::SessionStore;
use canvasforge_vercel::VercelApi;

/// Shared state for projects routes
#[derive(Clone)]
pub struct ProjectsState {
    pub assistant: Arc<dyn AssistantService>,
    pub sessions: SessionStore,
    pub github: Arc<dyn GithubApi>,
    pub vercel: Arc<dyn VercelApi>,
}

/// Lets the `Visitor` extractor resolve the vault from this state
impl FromRef<ProjectsState> for SessionStore {
    fn from_ref(state: &ProjectsState) -> Self {
        state.sessions.clone()
    }
}

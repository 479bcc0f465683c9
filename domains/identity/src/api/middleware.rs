//! Identity domain state and session integration

use std::sync::Arc;

use axum::extract::FromRef;

use canvasforge_common::Config;
use canvasforge_github::GithubApi;
use canvasforge_session::SessionStore;

/// Application state for the Identity domain
#[derive(Clone)]
pub struct IdentityState {
    pub sessions: SessionStore,
    pub github: Arc<dyn GithubApi>,
    pub config: Arc<Config>,
}

impl FromRef<IdentityState> for SessionStore {
    fn from_ref(state: &IdentityState) -> Self {
        state.sessions.clone()
    }
}

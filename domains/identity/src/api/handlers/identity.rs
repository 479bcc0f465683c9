//! Identity view and session bootstrap handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use uuid::Uuid;

use canvasforge_session::{SessionStore, Visitor};

use crate::api::middleware::IdentityState;

/// Response for minting a visitor session
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub visitor_id: Uuid,
}

/// GitHub connection summary
#[derive(Debug, Serialize)]
pub struct GithubIdentity {
    pub connected: bool,
    pub login: Option<String>,
    pub avatar_url: Option<String>,
}

/// Vercel token summary
#[derive(Debug, Serialize)]
pub struct VercelIdentity {
    pub connected: bool,
}

/// Identity response DTO
#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    pub visitor_id: Uuid,
    pub github: GithubIdentity,
    pub vercel: VercelIdentity,
}

/// Build the identity view for a visitor from the session vault
pub(crate) fn identity_view(sessions: &SessionStore, visitor_id: Uuid) -> IdentityResponse {
    let credential = sessions.github_credential(visitor_id);
    IdentityResponse {
        visitor_id,
        github: GithubIdentity {
            connected: credential.is_some(),
            login: credential.as_ref().and_then(|c| c.login.clone()),
            avatar_url: credential.and_then(|c| c.avatar_url),
        },
        vercel: VercelIdentity {
            connected: sessions.vercel_token(visitor_id).is_some(),
        },
    }
}

/// Mint a visitor id for first-run clients
pub async fn create_session(
    State(state): State<IdentityState>,
) -> (StatusCode, Json<SessionResponse>) {
    let visitor_id = state.sessions.create_visitor();
    tracing::debug!(%visitor_id, "Created visitor session");
    (StatusCode::CREATED, Json(SessionResponse { visitor_id }))
}

/// Get the caller's connection summary
pub async fn get_identity(
    Visitor { visitor_id }: Visitor,
    State(state): State<IdentityState>,
) -> Json<IdentityResponse> {
    Json(identity_view(&state.sessions, visitor_id))
}

//! Vercel deploy token handlers
//!
//! Vercel has no OAuth handshake here; the visitor pastes a personal
//! deployment token which is cached in the session vault for publishes.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use validator::Validate;

use canvasforge_common::{token_fingerprint, ValidatedJson};
use canvasforge_session::Visitor;

use super::identity::{identity_view, IdentityResponse};
use crate::api::middleware::IdentityState;

/// Request for caching a Vercel deployment token
#[derive(Debug, Deserialize, Validate)]
pub struct VercelTokenRequest {
    #[validate(length(min = 1, max = 255))]
    pub token: String,
}

/// Cache a deployment token for the visitor
pub async fn put_token(
    Visitor { visitor_id }: Visitor,
    State(state): State<IdentityState>,
    ValidatedJson(req): ValidatedJson<VercelTokenRequest>,
) -> Json<IdentityResponse> {
    tracing::info!(
        %visitor_id,
        token = %token_fingerprint(&req.token),
        "Cached Vercel deployment token"
    );
    state.sessions.set_vercel_token(visitor_id, req.token);
    Json(identity_view(&state.sessions, visitor_id))
}

/// Drop the cached deployment token
pub async fn delete_token(
    Visitor { visitor_id }: Visitor,
    State(state): State<IdentityState>,
) -> StatusCode {
    state.sessions.clear_vercel_token(visitor_id);
    tracing::debug!(%visitor_id, "Cleared Vercel deployment token");
    StatusCode::NO_CONTENT
}

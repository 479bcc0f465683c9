//! Route definitions for Identity domain API

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::handlers::{github, identity, vercel};
use super::middleware::IdentityState;

/// Create session bootstrap routes
fn session_routes() -> Router<IdentityState> {
    Router::new().route("/v1/session", post(identity::create_session))
}

/// Create identity routes
fn identity_routes() -> Router<IdentityState> {
    Router::new()
        .route("/v1/identity", get(identity::get_identity))
        .route("/v1/identity/github", delete(github::disconnect))
        .route("/v1/identity/github/authorize", get(github::authorize))
        .route("/v1/identity/github/exchange", post(github::exchange))
        .route("/v1/identity/github/connect", post(github::connect))
        .route(
            "/v1/identity/vercel/token",
            put(vercel::put_token).delete(vercel::delete_token),
        )
}

/// Create OAuth redirect routes (hit by the provider, not the frontend)
fn oauth_routes() -> Router<IdentityState> {
    Router::new().route("/auth/github/callback", get(github::callback))
}

/// Create all Identity domain API routes
pub fn routes() -> Router<IdentityState> {
    Router::new()
        .merge(session_routes())
        .merge(identity_routes())
        .merge(oauth_routes())
}

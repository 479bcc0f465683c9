//! GitHub connection handlers: OAuth flow, manual tokens, disconnect
//!
//! Two paths end in an established connection. The OAuth path mints an
//! authorize URL with a single-use CSRF state token, then receives the
//! provider redirect on `/auth/github/callback` and swaps the code using
//! the server-held client secret. The manual path accepts a pasted personal
//! access token. Either way the credential lives only in the session vault.

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use validator::Validate;

use canvasforge_common::{token_fingerprint, Error, Result, ValidatedJson};
use canvasforge_github::{AccessToken, GithubError};
use canvasforge_session::{ConnectionState, StoredCredential, Visitor};

use super::identity::{identity_view, IdentityResponse};
use crate::api::middleware::IdentityState;
use crate::domain::connection;

/// Response for starting the OAuth authorization flow
#[derive(Debug, Serialize)]
pub struct AuthorizeResponse {
    pub authorize_url: String,
    pub state: String,
}

/// Query params GitHub appends to the callback redirect
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Request for swapping an OAuth code without the redirect flow
#[derive(Debug, Deserialize, Validate)]
pub struct ExchangeRequest {
    #[validate(length(min = 1))]
    pub code: String,
}

/// Request for connecting with a personal access token
#[derive(Debug, Deserialize, Validate)]
pub struct ConnectRequest {
    #[validate(length(min = 1, max = 255))]
    pub token: String,
}

/// Start the OAuth flow: mint the authorize URL and a single-use state token
pub async fn authorize(
    Visitor { visitor_id }: Visitor,
    State(state): State<IdentityState>,
) -> Result<Json<AuthorizeResponse>> {
    let Some(client_id) = state.config.github_client_id.clone() else {
        return Err(Error::Configuration(
            "GITHUB_CLIENT_ID is not set".to_string(),
        ));
    };

    // Only a disconnected visitor enters Connecting here; an established
    // connection is kept until the new credential actually lands
    if state.sessions.connection_state(visitor_id) == ConnectionState::Disconnected {
        connection::begin_connect(&state.sessions, visitor_id)?;
    }

    // CSRF state: 32 random bytes, URL-safe base64 encoded (43 chars)
    let mut state_bytes = [0u8; 32];
    getrandom::getrandom(&mut state_bytes)
        .map_err(|e| Error::Internal(format!("Failed to generate random bytes: {}", e)))?;
    let csrf_state = URL_SAFE_NO_PAD.encode(state_bytes);

    state.sessions.begin_oauth(visitor_id, csrf_state.clone());

    let authorize_url = format!(
        "{}/authorize?client_id={}&scope=repo&state={}",
        state.config.github_oauth_base, client_id, csrf_state
    );

    tracing::debug!(%visitor_id, "Started GitHub authorization");

    Ok(Json(AuthorizeResponse {
        authorize_url,
        state: csrf_state,
    }))
}

/// Provider redirect target: swap the code, store the credential, bounce
/// the browser back to the frontend
pub async fn callback(
    State(state): State<IdentityState>,
    Query(params): Query<CallbackParams>,
) -> Response {
    let frontend = state.config.frontend_base_url.trim_end_matches('/');

    // The callback carries no visitor header; the state token is the only
    // way back to the session, and it resolves at most once
    let visitor_id = params
        .state
        .as_deref()
        .and_then(|token| state.sessions.consume_oauth_state(token));
    let Some(visitor_id) = visitor_id else {
        tracing::warn!("OAuth callback with unknown or reused state token");
        return redirect_to(format!("{frontend}/?auth_error=invalid_state"));
    };

    if let Some(error) = &params.error {
        tracing::warn!(%visitor_id, error, "GitHub authorization denied");
        let _ = connection::reject(&state.sessions, visitor_id);
        return redirect_to(format!("{frontend}/?auth_error={error}"));
    }

    let Some(code) = params.code else {
        let _ = connection::reject(&state.sessions, visitor_id);
        return redirect_to(format!("{frontend}/?auth_error=missing_code"));
    };

    match state.github.exchange_code(&code).await {
        Ok(token) => {
            let credential = profile_credential(&state, token.access_token).await;
            if let Err(error) = connection::establish(&state.sessions, visitor_id, credential) {
                tracing::error!(%visitor_id, %error, "Failed to record GitHub connection");
                return redirect_to(format!("{frontend}/?auth_error=connection_failed"));
            }
            tracing::info!(%visitor_id, "GitHub connected via OAuth");
            redirect_to(format!("{frontend}/chat"))
        }
        Err(error) => {
            tracing::warn!(%visitor_id, %error, "GitHub code exchange failed");
            let _ = connection::reject(&state.sessions, visitor_id);
            redirect_to(format!("{frontend}/?auth_error=exchange_failed"))
        }
    }
}

/// Swap an OAuth code for a token on behalf of the frontend
///
/// Stores the credential like the callback does, and additionally returns
/// the provider token payload to the caller.
pub async fn exchange(
    Visitor { visitor_id }: Visitor,
    State(state): State<IdentityState>,
    ValidatedJson(req): ValidatedJson<ExchangeRequest>,
) -> Result<Json<AccessToken>> {
    let token = match state.github.exchange_code(&req.code).await {
        Ok(token) => token,
        Err(error) => {
            connection::reject(&state.sessions, visitor_id)?;
            return Err(map_github_error(error));
        }
    };

    let credential = profile_credential(&state, token.access_token.clone()).await;
    connection::establish(&state.sessions, visitor_id, credential)?;
    tracing::info!(
        %visitor_id,
        token = %token_fingerprint(&token.access_token),
        "GitHub connected via code exchange"
    );

    Ok(Json(token))
}

/// Connect with a pasted personal access token
///
/// The token is verified by fetching the profile. A refused token reverts
/// the connect; a provider outage still connects, just without a profile.
pub async fn connect(
    Visitor { visitor_id }: Visitor,
    State(state): State<IdentityState>,
    ValidatedJson(req): ValidatedJson<ConnectRequest>,
) -> Result<Json<IdentityResponse>> {
    connection::begin_connect(&state.sessions, visitor_id)?;

    match state.github.get_authenticated_user(&req.token).await {
        Ok(user) => {
            tracing::info!(
                %visitor_id,
                login = %user.login,
                token = %token_fingerprint(&req.token),
                "GitHub connected with personal token"
            );
            let credential = StoredCredential {
                access_token: req.token,
                login: Some(user.login),
                avatar_url: user.avatar_url,
            };
            connection::establish(&state.sessions, visitor_id, credential)?;
        }
        Err(error) if error.is_auth() => {
            connection::reject(&state.sessions, visitor_id)?;
            return Err(Error::Auth(
                "GitHub rejected the personal access token".to_string(),
            ));
        }
        Err(error) => {
            tracing::warn!(%visitor_id, %error, "Profile fetch failed; connecting without one");
            connection::establish(&state.sessions, visitor_id, StoredCredential::bare(req.token))?;
        }
    }

    Ok(Json(identity_view(&state.sessions, visitor_id)))
}

/// Disconnect GitHub: drop the stored credential
pub async fn disconnect(
    Visitor { visitor_id }: Visitor,
    State(state): State<IdentityState>,
) -> Result<StatusCode> {
    connection::revoke(&state.sessions, visitor_id)?;
    tracing::info!(%visitor_id, "GitHub disconnected");
    Ok(StatusCode::NO_CONTENT)
}

fn redirect_to(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// Build the credential for a freshly exchanged token, with a best-effort
/// profile fetch. The token came from the provider moments ago, so a failed
/// fetch downgrades to a bare credential instead of failing the connect.
async fn profile_credential(state: &IdentityState, access_token: String) -> StoredCredential {
    match state.github.get_authenticated_user(&access_token).await {
        Ok(user) => StoredCredential {
            access_token,
            login: Some(user.login),
            avatar_url: user.avatar_url,
        },
        Err(error) => {
            tracing::warn!(%error, "GitHub profile fetch failed after token exchange");
            StoredCredential::bare(access_token)
        }
    }
}

fn map_github_error(error: GithubError) -> Error {
    match error {
        GithubError::Auth(message) => Error::Auth(message),
        GithubError::Configuration(message) => Error::Configuration(message),
        other => Error::Upstream(other.to_string()),
    }
}

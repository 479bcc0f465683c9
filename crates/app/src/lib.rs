//! Canvasforge application composition root
//!
//! Composes all domain routers over one shared set of external services.

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::Router;
use canvasforge_assistant::{AssistantConfig, AssistantServiceFactory};
use canvasforge_common::Config;
use canvasforge_github::GithubApi;
use canvasforge_identity::IdentityState;
use canvasforge_projects::ProjectsState;
use canvasforge_session::SessionStore;
use canvasforge_threads::ThreadsState;
use canvasforge_vercel::VercelApi;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Request bodies are prompts and publish settings; nothing close to this.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Create the main application router with all routes and middleware
pub fn create_app(config: Config) -> Result<Router, anyhow::Error> {
    // Conversation store backend is selected at runtime via configuration
    let assistant = AssistantServiceFactory::create(AssistantConfig {
        provider: config.assistant_provider.clone(),
        api_key: config.assistant_api_key.clone(),
        base_url: config.assistant_base_url.clone(),
    })?;

    let (github, vercel) = sink_clients(&config);

    // One session store shared by every domain: identity writes credentials,
    // the publish handlers read them and take the per-sink guards.
    let sessions = SessionStore::new();
    let config = Arc::new(config);

    let identity_state = IdentityState {
        sessions: sessions.clone(),
        github: github.clone(),
        config: config.clone(),
    };

    let threads_state = ThreadsState {
        assistant: assistant.clone(),
    };

    let projects_state = ProjectsState {
        assistant,
        sessions,
        github,
        vercel,
    };

    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { "Canvasforge API v0.0.1-SNAPSHOT" }),
        )
        .merge(canvasforge_identity::routes().with_state(identity_state))
        .merge(canvasforge_threads::routes().with_state(threads_state))
        .merge(canvasforge_projects::routes().with_state(projects_state));

    Ok(app)
}

#[cfg(not(feature = "mock-sinks"))]
fn sink_clients(config: &Config) -> (Arc<dyn GithubApi>, Arc<dyn VercelApi>) {
    use canvasforge_github::http::HttpGithubClient;
    use canvasforge_github::GithubConfig;
    use canvasforge_vercel::http::HttpVercelClient;
    use canvasforge_vercel::VercelConfig;

    let github = HttpGithubClient::new(GithubConfig {
        api_base: config.github_api_base.clone(),
        oauth_base: config.github_oauth_base.clone(),
        client_id: config.github_client_id.clone(),
        client_secret: config.github_client_secret.clone(),
    });
    let vercel = HttpVercelClient::new(VercelConfig {
        api_base: config.vercel_api_base.clone(),
    });

    (Arc::new(github), Arc::new(vercel))
}

#[cfg(feature = "mock-sinks")]
fn sink_clients(_config: &Config) -> (Arc<dyn GithubApi>, Arc<dyn VercelApi>) {
    use canvasforge_github::mock::MockGithubApi;
    use canvasforge_vercel::mock::MockVercelApi;

    tracing::warn!("Sink mocks enabled: GitHub pushes and Vercel deployments are simulated");

    (Arc::new(MockGithubApi::new()), Arc::new(MockVercelApi::new()))
}

/// CORS layer for deployed environments: explicit comma-separated allowlist
pub fn build_cors_layer(origins: &str) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn body_limit_layer() -> DefaultBodyLimit {
    DefaultBodyLimit::max(MAX_BODY_BYTES)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

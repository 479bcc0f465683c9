//! Common test utilities and fixtures for integration tests
//!
//! Every test runs against an in-process router composed the same way the
//! deployed app is, with all three external services replaced by their
//! programmable mocks. The mock handles stay on `TestApp` so tests can seed
//! threads, script provider failures, and inspect recorded calls.

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use canvasforge_assistant::mock::{artifact_message, MockAssistantService};
use canvasforge_assistant::ThreadMessage;
use canvasforge_common::Config;
use canvasforge_github::mock::MockGithubApi;
use canvasforge_identity::IdentityState;
use canvasforge_projects::ProjectsState;
use canvasforge_session::{SessionStore, VISITOR_HEADER};
use canvasforge_threads::ThreadsState;
use canvasforge_vercel::mock::MockVercelApi;

/// In-process application with handles to every mock
pub struct TestApp {
    pub assistant: Arc<MockAssistantService>,
    pub github: MockGithubApi,
    pub vercel: MockVercelApi,
    pub sessions: SessionStore,
    router: Router,
}

impl TestApp {
    /// Compose the full router over fresh mocks
    pub fn new() -> Self {
        let assistant = Arc::new(MockAssistantService::new());
        let github = MockGithubApi::new();
        let vercel = MockVercelApi::new();
        let sessions = SessionStore::new();

        let identity_state = IdentityState {
            sessions: sessions.clone(),
            github: Arc::new(github.clone()),
            config: Arc::new(test_config()),
        };
        let threads_state = ThreadsState {
            assistant: assistant.clone(),
        };
        let projects_state = ProjectsState {
            assistant: assistant.clone(),
            sessions: sessions.clone(),
            github: Arc::new(github.clone()),
            vercel: Arc::new(vercel.clone()),
        };

        let router = Router::new()
            .merge(canvasforge_identity::routes().with_state(identity_state))
            .merge(canvasforge_threads::routes().with_state(threads_state))
            .merge(canvasforge_projects::routes().with_state(projects_state));

        TestApp {
            assistant,
            github,
            vercel,
            sessions,
            router,
        }
    }

    /// Send one request through the router
    pub async fn request(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Mint a visitor session through the API
    pub async fn create_visitor(&self) -> Uuid {
        let response = self
            .request(json_request(Method::POST, "/v1/session", None))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = parse_body(response).await;
        body["visitor_id"]
            .as_str()
            .and_then(|id| id.parse().ok())
            .expect("session response carries a visitor id")
    }

    /// Connect GitHub for a visitor with a personal access token
    pub async fn connect_github(&self, visitor_id: Uuid) {
        let response = self
            .request(visitor_request(
                Method::POST,
                "/v1/identity/github/connect",
                visitor_id,
                Some(json!({ "token": "ghp_integration" })),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    /// Cache a Vercel deployment token for a visitor
    pub async fn cache_vercel_token(&self, visitor_id: Uuid) {
        let response = self
            .request(visitor_request(
                Method::PUT,
                "/v1/identity/vercel/token",
                visitor_id,
                Some(json!({ "token": "vc_integration" })),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    /// Preload a thread directly in the mock store; returns its id
    pub fn seed_thread(&self, name: Option<&str>, messages: Vec<ThreadMessage>) -> String {
        self.assistant.seed_thread(name, messages)
    }
}

/// Build a request with an optional JSON body and no visitor header
pub fn json_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Build a request tied to a visitor session
pub fn visitor_request(
    method: Method,
    uri: &str,
    visitor_id: Uuid,
    body: Option<Value>,
) -> Request<Body> {
    let mut request = json_request(method, uri, body);
    request
        .headers_mut()
        .insert(VISITOR_HEADER, visitor_id.to_string().parse().unwrap());
    request
}

/// Parse response body as JSON Value
pub async fn parse_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Raw response bytes, for archive downloads
pub async fn body_bytes(response: Response<Body>) -> Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
}

/// A valid hero artifact turn for canvas fixtures
pub fn hero_turn(message_id: &str) -> ThreadMessage {
    artifact_message(
        message_id,
        "Hero",
        json!({ "title": "Launch faster", "subtitle": "Design on the canvas, ship the code" }),
        "<section class=\"hero\">Launch faster</section>",
    )
}

fn test_config() -> Config {
    Config {
        assistant_provider: "mock".to_string(),
        assistant_api_key: "test-key".to_string(),
        assistant_base_url: "http://localhost:0".to_string(),
        github_client_id: Some("client-id".to_string()),
        github_client_secret: Some("client-secret".to_string()),
        github_api_base: "https://api.github.com".to_string(),
        github_oauth_base: "https://github.com/login/oauth".to_string(),
        vercel_api_base: "https://api.vercel.com".to_string(),
        frontend_base_url: "http://localhost:5173".to_string(),
        log_level: "info".to_string(),
        rust_log: "canvasforge=debug".to_string(),
        port: 3000,
    }
}

//! Composition smoke test
//!
//! Builds the application exactly as the binaries do (mock sinks, mock
//! conversation store) and verifies the infrastructure routes respond.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use canvasforge_common::Config;

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

#[tokio::test]
async fn test_app_composes_and_serves_health() {
    let app = canvasforge_app::create_app(test_config()).unwrap();

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_root_banner_names_the_service() {
    let app = canvasforge_app::create_app(test_config()).unwrap();

    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(std::str::from_utf8(&body).unwrap().contains("Canvasforge API"));
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = canvasforge_app::create_app(test_config()).unwrap();

    let response = app
        .oneshot(Request::get("/v2/nothing").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_assistant_provider_fails_composition() {
    let mut config = test_config();
    config.assistant_provider = "telepathy".to_string();

    assert!(canvasforge_app::create_app(config).is_err());
}

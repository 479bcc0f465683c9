//! Export and publish sink integration tests
//!
//! Each sink runs the full chain through the router: visitor session,
//! canvas reduction, project materialization, then the sink itself against
//! a programmable provider mock.

use std::io::{Cursor, Read};

use axum::http::{header, Method, StatusCode};
use serde_json::json;

use canvasforge_github::mock::MockFailure;
use canvasforge_github::GithubStep;
use canvasforge_vercel::mock::MockVercelFailure;

use crate::common::{body_bytes, hero_turn, json_request, parse_body, visitor_request, TestApp};

/// Read one file out of a zipped export
fn unzip_entry(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    let mut content = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    content
}

fn entry_names(bytes: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    archive.file_names().map(String::from).collect()
}

mod test_export {
    use super::*;

    #[tokio::test]
    async fn test_export_downloads_zip_of_the_project() {
        let app = TestApp::new();
        let visitor_id = app.create_visitor().await;
        let thread_id = app.seed_thread(Some("My Cool App"), vec![hero_turn("m1")]);

        let response = app
            .request(visitor_request(
                Method::POST,
                &format!("/v1/threads/{}/export", thread_id),
                visitor_id,
                None,
            ))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/zip"
        );
        assert_eq!(
            response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"my-cool-app.zip\""
        );

        let bytes = body_bytes(response).await;
        let app_source = unzip_entry(&bytes, "src/App.tsx");
        assert!(app_source.contains("import Hero from \"./components/Hero\";"));

        let component = unzip_entry(&bytes, "src/components/Hero.tsx");
        assert!(component.contains("export const Hero"));

        let package = unzip_entry(&bytes, "package.json");
        assert!(package.contains("\"react\""));
    }

    #[tokio::test]
    async fn test_export_requires_visitor_session() {
        let app = TestApp::new();
        let thread_id = app.seed_thread(Some("My Cool App"), vec![hero_turn("m1")]);

        let response = app
            .request(json_request(
                Method::POST,
                &format!("/v1/threads/{}/export", thread_id),
                None,
            ))
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_body(response).await;
        assert_eq!(body["error"]["code"], "MISSING_VISITOR");
    }

    #[tokio::test]
    async fn test_export_unnamed_thread_uses_default_slug() {
        let app = TestApp::new();
        let visitor_id = app.create_visitor().await;
        let thread_id = app.seed_thread(None, vec![hero_turn("m1")]);

        let response = app
            .request(visitor_request(
                Method::POST,
                &format!("/v1/threads/{}/export", thread_id),
                visitor_id,
                None,
            ))
            .await;

        assert_eq!(
            response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"canvasforge-project.zip\""
        );
    }

    #[tokio::test]
    async fn test_export_of_empty_canvas_ships_scaffold_only() {
        let app = TestApp::new();
        let visitor_id = app.create_visitor().await;
        let thread_id = app.seed_thread(Some("Empty"), vec![]);

        let response = app
            .request(visitor_request(
                Method::POST,
                &format!("/v1/threads/{}/export", thread_id),
                visitor_id,
                None,
            ))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = body_bytes(response).await;
        assert_eq!(
            entry_names(&bytes),
            vec![
                "src/App.tsx",
                "src/components/ui/wrappers.tsx",
                "package.json",
                "tailwind.config.js",
            ]
        );
    }

    #[tokio::test]
    async fn test_export_of_missing_thread_returns_404() {
        let app = TestApp::new();
        let visitor_id = app.create_visitor().await;

        let response = app
            .request(visitor_request(
                Method::POST,
                "/v1/threads/thread_999/export",
                visitor_id,
                None,
            ))
            .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

mod test_publish_github {
    use super::*;

    #[tokio::test]
    async fn test_publish_pushes_the_project_in_one_commit() {
        let app = TestApp::new();
        let visitor_id = app.create_visitor().await;
        app.connect_github(visitor_id).await;
        let thread_id = app.seed_thread(Some("My Cool App"), vec![hero_turn("m1")]);

        let response = app
            .request(visitor_request(
                Method::POST,
                &format!("/v1/threads/{}/publish/github", thread_id),
                visitor_id,
                Some(json!({
                    "repo_name": "my-cool-app",
                    "description": "Built on the canvas",
                    "private": true,
                })),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_body(response).await;
        assert_eq!(body["repo_url"], "https://github.com/mock-octocat/my-cool-app");
        assert_eq!(body["commit_sha"], "sha-commit");

        // The PAT connect verified the token with a profile fetch first
        assert_eq!(
            app.github.calls(),
            vec![
                GithubStep::GetUser,
                GithubStep::CreateRepository,
                GithubStep::GetBranchRef,
                GithubStep::CreateTree,
                GithubStep::CreateCommit,
                GithubStep::UpdateBranchRef,
            ]
        );

        let repo = app.github.last_repo_request().unwrap();
        assert_eq!(repo.name, "my-cool-app");
        assert_eq!(repo.description.as_deref(), Some("Built on the canvas"));
        assert!(repo.private);

        let paths: Vec<String> = app
            .github
            .last_tree()
            .iter()
            .map(|e| e.path.clone())
            .collect();
        assert!(paths.contains(&"src/App.tsx".to_string()));
        assert!(paths.contains(&"src/components/Hero.tsx".to_string()));

        assert_eq!(
            app.github.last_commit_message().as_deref(),
            Some("\u{1f680} Published with Canvasforge")
        );
    }

    #[tokio::test]
    async fn test_publish_requires_github_connection() {
        let app = TestApp::new();
        let visitor_id = app.create_visitor().await;
        let thread_id = app.seed_thread(Some("My Cool App"), vec![hero_turn("m1")]);

        let response = app
            .request(visitor_request(
                Method::POST,
                &format!("/v1/threads/{}/publish/github", thread_id),
                visitor_id,
                Some(json!({ "repo_name": "my-cool-app" })),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = parse_body(response).await;
        assert_eq!(body["error"]["code"], "AUTH_ERROR");
        assert!(app.github.calls().is_empty());
    }

    #[tokio::test]
    async fn test_publish_rejects_invalid_repo_name() {
        let app = TestApp::new();
        let visitor_id = app.create_visitor().await;
        app.connect_github(visitor_id).await;
        let thread_id = app.seed_thread(Some("My Cool App"), vec![hero_turn("m1")]);

        let response = app
            .request(visitor_request(
                Method::POST,
                &format!("/v1/threads/{}/publish/github", thread_id),
                visitor_id,
                Some(json!({ "repo_name": "bad name!" })),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_name_collision_surfaces_as_publish_rejection() {
        let app = TestApp::new();
        let visitor_id = app.create_visitor().await;
        app.connect_github(visitor_id).await;
        app.github.behavior().set_failure(
            GithubStep::CreateRepository,
            MockFailure::Rejected("name already exists on this account".to_string()),
        );
        let thread_id = app.seed_thread(Some("My Cool App"), vec![hero_turn("m1")]);

        let response = app
            .request(visitor_request(
                Method::POST,
                &format!("/v1/threads/{}/publish/github", thread_id),
                visitor_id,
                Some(json!({ "repo_name": "my-cool-app" })),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = parse_body(response).await;
        assert_eq!(body["error"]["code"], "PUBLISH_REJECTED");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("name already exists"));
    }
}

mod test_publish_vercel {
    use super::*;

    #[tokio::test]
    async fn test_deploy_uses_thread_slug_by_default() {
        let app = TestApp::new();
        let visitor_id = app.create_visitor().await;
        app.cache_vercel_token(visitor_id).await;
        let thread_id = app.seed_thread(Some("My Cool App"), vec![hero_turn("m1")]);

        let response = app
            .request(visitor_request(
                Method::POST,
                &format!("/v1/threads/{}/publish/vercel", thread_id),
                visitor_id,
                Some(json!({})),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_body(response).await;
        assert_eq!(body["deployment_url"], "https://my-cool-app-mock.vercel.app");

        let request = app.vercel.last_request().unwrap();
        assert_eq!(request.name, "my-cool-app");
        assert_eq!(request.target, "production");
        assert_eq!(request.project_settings.framework, "vite");
        let files: Vec<&str> = request.files.iter().map(|f| f.file.as_str()).collect();
        assert!(files.contains(&"package.json"));
        assert!(files.contains(&"src/components/Hero.tsx"));
    }

    #[tokio::test]
    async fn test_deploy_honors_explicit_project_name() {
        let app = TestApp::new();
        let visitor_id = app.create_visitor().await;
        app.cache_vercel_token(visitor_id).await;
        let thread_id = app.seed_thread(Some("My Cool App"), vec![hero_turn("m1")]);

        let response = app
            .request(visitor_request(
                Method::POST,
                &format!("/v1/threads/{}/publish/vercel", thread_id),
                visitor_id,
                Some(json!({ "name": "launch-candidate" })),
            ))
            .await;

        let body = parse_body(response).await;
        assert_eq!(
            body["deployment_url"],
            "https://launch-candidate-mock.vercel.app"
        );
    }

    #[tokio::test]
    async fn test_deploy_requires_cached_token() {
        let app = TestApp::new();
        let visitor_id = app.create_visitor().await;
        let thread_id = app.seed_thread(Some("My Cool App"), vec![hero_turn("m1")]);

        let response = app
            .request(visitor_request(
                Method::POST,
                &format!("/v1/threads/{}/publish/vercel", thread_id),
                visitor_id,
                Some(json!({})),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(app.vercel.last_request().is_none());
    }

    #[tokio::test]
    async fn test_rejected_deployment_keeps_the_token() {
        let app = TestApp::new();
        let visitor_id = app.create_visitor().await;
        app.cache_vercel_token(visitor_id).await;
        app.vercel
            .behavior()
            .set_failure(MockVercelFailure::Rejected("Name is too long".to_string()));
        let thread_id = app.seed_thread(Some("My Cool App"), vec![hero_turn("m1")]);

        let response = app
            .request(visitor_request(
                Method::POST,
                &format!("/v1/threads/{}/publish/vercel", thread_id),
                visitor_id,
                Some(json!({})),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(app.sessions.vercel_token(visitor_id).is_some());
    }
}

//! Cross-domain invariant tests
//!
//! Guarantees that span more than one domain: per-sink single-flight
//! guards, forced disconnect when a provider refuses a stored credential,
//! and the full prompt-to-publish journey.

use axum::http::{Method, StatusCode};
use serde_json::json;

use canvasforge_assistant::mock::ScriptedReply;
use canvasforge_assistant::ComponentInvocation;
use canvasforge_github::mock::MockFailure;
use canvasforge_github::GithubStep;
use canvasforge_session::Sink;
use canvasforge_vercel::mock::MockVercelFailure;

use crate::common::{body_bytes, hero_turn, json_request, parse_body, visitor_request, TestApp};

mod test_single_flight {
    use super::*;

    #[tokio::test]
    async fn test_second_export_while_busy_returns_409() {
        let app = TestApp::new();
        let visitor_id = app.create_visitor().await;
        let thread_id = app.seed_thread(Some("Busy"), vec![hero_turn("m1")]);

        let guard = app.sessions.try_acquire(visitor_id, Sink::Export).unwrap();

        let response = app
            .request(visitor_request(
                Method::POST,
                &format!("/v1/threads/{}/export", thread_id),
                visitor_id,
                None,
            ))
            .await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = parse_body(response).await;
        assert_eq!(body["error"]["code"], "SINK_BUSY");
        assert_eq!(body["error"]["message"], "Export already in progress");

        drop(guard);

        let response = app
            .request(visitor_request(
                Method::POST,
                &format!("/v1/threads/{}/export", thread_id),
                visitor_id,
                None,
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_sinks_do_not_block_each_other() {
        let app = TestApp::new();
        let visitor_id = app.create_visitor().await;
        app.cache_vercel_token(visitor_id).await;
        let thread_id = app.seed_thread(Some("Parallel"), vec![hero_turn("m1")]);

        let _export_guard = app.sessions.try_acquire(visitor_id, Sink::Export).unwrap();

        let response = app
            .request(visitor_request(
                Method::POST,
                &format!("/v1/threads/{}/publish/vercel", thread_id),
                visitor_id,
                Some(json!({})),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_guards_are_per_visitor() {
        let app = TestApp::new();
        let busy_visitor = app.create_visitor().await;
        let other_visitor = app.create_visitor().await;
        let thread_id = app.seed_thread(Some("Shared"), vec![hero_turn("m1")]);

        let _guard = app.sessions.try_acquire(busy_visitor, Sink::Export).unwrap();

        let response = app
            .request(visitor_request(
                Method::POST,
                &format!("/v1/threads/{}/export", thread_id),
                other_visitor,
                None,
            ))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_guard_is_released_after_a_failed_publish() {
        let app = TestApp::new();
        let visitor_id = app.create_visitor().await;
        app.connect_github(visitor_id).await;
        let thread_id = app.seed_thread(Some("Retry"), vec![hero_turn("m1")]);

        app.github.behavior().set_failure(
            GithubStep::CreateTree,
            MockFailure::Rejected("tree too large".to_string()),
        );
        let response = app
            .request(visitor_request(
                Method::POST,
                &format!("/v1/threads/{}/publish/github", thread_id),
                visitor_id,
                Some(json!({ "repo_name": "retry-app" })),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        // The failed attempt must not leave the sink locked
        app.github.behavior().reset();
        let response = app
            .request(visitor_request(
                Method::POST,
                &format!("/v1/threads/{}/publish/github", thread_id),
                visitor_id,
                Some(json!({ "repo_name": "retry-app" })),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

mod test_forced_disconnect {
    use super::*;

    #[tokio::test]
    async fn test_provider_401_mid_publish_disconnects_github() {
        let app = TestApp::new();
        let visitor_id = app.create_visitor().await;
        app.connect_github(visitor_id).await;
        app.github
            .behavior()
            .set_failure(GithubStep::CreateCommit, MockFailure::Unauthorized);
        let thread_id = app.seed_thread(Some("Revoked"), vec![hero_turn("m1")]);

        let response = app
            .request(visitor_request(
                Method::POST,
                &format!("/v1/threads/{}/publish/github", thread_id),
                visitor_id,
                Some(json!({ "repo_name": "revoked-app" })),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        // The sequence stopped at the refused step
        assert!(!app.github.calls().contains(&GithubStep::UpdateBranchRef));

        let response = app
            .request(visitor_request(Method::GET, "/v1/identity", visitor_id, None))
            .await;
        let body = parse_body(response).await;
        assert_eq!(body["github"]["connected"], false);
    }

    #[tokio::test]
    async fn test_remote_rejection_keeps_the_connection() {
        let app = TestApp::new();
        let visitor_id = app.create_visitor().await;
        app.connect_github(visitor_id).await;
        app.github.behavior().set_failure(
            GithubStep::CreateTree,
            MockFailure::Rejected("tree too large".to_string()),
        );
        let thread_id = app.seed_thread(Some("Rejected"), vec![hero_turn("m1")]);

        let response = app
            .request(visitor_request(
                Method::POST,
                &format!("/v1/threads/{}/publish/github", thread_id),
                visitor_id,
                Some(json!({ "repo_name": "rejected-app" })),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(!app.github.calls().contains(&GithubStep::UpdateBranchRef));

        let response = app
            .request(visitor_request(Method::GET, "/v1/identity", visitor_id, None))
            .await;
        let body = parse_body(response).await;
        assert_eq!(body["github"]["connected"], true);
    }

    #[tokio::test]
    async fn test_vercel_401_clears_the_cached_token() {
        let app = TestApp::new();
        let visitor_id = app.create_visitor().await;
        app.cache_vercel_token(visitor_id).await;
        app.vercel
            .behavior()
            .set_failure(MockVercelFailure::Unauthorized);
        let thread_id = app.seed_thread(Some("Expired"), vec![hero_turn("m1")]);

        let response = app
            .request(visitor_request(
                Method::POST,
                &format!("/v1/threads/{}/publish/vercel", thread_id),
                visitor_id,
                Some(json!({})),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .request(visitor_request(Method::GET, "/v1/identity", visitor_id, None))
            .await;
        let body = parse_body(response).await;
        assert_eq!(body["vercel"]["connected"], false);
    }
}

mod test_full_journey {
    use super::*;
    use std::io::{Cursor, Read};

    #[tokio::test]
    async fn test_prompt_to_published_repository() {
        let app = TestApp::new();
        let visitor_id = app.create_visitor().await;

        // Start a conversation
        let response = app
            .request(json_request(Method::POST, "/v1/threads", None))
            .await;
        let thread_id = parse_body(response).await["id"].as_str().unwrap().to_string();

        // The assistant answers the prompt with a hero component
        app.assistant.behavior().script_reply(ScriptedReply {
            text: "Here is your hero section".to_string(),
            component: Some(ComponentInvocation {
                name: "Hero".to_string(),
                props: json!({ "title": "Launch faster" }),
            }),
            rendered_html: Some("<section>Launch faster</section>".to_string()),
        });
        let response = app
            .request(json_request(
                Method::POST,
                &format!("/v1/threads/{}/messages", thread_id),
                Some(json!({ "text": "Build a hero section" })),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        // The component landed on the canvas
        let response = app
            .request(json_request(
                Method::GET,
                &format!("/v1/threads/{}/canvas", thread_id),
                None,
            ))
            .await;
        let canvas = parse_body(response).await;
        assert_eq!(canvas["items"][0]["kind"], "Hero");

        // The export carries its generated source
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
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        let mut component = String::new();
        archive
            .by_name("src/components/Hero.tsx")
            .unwrap()
            .read_to_string(&mut component)
            .unwrap();
        assert!(component.contains("title=\"Launch faster\""));

        // Connect GitHub and publish the same project
        app.connect_github(visitor_id).await;
        let response = app
            .request(visitor_request(
                Method::POST,
                &format!("/v1/threads/{}/publish/github", thread_id),
                visitor_id,
                Some(json!({ "repo_name": "launch-page" })),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_body(response).await;
        assert_eq!(body["repo_url"], "https://github.com/mock-octocat/launch-page");
    }
}

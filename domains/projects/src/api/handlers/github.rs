//! GitHub publish API handler

use std::sync::LazyLock;

use axum::{
    extract::{Path, State},
    Json,
};
use canvasforge_canvas::reduce;
use canvasforge_common::{Error, Result, ValidatedJson};
use canvasforge_github::push::{push_file_tree, PushRequest};
use canvasforge_session::{Sink, Visitor};
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::ProjectsState;
use crate::domain::materializer::materialize;

/// GitHub repository name charset (compiled once)
static REPO_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("repository name regex is valid"));

/// Commit message for published projects
const COMMIT_MESSAGE: &str = "🚀 Published with Canvasforge";

/// Request for publishing a project to GitHub
#[derive(Debug, Deserialize, Validate)]
pub struct PublishGithubRequest {
    #[validate(
        length(min = 1, max = 100),
        regex(
            path = *REPO_NAME_REGEX,
            message = "repository name may only contain letters, digits, '.', '_' and '-'"
        )
    )]
    pub repo_name: String,

    #[validate(length(max = 350))]
    pub description: Option<String>,

    #[serde(default)]
    pub private: bool,
}

/// Response for a successful GitHub publish
#[derive(Debug, Serialize)]
pub struct PublishGithubResponse {
    pub repo_url: String,
    pub commit_sha: String,
}

/// Publish a thread's materialized project as a new GitHub repository
pub async fn publish_github(
    Visitor { visitor_id }: Visitor,
    State(state): State<ProjectsState>,
    Path(thread_id): Path<String>,
    ValidatedJson(req): ValidatedJson<PublishGithubRequest>,
) -> Result<Json<PublishGithubResponse>> {
    let credential = state
        .sessions
        .github_credential(visitor_id)
        .ok_or_else(|| Error::Auth("GitHub is not connected".to_string()))?;

    let _guard = state
        .sessions
        .try_acquire(visitor_id, Sink::GithubPublish)
        .ok_or(Error::SinkBusy(Sink::GithubPublish.label()))?;

    let thread = state.assistant.fetch_thread(&thread_id).await?;
    let files = materialize(&reduce(&thread.messages))?;

    let push = PushRequest {
        repo_name: req.repo_name,
        description: req.description,
        private: req.private,
        commit_message: COMMIT_MESSAGE.to_string(),
    };

    match push_file_tree(
        state.github.as_ref(),
        &credential.access_token,
        &push,
        &files,
    )
    .await
    {
        Ok(outcome) => {
            tracing::info!(
                thread_id = %thread_id,
                repo_url = %outcome.repo_url,
                "Published project to GitHub"
            );
            Ok(Json(PublishGithubResponse {
                repo_url: outcome.repo_url,
                commit_sha: outcome.commit_sha,
            }))
        }
        Err(error) if error.is_auth() => {
            // The provider refused the stored token. Sever the connection so
            // the identity view stops claiming it works.
            tracing::warn!(
                visitor_id = %visitor_id,
                "GitHub rejected the stored credential; disconnecting"
            );
            state.sessions.disconnect_github(visitor_id);
            Err(error.into())
        }
        Err(error) => Err(error.into()),
    }
}

//! Vercel publish API handler

use axum::{
    extract::{Path, State},
    Json,
};
use canvasforge_canvas::reduce;
use canvasforge_common::{project_slug, Error, Result, ValidatedJson, DEFAULT_PROJECT_SLUG};
use canvasforge_session::{Sink, Visitor};
use canvasforge_vercel::DeploymentRequest;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::ProjectsState;
use crate::domain::materializer::materialize;

/// Request for deploying a project to Vercel. The name defaults to the
/// thread's slug when omitted.
#[derive(Debug, Deserialize, Validate)]
pub struct PublishVercelRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
}

/// Response for a successful Vercel deployment
#[derive(Debug, Serialize)]
pub struct PublishVercelResponse {
    pub deployment_url: String,
}

/// Deploy a thread's materialized project to Vercel
pub async fn publish_vercel(
    Visitor { visitor_id }: Visitor,
    State(state): State<ProjectsState>,
    Path(thread_id): Path<String>,
    ValidatedJson(req): ValidatedJson<PublishVercelRequest>,
) -> Result<Json<PublishVercelResponse>> {
    let token = state.sessions.vercel_token(visitor_id).ok_or_else(|| {
        Error::Validation("No Vercel token is cached for this session".to_string())
    })?;

    let _guard = state
        .sessions
        .try_acquire(visitor_id, Sink::VercelPublish)
        .ok_or(Error::SinkBusy(Sink::VercelPublish.label()))?;

    let thread = state.assistant.fetch_thread(&thread_id).await?;
    let files = materialize(&reduce(&thread.messages))?;

    let name = match req.name {
        Some(name) => name,
        None => thread
            .name
            .as_deref()
            .map(project_slug)
            .unwrap_or_else(|| DEFAULT_PROJECT_SLUG.to_string()),
    };

    let deployment = DeploymentRequest::production(&name, &files);
    match state.vercel.create_deployment(&token, &deployment).await {
        Ok(outcome) => {
            tracing::info!(
                thread_id = %thread_id,
                url = %outcome.url,
                "Deployed project to Vercel"
            );
            Ok(Json(PublishVercelResponse {
                deployment_url: outcome.url,
            }))
        }
        Err(error) if error.is_auth() => {
            // Token refused: drop it so the identity view stops offering it
            tracing::warn!(
                visitor_id = %visitor_id,
                "Vercel rejected the cached token; clearing it"
            );
            state.sessions.clear_vercel_token(visitor_id);
            Err(error.into())
        }
        Err(error) => Err(error.into()),
    }
}

//! Canvasforge Vercel Service
//!
//! Vercel is the hosted-deployment publish sink. Unlike the GitHub sink
//! there is no multi-step sequence: one request carries the project name,
//! every file inline, and the build settings, and Vercel builds and hosts
//! the result.

pub mod http;
pub mod mock;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VercelError {
    #[error("Vercel request error: {0}")]
    Request(String),

    #[error("Vercel authorization failed: {0}")]
    Auth(String),

    #[error("Vercel rejected the deployment: {0}")]
    Rejected(String),
}

impl VercelError {
    /// True when the provider refused the token itself
    pub fn is_auth(&self) -> bool {
        matches!(self, VercelError::Auth(_))
    }
}

/// Publish-context conversion: deployment rejections carry the provider's
/// message verbatim so the user can correct and resubmit.
impl From<VercelError> for canvasforge_common::Error {
    fn from(error: VercelError) -> Self {
        match error {
            VercelError::Auth(message) => canvasforge_common::Error::Auth(message),
            VercelError::Rejected(message) => canvasforge_common::Error::Publish(message),
            VercelError::Request(message) => canvasforge_common::Error::Upstream(message),
        }
    }
}

/// One inline file of a deployment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeploymentFile {
    pub file: String,
    pub data: String,
}

impl DeploymentFile {
    /// Deployment paths are project-relative; leading slashes are stripped
    pub fn new(path: &str, content: &str) -> Self {
        Self {
            file: path.trim_start_matches('/').to_string(),
            data: content.to_string(),
        }
    }
}

/// Build settings sent with every deployment. Generated projects are Vite
/// apps, so the framework and output directory are fixed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    pub framework: String,
    pub build_command: String,
    pub output_directory: String,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            framework: "vite".to_string(),
            build_command: "npm run build".to_string(),
            output_directory: "dist".to_string(),
        }
    }
}

/// A complete single-request deployment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRequest {
    pub name: String,
    pub files: Vec<DeploymentFile>,
    pub project_settings: ProjectSettings,
    pub target: String,
}

impl DeploymentRequest {
    /// A production deployment of a materialized file tree
    pub fn production(name: &str, files: &IndexMap<String, String>) -> Self {
        Self {
            name: name.to_string(),
            files: files
                .iter()
                .map(|(path, content)| DeploymentFile::new(path, content))
                .collect(),
            project_settings: ProjectSettings::default(),
            target: "production".to_string(),
        }
    }
}

/// Result of a successful deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentOutcome {
    /// Fully-qualified https URL of the deployment
    pub url: String,
}

/// Vercel client configuration
#[derive(Debug, Clone)]
pub struct VercelConfig {
    pub api_base: String,
}

/// Vercel operations used by the publish pipeline
#[async_trait::async_trait]
pub trait VercelApi: Send + Sync {
    async fn create_deployment(
        &self,
        token: &str,
        request: &DeploymentRequest,
    ) -> Result<DeploymentOutcome, VercelError>;
}

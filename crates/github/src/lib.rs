//! Canvasforge GitHub Service
//!
//! GitHub is one of the two publish sinks: a materialized project is pushed
//! into a freshly created repository as a single commit. This crate provides:
//! - the raw Git data API operations behind the `GithubApi` trait
//! - the OAuth code exchange (the one call that needs the server-held secret)
//! - the atomic publish sequence (`push::push_file_tree`)
//! - a programmable mock with a recorded call log for testing

pub mod http;
pub mod mock;
pub mod push;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GithubError {
    #[error("GitHub configuration error: {0}")]
    Configuration(String),

    #[error("GitHub request error: {0}")]
    Request(String),

    #[error("GitHub authorization failed: {0}")]
    Auth(String),

    #[error("GitHub rejected {step}: {message}")]
    Remote { step: String, message: String },
}

impl GithubError {
    /// True when the provider refused the credential itself, which forces a
    /// disconnect of the stored connection.
    pub fn is_auth(&self) -> bool {
        matches!(self, GithubError::Auth(_))
    }
}

/// Publish-context conversion: remote rejections (name collisions, rate
/// limits) are user-correctable publish failures, not server faults.
impl From<GithubError> for canvasforge_common::Error {
    fn from(error: GithubError) -> Self {
        match error {
            GithubError::Auth(message) => canvasforge_common::Error::Auth(message),
            GithubError::Configuration(message) => {
                canvasforge_common::Error::Configuration(message)
            }
            GithubError::Remote { step, message } => canvasforge_common::Error::Publish(format!(
                "GitHub rejected {}: {}",
                step, message
            )),
            GithubError::Request(message) => canvasforge_common::Error::Upstream(message),
        }
    }
}

/// Publish steps, in execution order. Used for call recording and for
/// naming the failing step in errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GithubStep {
    ExchangeCode,
    GetUser,
    CreateRepository,
    GetBranchRef,
    CreateTree,
    CreateCommit,
    UpdateBranchRef,
}

impl GithubStep {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ExchangeCode => "exchange code",
            Self::GetUser => "fetch profile",
            Self::CreateRepository => "create repository",
            Self::GetBranchRef => "read branch ref",
            Self::CreateTree => "create tree",
            Self::CreateCommit => "create commit",
            Self::UpdateBranchRef => "update branch ref",
        }
    }
}

/// Token returned by the OAuth code exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: Option<String>,
    pub scope: Option<String>,
}

/// Authenticated user profile (subset Canvasforge displays)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubUser {
    pub login: String,
    pub avatar_url: Option<String>,
    pub name: Option<String>,
}

/// Repository creation parameters. The client always requests
/// auto-initialization so the default branch exists before the push.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRepositoryRequest {
    pub name: String,
    pub description: Option<String>,
    pub private: bool,
}

/// Created repository (subset the publish sequence needs)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    pub default_branch: String,
    pub owner: RepositoryOwner,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryOwner {
    pub login: String,
}

/// One file in a Git tree creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    pub mode: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub content: String,
}

impl TreeEntry {
    /// A regular file blob with inline content. Leading slashes are
    /// stripped: Git tree paths are repository-relative.
    pub fn file(path: &str, content: &str) -> Self {
        Self {
            path: path.trim_start_matches('/').to_string(),
            mode: "100644".to_string(),
            entry_type: "blob".to_string(),
            content: content.to_string(),
        }
    }
}

/// GitHub client configuration
#[derive(Clone)]
pub struct GithubConfig {
    pub api_base: String,
    pub oauth_base: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl std::fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubConfig")
            .field("api_base", &self.api_base)
            .field("oauth_base", &self.oauth_base)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

/// Raw GitHub operations. Every call takes the visitor's bearer token;
/// nothing here caches credentials.
#[async_trait::async_trait]
pub trait GithubApi: Send + Sync {
    /// Swap an OAuth authorization code for an access token using the
    /// server-held client secret.
    async fn exchange_code(&self, code: &str) -> Result<AccessToken, GithubError>;

    async fn get_authenticated_user(&self, token: &str) -> Result<GithubUser, GithubError>;

    async fn create_repository(
        &self,
        token: &str,
        request: &CreateRepositoryRequest,
    ) -> Result<Repository, GithubError>;

    /// Tip commit sha of `heads/{branch}`
    async fn get_branch_ref(
        &self,
        token: &str,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<String, GithubError>;

    /// Create a tree from inline blobs; returns the tree sha
    async fn create_tree(
        &self,
        token: &str,
        owner: &str,
        repo: &str,
        entries: &[TreeEntry],
    ) -> Result<String, GithubError>;

    /// Create a commit with a single parent; returns the commit sha
    async fn create_commit(
        &self,
        token: &str,
        owner: &str,
        repo: &str,
        message: &str,
        tree_sha: &str,
        parent_sha: &str,
    ) -> Result<String, GithubError>;

    /// Fast-forward `heads/{branch}` to the given commit
    async fn update_branch_ref(
        &self,
        token: &str,
        owner: &str,
        repo: &str,
        branch: &str,
        commit_sha: &str,
    ) -> Result<(), GithubError>;
}

//! Mock GitHub Implementation
//!
//! Programmable mock for testing the publish sequence and identity flows:
//! - `MockGithubApi`: canned responses plus a recorded call log
//! - `MockGithubBehavior`: injects a failure at a chosen step
//! - `MockFailure`: credential refusal (401) or a remote rejection

use std::sync::{Arc, Mutex, RwLock};

use crate::{
    AccessToken, CreateRepositoryRequest, GithubApi, GithubError, GithubStep, GithubUser,
    Repository, RepositoryOwner, TreeEntry,
};

/// How a programmed step should fail
#[derive(Debug, Clone, PartialEq)]
pub enum MockFailure {
    /// The provider refuses the credential (maps to `GithubError::Auth`)
    Unauthorized,
    /// The provider rejects the operation with a message
    Rejected(String),
}

/// Programmable behavior for the mock GitHub client
#[derive(Debug, Default)]
pub struct MockGithubBehavior {
    pub failure: Arc<RwLock<Option<(GithubStep, MockFailure)>>>,
}

impl MockGithubBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a single step fail; later steps are unreachable past it
    pub fn set_failure(&self, step: GithubStep, failure: MockFailure) {
        *self.failure.write().unwrap() = Some((step, failure));
    }

    /// Reset to all-success behavior
    pub fn reset(&self) {
        *self.failure.write().unwrap() = None;
    }
}

/// Mock GitHub client with canned data and programmable failures
#[derive(Debug, Clone, Default)]
pub struct MockGithubApi {
    behavior: Arc<MockGithubBehavior>,
    calls: Arc<Mutex<Vec<GithubStep>>>,
    last_repo_request: Arc<RwLock<Option<CreateRepositoryRequest>>>,
    last_tree: Arc<RwLock<Vec<TreeEntry>>>,
    last_commit_message: Arc<RwLock<Option<String>>>,
}

impl MockGithubApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for programming behavior from tests
    pub fn behavior(&self) -> Arc<MockGithubBehavior> {
        self.behavior.clone()
    }

    /// Steps invoked so far, in order
    pub fn calls(&self) -> Vec<GithubStep> {
        self.calls.lock().unwrap().clone()
    }

    /// Repository creation request of the last publish
    pub fn last_repo_request(&self) -> Option<CreateRepositoryRequest> {
        self.last_repo_request.read().unwrap().clone()
    }

    /// Tree entries of the last create_tree call
    pub fn last_tree(&self) -> Vec<TreeEntry> {
        self.last_tree.read().unwrap().clone()
    }

    /// Message of the last create_commit call
    pub fn last_commit_message(&self) -> Option<String> {
        self.last_commit_message.read().unwrap().clone()
    }

    /// Record the call and fail it if programmed to
    fn gate(&self, step: GithubStep) -> Result<(), GithubError> {
        self.calls.lock().unwrap().push(step);

        if let Some((failing_step, failure)) = self.behavior.failure.read().unwrap().clone() {
            if failing_step == step {
                return Err(match failure {
                    MockFailure::Unauthorized => {
                        GithubError::Auth("GitHub rejected the access token".to_string())
                    }
                    MockFailure::Rejected(message) => GithubError::Remote {
                        step: step.name().to_string(),
                        message,
                    },
                });
            }
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl GithubApi for MockGithubApi {
    async fn exchange_code(&self, _code: &str) -> Result<AccessToken, GithubError> {
        self.gate(GithubStep::ExchangeCode)?;
        Ok(AccessToken {
            access_token: "gho_mock_token".to_string(),
            token_type: Some("bearer".to_string()),
            scope: Some("repo,user".to_string()),
        })
    }

    async fn get_authenticated_user(&self, _token: &str) -> Result<GithubUser, GithubError> {
        self.gate(GithubStep::GetUser)?;
        Ok(GithubUser {
            login: "mock-octocat".to_string(),
            avatar_url: Some("https://avatars.example.com/mock-octocat".to_string()),
            name: Some("Mock Octocat".to_string()),
        })
    }

    async fn create_repository(
        &self,
        _token: &str,
        request: &CreateRepositoryRequest,
    ) -> Result<Repository, GithubError> {
        self.gate(GithubStep::CreateRepository)?;
        *self.last_repo_request.write().unwrap() = Some(request.clone());

        Ok(Repository {
            name: request.name.clone(),
            full_name: format!("mock-octocat/{}", request.name),
            html_url: format!("https://github.com/mock-octocat/{}", request.name),
            default_branch: "main".to_string(),
            owner: RepositoryOwner {
                login: "mock-octocat".to_string(),
            },
        })
    }

    async fn get_branch_ref(
        &self,
        _token: &str,
        _owner: &str,
        _repo: &str,
        _branch: &str,
    ) -> Result<String, GithubError> {
        self.gate(GithubStep::GetBranchRef)?;
        Ok("sha-base".to_string())
    }

    async fn create_tree(
        &self,
        _token: &str,
        _owner: &str,
        _repo: &str,
        entries: &[TreeEntry],
    ) -> Result<String, GithubError> {
        self.gate(GithubStep::CreateTree)?;
        *self.last_tree.write().unwrap() = entries.to_vec();
        Ok("sha-tree".to_string())
    }

    async fn create_commit(
        &self,
        _token: &str,
        _owner: &str,
        _repo: &str,
        message: &str,
        _tree_sha: &str,
        _parent_sha: &str,
    ) -> Result<String, GithubError> {
        self.gate(GithubStep::CreateCommit)?;
        *self.last_commit_message.write().unwrap() = Some(message.to_string());
        Ok("sha-commit".to_string())
    }

    async fn update_branch_ref(
        &self,
        _token: &str,
        _owner: &str,
        _repo: &str,
        _branch: &str,
        _commit_sha: &str,
    ) -> Result<(), GithubError> {
        self.gate(GithubStep::UpdateBranchRef)?;
        Ok(())
    }
}

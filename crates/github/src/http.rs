//! GitHub REST API implementation
//!
//! Calls api.github.com for repository and Git data operations and the
//! github.com/login/oauth endpoint for the code exchange, using reqwest.

use reqwest::Client;
use serde::Deserialize;

use crate::{
    AccessToken, CreateRepositoryRequest, GithubApi, GithubConfig, GithubError, GithubStep,
    GithubUser, Repository, TreeEntry,
};

/// GitHub requires a User-Agent on every API request
const USER_AGENT: &str = "canvasforge";
const ACCEPT_HEADER: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";

/// Code-exchange response. GitHub answers 200 for both outcomes and signals
/// failure through the `error` field.
#[derive(Debug, Deserialize)]
struct ExchangeWire {
    access_token: Option<String>,
    token_type: Option<String>,
    scope: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RefWire {
    object: RefObjectWire,
}

#[derive(Debug, Deserialize)]
struct RefObjectWire {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct ShaWire {
    sha: String,
}

/// GitHub error body
#[derive(Debug, Deserialize)]
struct ApiErrorWire {
    message: String,
}

/// GitHub REST client
pub struct HttpGithubClient {
    client: Client,
    config: GithubConfig,
}

impl HttpGithubClient {
    pub fn new(config: GithubConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base.trim_end_matches('/'), path)
    }

    fn request(&self, method: reqwest::Method, token: &str, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.api_url(path))
            .bearer_auth(token)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT, ACCEPT_HEADER)
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    /// Turn a non-success response into the step's error. 401 means the
    /// token itself was refused; everything else is a remote rejection
    /// carrying GitHub's own message.
    async fn check(
        step: GithubStep,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GithubError> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(GithubError::Auth(
                "GitHub rejected the access token".to_string(),
            ));
        }

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());

            let message = match serde_json::from_str::<ApiErrorWire>(&error_body) {
                Ok(api_error) => api_error.message,
                Err(_) => format!("{}: {}", status, error_body),
            };

            return Err(GithubError::Remote {
                step: step.name().to_string(),
                message,
            });
        }

        Ok(response)
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        step: GithubStep,
        response: reqwest::Response,
    ) -> Result<T, GithubError> {
        let response = Self::check(step, response).await?;
        response.json().await.map_err(|e| GithubError::Remote {
            step: step.name().to_string(),
            message: format!("Failed to parse response: {}", e),
        })
    }

    fn send_error(e: reqwest::Error) -> GithubError {
        GithubError::Request(format!("HTTP request failed: {}", e))
    }
}

#[async_trait::async_trait]
impl GithubApi for HttpGithubClient {
    async fn exchange_code(&self, code: &str) -> Result<AccessToken, GithubError> {
        let client_id = self.config.client_id.as_ref().ok_or_else(|| {
            GithubError::Configuration("GITHUB_CLIENT_ID is not set".to_string())
        })?;
        let client_secret = self.config.client_secret.as_ref().ok_or_else(|| {
            GithubError::Configuration("GITHUB_CLIENT_SECRET is not set".to_string())
        })?;

        let url = format!(
            "{}/access_token",
            self.config.oauth_base.trim_end_matches('/')
        );

        let response = self
            .client
            .post(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .json(&serde_json::json!({
                "client_id": client_id,
                "client_secret": client_secret,
                "code": code,
            }))
            .send()
            .await
            .map_err(Self::send_error)?;

        let wire: ExchangeWire = Self::parse(GithubStep::ExchangeCode, response).await?;

        if let Some(error) = wire.error {
            return Err(GithubError::Auth(
                wire.error_description.unwrap_or(error),
            ));
        }

        let access_token = wire.access_token.ok_or_else(|| GithubError::Remote {
            step: GithubStep::ExchangeCode.name().to_string(),
            message: "response carried neither a token nor an error".to_string(),
        })?;

        Ok(AccessToken {
            access_token,
            token_type: wire.token_type,
            scope: wire.scope,
        })
    }

    async fn get_authenticated_user(&self, token: &str) -> Result<GithubUser, GithubError> {
        let response = self
            .request(reqwest::Method::GET, token, "/user")
            .send()
            .await
            .map_err(Self::send_error)?;

        Self::parse(GithubStep::GetUser, response).await
    }

    async fn create_repository(
        &self,
        token: &str,
        request: &CreateRepositoryRequest,
    ) -> Result<Repository, GithubError> {
        // auto_init gives the new repository an initial commit, so the
        // default branch ref exists for the publish sequence to build on
        let response = self
            .request(reqwest::Method::POST, token, "/user/repos")
            .json(&serde_json::json!({
                "name": request.name,
                "description": request.description,
                "private": request.private,
                "auto_init": true,
            }))
            .send()
            .await
            .map_err(Self::send_error)?;

        Self::parse(GithubStep::CreateRepository, response).await
    }

    async fn get_branch_ref(
        &self,
        token: &str,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<String, GithubError> {
        let path = format!("/repos/{}/{}/git/refs/heads/{}", owner, repo, branch);
        let response = self
            .request(reqwest::Method::GET, token, &path)
            .send()
            .await
            .map_err(Self::send_error)?;

        let wire: RefWire = Self::parse(GithubStep::GetBranchRef, response).await?;
        Ok(wire.object.sha)
    }

    async fn create_tree(
        &self,
        token: &str,
        owner: &str,
        repo: &str,
        entries: &[TreeEntry],
    ) -> Result<String, GithubError> {
        let path = format!("/repos/{}/{}/git/trees", owner, repo);
        let response = self
            .request(reqwest::Method::POST, token, &path)
            .json(&serde_json::json!({ "tree": entries }))
            .send()
            .await
            .map_err(Self::send_error)?;

        let wire: ShaWire = Self::parse(GithubStep::CreateTree, response).await?;
        Ok(wire.sha)
    }

    async fn create_commit(
        &self,
        token: &str,
        owner: &str,
        repo: &str,
        message: &str,
        tree_sha: &str,
        parent_sha: &str,
    ) -> Result<String, GithubError> {
        let path = format!("/repos/{}/{}/git/commits", owner, repo);
        let response = self
            .request(reqwest::Method::POST, token, &path)
            .json(&serde_json::json!({
                "message": message,
                "tree": tree_sha,
                "parents": [parent_sha],
            }))
            .send()
            .await
            .map_err(Self::send_error)?;

        let wire: ShaWire = Self::parse(GithubStep::CreateCommit, response).await?;
        Ok(wire.sha)
    }

    async fn update_branch_ref(
        &self,
        token: &str,
        owner: &str,
        repo: &str,
        branch: &str,
        commit_sha: &str,
    ) -> Result<(), GithubError> {
        let path = format!("/repos/{}/{}/git/refs/heads/{}", owner, repo, branch);
        let response = self
            .request(reqwest::Method::PATCH, token, &path)
            .json(&serde_json::json!({ "sha": commit_sha }))
            .send()
            .await
            .map_err(Self::send_error)?;

        Self::check(GithubStep::UpdateBranchRef, response).await?;
        Ok(())
    }
}

//! Atomic repository publish
//!
//! Creates a repository and lands the whole file tree as one commit through
//! the Git data API: repository → base ref → tree → commit → ref update.
//! Every step short-circuits on failure, and the branch ref only moves in
//! the final step, so a failed publish never leaves a half-written branch.

use indexmap::IndexMap;

use crate::{CreateRepositoryRequest, GithubApi, GithubError, TreeEntry};

/// Parameters for a repository publish
#[derive(Debug, Clone)]
pub struct PushRequest {
    pub repo_name: String,
    pub description: Option<String>,
    pub private: bool,
    pub commit_message: String,
}

/// Result of a successful publish
#[derive(Debug, Clone)]
pub struct PushOutcome {
    pub repo_url: String,
    pub commit_sha: String,
}

/// Publish a materialized file tree as the first real commit of a new
/// repository. The repository is created auto-initialized, so the default
/// branch already has a tip commit to use as the sole parent.
pub async fn push_file_tree(
    api: &dyn GithubApi,
    token: &str,
    request: &PushRequest,
    files: &IndexMap<String, String>,
) -> Result<PushOutcome, GithubError> {
    let repo = api
        .create_repository(
            token,
            &CreateRepositoryRequest {
                name: request.repo_name.clone(),
                description: request.description.clone(),
                private: request.private,
            },
        )
        .await?;

    let owner = repo.owner.login.as_str();
    let branch = repo.default_branch.as_str();
    tracing::debug!(repo = %repo.full_name, branch = %branch, "Repository created");

    let base_sha = api
        .get_branch_ref(token, owner, &repo.name, branch)
        .await?;

    let entries: Vec<TreeEntry> = files
        .iter()
        .map(|(path, content)| TreeEntry::file(path, content))
        .collect();
    let tree_sha = api.create_tree(token, owner, &repo.name, &entries).await?;

    let commit_sha = api
        .create_commit(
            token,
            owner,
            &repo.name,
            &request.commit_message,
            &tree_sha,
            &base_sha,
        )
        .await?;

    api.update_branch_ref(token, owner, &repo.name, branch, &commit_sha)
        .await?;

    tracing::info!(
        repo = %repo.full_name,
        commit = %commit_sha,
        files = files.len(),
        "Published file tree"
    );

    Ok(PushOutcome {
        repo_url: repo.html_url,
        commit_sha,
    })
}

//! Run context provided by the runner

use super::RunnerEnv;
use crate::error::{Error, Result};
use crate::types::RepoConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default REST API base
const DEFAULT_API_URL: &str = "https://api.github.com";

/// Where and on what this workflow run executes
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Repository coordinates
    pub repo: RepoConfig,
    /// Commit that triggered the run
    pub sha: String,
    /// Ref that triggered the run (e.g. `refs/heads/main`)
    pub git_ref: String,
    /// Checked-out workspace
    pub workspace: PathBuf,
    /// Path to the JSON payload of the triggering event
    pub event_path: Option<PathBuf>,
}

impl RunContext {
    /// Read the context from runner variables
    ///
    /// `GITHUB_REPOSITORY` and `GITHUB_SHA` are required. The workspace
    /// defaults to the current directory.
    pub fn from_env(env: &RunnerEnv) -> Result<Self> {
        let repository = env
            .var("GITHUB_REPOSITORY")
            .ok_or_else(|| Error::Config("GITHUB_REPOSITORY is not set".to_string()))?;
        let (owner, repo) = repository
            .split_once('/')
            .filter(|(o, r)| !o.is_empty() && !r.is_empty())
            .ok_or_else(|| {
                Error::Config(format!(
                    "GITHUB_REPOSITORY must be `owner/repo`, got `{repository}`"
                ))
            })?;

        let sha = env
            .var("GITHUB_SHA")
            .ok_or_else(|| Error::Config("GITHUB_SHA is not set".to_string()))?
            .to_string();

        let workspace = match env.path("GITHUB_WORKSPACE") {
            Some(p) => p,
            None => std::env::current_dir()?,
        };

        Ok(Self {
            repo: RepoConfig {
                owner: owner.to_string(),
                repo: repo.to_string(),
                api_url: env
                    .var("GITHUB_API_URL")
                    .unwrap_or(DEFAULT_API_URL)
                    .trim_end_matches('/')
                    .to_string(),
            },
            sha,
            git_ref: env.var("GITHUB_REF").unwrap_or_default().to_string(),
            workspace,
            event_path: env.path("GITHUB_EVENT_PATH"),
        })
    }

    /// Default changelog location inside the workspace
    pub fn default_changelog(&self) -> PathBuf {
        self.workspace.join("CHANGELOG.md")
    }
}

#[derive(Deserialize)]
struct EventPayload {
    pull_request: Option<EventPullRequest>,
}

#[derive(Deserialize)]
struct EventPullRequest {
    number: u64,
}

/// Pull request number from a `pull_request` event payload
pub fn pull_request_number(event_path: &Path) -> Result<u64> {
    let content = fs::read_to_string(event_path).map_err(|e| {
        Error::Config(format!(
            "failed to read event payload {}: {e}",
            event_path.display()
        ))
    })?;
    let payload: EventPayload = serde_json::from_str(&content)?;
    payload
        .pull_request
        .map(|pr| pr.number)
        .ok_or_else(|| Error::Config("event payload has no pull_request".to_string()))
}

//! Authentication for the GitHub API
//!
//! Supports environment variables (`GITHUB_TOKEN`, `GH_TOKEN`) and the `gh` CLI.

use crate::actions::RunnerEnv;
use crate::error::{Error, Result};
use tokio::process::Command;
use tracing::debug;

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from CLI tool (gh)
    Cli,
    /// Token from environment variable
    EnvVar,
}

/// Resolved GitHub credentials
#[derive(Clone)]
pub struct GitHubAuthConfig {
    /// API token
    pub token: String,
    /// Where the token came from
    pub source: AuthSource,
}

impl std::fmt::Debug for GitHubAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubAuthConfig")
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Token from the runner environment, if any
pub fn token_from_env(env: &RunnerEnv) -> Option<GitHubAuthConfig> {
    ["GITHUB_TOKEN", "GH_TOKEN"].iter().find_map(|name| {
        env.var(name).map(|token| GitHubAuthConfig {
            token: token.trim().to_string(),
            source: AuthSource::EnvVar,
        })
    })
}

/// Get GitHub authentication
///
/// Environment variables win; otherwise `gh auth token` is asked.
pub async fn get_github_auth(env: &RunnerEnv) -> Result<GitHubAuthConfig> {
    if let Some(config) = token_from_env(env) {
        debug!("using GitHub token from environment");
        return Ok(config);
    }

    debug!("no token in environment, asking gh CLI");
    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .await
        .map_err(|e| Error::Auth(format!("no GITHUB_TOKEN set and gh CLI unavailable: {e}")))?;

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !output.status.success() || token.is_empty() {
        return Err(Error::Auth(
            "no GITHUB_TOKEN set and `gh auth token` returned nothing".to_string(),
        ));
    }

    Ok(GitHubAuthConfig {
        token,
        source: AuthSource::Cli,
    })
}

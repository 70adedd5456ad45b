//! Shared command context for CLI commands
//!
//! Extracts common setup shared by the release, label and pre-check commands.

use pub_release::actions::{RunContext, RunnerEnv};
use pub_release::auth::get_github_auth;
use pub_release::error::Result;
use pub_release::forge::{ForgeService, GitHubService};
use tracing::debug;

/// Shared context for CLI commands that interact with the forge
pub struct CommandContext {
    /// Snapshot of the runner environment
    pub env: RunnerEnv,
    /// Repository, commit and workspace of this run
    pub run: RunContext,
    /// Forge service
    pub forge: Box<dyn ForgeService>,
}

impl CommandContext {
    /// Capture the environment, authenticate and create the forge service
    pub async fn new() -> Result<Self> {
        let env = RunnerEnv::from_process();
        let run = RunContext::from_env(&env)?;
        let auth = get_github_auth(&env).await?;
        let forge = Box::new(GitHubService::new(&auth.token, run.repo.clone())?);
        let repo = forge.config();
        debug!(source = ?auth.source, owner = %repo.owner, repo = %repo.repo, "connected to GitHub");

        Ok(Self { env, run, forge })
    }
}

//! Forge services
//!
//! The release pipeline and the labeler only talk to the hosting service
//! through [`ForgeService`], so either can run against a test double.

mod github;

pub use github::GitHubService;

use crate::error::Result;
use crate::types::{CheckRun, CreatedRelease, ReleaseRequest, RepoConfig};
use async_trait::async_trait;

/// Forge operations needed by the pipeline and the labeler
#[async_trait]
pub trait ForgeService: Send + Sync {
    /// Tag name of the most recent release, if the repository has any
    async fn latest_release_tag(&self) -> Result<Option<String>>;

    /// Create a release
    async fn create_release(&self, request: &ReleaseRequest) -> Result<CreatedRelease>;

    /// Title of a pull request
    async fn pull_request_title(&self, pr_number: u64) -> Result<String>;

    /// Messages of every commit in a pull request
    async fn list_pr_commit_messages(&self, pr_number: u64) -> Result<Vec<String>>;

    /// Paths of every file changed by a pull request (all pages)
    async fn list_pr_changed_files(&self, pr_number: u64) -> Result<Vec<String>>;

    /// Add labels to an issue or pull request
    async fn add_labels(&self, issue_number: u64, labels: &[String]) -> Result<()>;

    /// Trigger a `workflow_dispatch` run of a workflow at a ref
    async fn dispatch_workflow(&self, workflow_id: &str, git_ref: &str) -> Result<()>;

    /// Post a completed check run
    async fn create_check_run(&self, check: &CheckRun) -> Result<()>;

    /// Repository this service operates on
    fn config(&self) -> &RepoConfig;
}

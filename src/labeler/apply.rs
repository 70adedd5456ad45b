//! Labeling execution - effectful operations

use super::policy::{LabelPlan, RELEASE_LABEL, REVERT_LABEL, ReleasePolicy};
use crate::error::Result;
use crate::forge::ForgeService;
use crate::types::PullRequestSignal;
use tracing::debug;

/// What was done to a PR
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelOutcome {
    /// Labels attached
    pub labels: Vec<String>,
    /// Workflow dispatched, if any
    pub dispatched: Option<String>,
}

/// Fetch the facts `policy` needs about a PR
///
/// The title is always fetched; commits only for the title/commit policy and
/// changed files only for the required-files policy.
pub async fn gather_signal(
    forge: &dyn ForgeService,
    pr_number: u64,
    policy: &ReleasePolicy,
) -> Result<PullRequestSignal> {
    let title = forge.pull_request_title(pr_number).await?;
    let mut signal = PullRequestSignal {
        number: pr_number,
        title,
        ..PullRequestSignal::default()
    };
    match policy {
        ReleasePolicy::TitleOrCommits => {
            signal.commit_messages = forge.list_pr_commit_messages(pr_number).await?;
        }
        ReleasePolicy::RequiredFiles(_) => {
            signal.changed_files = forge.list_pr_changed_files(pr_number).await?;
        }
    }
    debug!(
        pr_number,
        commits = signal.commit_messages.len(),
        files = signal.changed_files.len(),
        "gathered PR signal"
    );
    Ok(signal)
}

/// Carry out a label plan on PR `pr_number`
///
/// The revert and release actions are independent; the workflow is
/// dispatched only after the release label was attached.
pub async fn apply_labels(
    forge: &dyn ForgeService,
    pr_number: u64,
    plan: &LabelPlan,
    git_ref: &str,
) -> Result<LabelOutcome> {
    let mut outcome = LabelOutcome::default();

    if plan.revert {
        let labels = vec![REVERT_LABEL.to_string()];
        forge.add_labels(pr_number, &labels).await?;
        outcome.labels.extend(labels);
    }

    if plan.release {
        let labels = vec![RELEASE_LABEL.to_string()];
        forge.add_labels(pr_number, &labels).await?;
        outcome.labels.extend(labels);

        if let Some(workflow) = &plan.dispatch {
            forge.dispatch_workflow(workflow, git_ref).await?;
            outcome.dispatched = Some(workflow.clone());
        }
    }

    Ok(outcome)
}

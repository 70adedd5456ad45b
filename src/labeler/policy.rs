//! Labeling predicates - pure functions

use crate::types::PullRequestSignal;
use regex::Regex;
use std::sync::LazyLock;

/// Label added to revert PRs
pub const REVERT_LABEL: &str = "revert :rewind:";

/// Label added to release PRs
pub const RELEASE_LABEL: &str = "release :tada:";

/// A commit message like `release: 1.2.0` or `release(pkg): bump`
static RELEASE_COMMIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^release.*:.*").expect("valid regex"));

/// How release PRs are recognized
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReleasePolicy {
    /// Title contains `Release`, or some commit message starts with `release…:`
    #[default]
    TitleOrCommits,
    /// Every listed file is among the PR's changed files
    RequiredFiles(Vec<String>),
}

/// Whether the PR reverts something
pub fn is_revert(signal: &PullRequestSignal) -> bool {
    signal.title.contains("Revert")
}

/// Whether the PR is a release under `policy`
pub fn is_release(signal: &PullRequestSignal, policy: &ReleasePolicy) -> bool {
    match policy {
        ReleasePolicy::TitleOrCommits => {
            signal.title.contains("Release")
                || signal
                    .commit_messages
                    .iter()
                    .any(|m| RELEASE_COMMIT.is_match(m))
        }
        ReleasePolicy::RequiredFiles(required) => {
            !required.is_empty()
                && required
                    .iter()
                    .all(|f| signal.changed_files.iter().any(|c| c == f))
        }
    }
}

/// Actions to take on a PR
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelPlan {
    /// Attach [`REVERT_LABEL`]
    pub revert: bool,
    /// Attach [`RELEASE_LABEL`]
    pub release: bool,
    /// Workflow to dispatch (only set for releases)
    pub dispatch: Option<String>,
}

impl LabelPlan {
    /// Whether the plan does nothing
    pub const fn is_empty(&self) -> bool {
        !self.revert && !self.release
    }
}

/// Decide the actions for a PR (PURE)
pub fn plan_labels(
    signal: &PullRequestSignal,
    policy: &ReleasePolicy,
    workflow: Option<&str>,
) -> LabelPlan {
    let release = is_release(signal, policy);
    LabelPlan {
        revert: is_revert(signal),
        release,
        dispatch: workflow.filter(|_| release).map(ToString::to_string),
    }
}

//! Mock forge service for testing

#![allow(dead_code)]

use async_trait::async_trait;
use pub_release::error::{Error, Result};
use pub_release::forge::ForgeService;
use pub_release::types::{CheckRun, CreatedRelease, ReleaseRequest, RepoConfig};
use std::sync::Mutex;

/// Call record for `add_labels`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddLabelsCall {
    pub issue_number: u64,
    pub labels: Vec<String>,
}

/// Call record for `dispatch_workflow`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchCall {
    pub workflow_id: String,
    pub git_ref: String,
}

/// Hand-written forge double
///
/// Features:
/// - Configurable latest release, PR title, commits and changed files
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockForgeService {
    config: RepoConfig,
    latest_tag: Mutex<Option<String>>,
    pr_title: Mutex<String>,
    pr_commits: Mutex<Vec<String>>,
    pr_files: Mutex<Vec<String>>,
    // Call tracking
    latest_release_calls: Mutex<usize>,
    create_release_calls: Mutex<Vec<ReleaseRequest>>,
    title_calls: Mutex<Vec<u64>>,
    commits_calls: Mutex<Vec<u64>>,
    files_calls: Mutex<Vec<u64>>,
    add_labels_calls: Mutex<Vec<AddLabelsCall>>,
    dispatch_calls: Mutex<Vec<DispatchCall>>,
    check_runs: Mutex<Vec<CheckRun>>,
    // Error injection
    error_on_create_release: Mutex<Option<String>>,
    error_on_add_labels: Mutex<Option<String>>,
}

impl MockForgeService {
    /// Mock for `owner/repo`
    pub fn new() -> Self {
        Self {
            config: RepoConfig {
                owner: "owner".to_string(),
                repo: "repo".to_string(),
                api_url: "https://api.github.com".to_string(),
            },
            latest_tag: Mutex::new(None),
            pr_title: Mutex::new(String::new()),
            pr_commits: Mutex::new(Vec::new()),
            pr_files: Mutex::new(Vec::new()),
            latest_release_calls: Mutex::new(0),
            create_release_calls: Mutex::new(Vec::new()),
            title_calls: Mutex::new(Vec::new()),
            commits_calls: Mutex::new(Vec::new()),
            files_calls: Mutex::new(Vec::new()),
            add_labels_calls: Mutex::new(Vec::new()),
            dispatch_calls: Mutex::new(Vec::new()),
            check_runs: Mutex::new(Vec::new()),
            error_on_create_release: Mutex::new(None),
            error_on_add_labels: Mutex::new(None),
        }
    }

    // === Response setup ===

    /// Set the tag of the latest release
    pub fn set_latest_tag(&self, tag: &str) {
        *self.latest_tag.lock().unwrap() = Some(tag.to_string());
    }

    /// Set the PR title, commit messages and changed files
    pub fn set_pull_request(&self, title: &str, commits: &[&str], files: &[&str]) {
        *self.pr_title.lock().unwrap() = title.to_string();
        *self.pr_commits.lock().unwrap() = commits.iter().map(ToString::to_string).collect();
        *self.pr_files.lock().unwrap() = files.iter().map(ToString::to_string).collect();
    }

    // === Error injection ===

    /// Make `create_release` return an error
    pub fn fail_create_release(&self, msg: &str) {
        *self.error_on_create_release.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `add_labels` return an error
    pub fn fail_add_labels(&self, msg: &str) {
        *self.error_on_add_labels.lock().unwrap() = Some(msg.to_string());
    }

    // === Call inspection ===

    pub fn latest_release_call_count(&self) -> usize {
        *self.latest_release_calls.lock().unwrap()
    }

    pub fn get_create_release_calls(&self) -> Vec<ReleaseRequest> {
        self.create_release_calls.lock().unwrap().clone()
    }

    pub fn get_add_labels_calls(&self) -> Vec<AddLabelsCall> {
        self.add_labels_calls.lock().unwrap().clone()
    }

    pub fn get_dispatch_calls(&self) -> Vec<DispatchCall> {
        self.dispatch_calls.lock().unwrap().clone()
    }

    pub fn get_check_runs(&self) -> Vec<CheckRun> {
        self.check_runs.lock().unwrap().clone()
    }

    pub fn commits_call_count(&self) -> usize {
        self.commits_calls.lock().unwrap().len()
    }

    pub fn files_call_count(&self) -> usize {
        self.files_calls.lock().unwrap().len()
    }

    /// Total number of calls that change the forge
    pub fn mutation_count(&self) -> usize {
        self.create_release_calls.lock().unwrap().len()
            + self.add_labels_calls.lock().unwrap().len()
            + self.dispatch_calls.lock().unwrap().len()
            + self.check_runs.lock().unwrap().len()
    }

    /// Assert that labels were added to `issue_number` in this exact order
    pub fn assert_labels(&self, issue_number: u64, expected: &[&str]) {
        let calls = self.get_add_labels_calls();
        let labels: Vec<String> = calls
            .iter()
            .filter(|c| c.issue_number == issue_number)
            .flat_map(|c| c.labels.clone())
            .collect();
        assert_eq!(
            labels, expected,
            "Expected labels {expected:?} on #{issue_number} but got: {calls:?}"
        );
    }

    /// Assert that `dispatch_workflow` was called once with these arguments
    pub fn assert_dispatched(&self, workflow_id: &str, git_ref: &str) {
        let calls = self.get_dispatch_calls();
        assert_eq!(
            calls,
            vec![DispatchCall {
                workflow_id: workflow_id.to_string(),
                git_ref: git_ref.to_string(),
            }],
            "Expected a single dispatch of {workflow_id} at {git_ref}"
        );
    }
}

#[async_trait]
impl ForgeService for MockForgeService {
    async fn latest_release_tag(&self) -> Result<Option<String>> {
        *self.latest_release_calls.lock().unwrap() += 1;
        Ok(self.latest_tag.lock().unwrap().clone())
    }

    async fn create_release(&self, request: &ReleaseRequest) -> Result<CreatedRelease> {
        self.create_release_calls
            .lock()
            .unwrap()
            .push(request.clone());

        if let Some(msg) = self.error_on_create_release.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        let id = self.create_release_calls.lock().unwrap().len() as u64;
        Ok(CreatedRelease {
            id,
            tag_name: request.tag_name.clone(),
            html_url: format!(
                "https://github.com/owner/repo/releases/tag/{}",
                request.tag_name
            ),
        })
    }

    async fn pull_request_title(&self, pr_number: u64) -> Result<String> {
        self.title_calls.lock().unwrap().push(pr_number);
        Ok(self.pr_title.lock().unwrap().clone())
    }

    async fn list_pr_commit_messages(&self, pr_number: u64) -> Result<Vec<String>> {
        self.commits_calls.lock().unwrap().push(pr_number);
        Ok(self.pr_commits.lock().unwrap().clone())
    }

    async fn list_pr_changed_files(&self, pr_number: u64) -> Result<Vec<String>> {
        self.files_calls.lock().unwrap().push(pr_number);
        Ok(self.pr_files.lock().unwrap().clone())
    }

    async fn add_labels(&self, issue_number: u64, labels: &[String]) -> Result<()> {
        self.add_labels_calls.lock().unwrap().push(AddLabelsCall {
            issue_number,
            labels: labels.to_vec(),
        });

        if let Some(msg) = self.error_on_add_labels.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }
        Ok(())
    }

    async fn dispatch_workflow(&self, workflow_id: &str, git_ref: &str) -> Result<()> {
        self.dispatch_calls.lock().unwrap().push(DispatchCall {
            workflow_id: workflow_id.to_string(),
            git_ref: git_ref.to_string(),
        });
        Ok(())
    }

    async fn create_check_run(&self, check: &CheckRun) -> Result<()> {
        self.check_runs.lock().unwrap().push(check.clone());
        Ok(())
    }

    fn config(&self) -> &RepoConfig {
        &self.config
    }
}

//! GitHub forge service implementation

use crate::error::{Error, Result};
use crate::forge::ForgeService;
use crate::types::{CheckRun, CreatedRelease, ReleaseRequest, RepoConfig};
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Page size for raw list endpoints (GitHub maximum)
const PER_PAGE: usize = 100;

#[derive(Deserialize)]
struct PrCommit {
    commit: PrCommitDetail,
}

#[derive(Deserialize)]
struct PrCommitDetail {
    message: String,
}

#[derive(Serialize)]
struct DispatchPayload<'a> {
    #[serde(rename = "ref")]
    git_ref: &'a str,
}

#[derive(Serialize)]
struct CheckRunPayload<'a> {
    name: &'a str,
    head_sha: &'a str,
    status: &'static str,
    conclusion: String,
    completed_at: String,
    output: CheckRunOutput<'a>,
}

#[derive(Serialize)]
struct CheckRunOutput<'a> {
    title: &'a str,
    summary: &'a str,
    text: &'a str,
}

/// GitHub service using octocrab
///
/// Endpoints octocrab does not model the way we need (PR commits, workflow
/// dispatch, check runs) go through a plain reqwest client.
pub struct GitHubService {
    client: Octocrab,
    config: RepoConfig,
    /// Token for raw HTTP requests
    token: String,
    /// HTTP client for raw requests
    http_client: Client,
}

impl GitHubService {
    /// Create a new GitHub service
    pub fn new(token: &str, config: RepoConfig) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(config.api_url.as_str())
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent(concat!("pub-release/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            token: token.to_string(),
            http_client,
        })
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{path}",
            self.config.api_url, self.config.owner, self.config.repo
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http_client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    /// Turn a non-success response into an error carrying the body
    async fn check_status(response: Response, what: &str) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(Error::GitHubApi(format!("{what} returned {status}: {body}")))
    }
}

#[async_trait]
impl ForgeService for GitHubService {
    async fn latest_release_tag(&self) -> Result<Option<String>> {
        debug!("fetching latest release");
        let releases = self
            .client
            .repos(&self.config.owner, &self.config.repo)
            .releases()
            .list()
            .per_page(1)
            .send()
            .await?;

        let tag = releases.items.first().map(|r| r.tag_name.clone());
        debug!(tag = ?tag, "fetched latest release");
        Ok(tag)
    }

    async fn create_release(&self, request: &ReleaseRequest) -> Result<CreatedRelease> {
        debug!(
            tag = %request.tag_name,
            draft = request.draft,
            prerelease = request.prerelease,
            "creating release"
        );
        let repos = self.client.repos(&self.config.owner, &self.config.repo);
        let release = repos
            .releases()
            .create(&request.tag_name)
            .target_commitish(&request.target_commitish)
            .name(&request.name)
            .body(&request.body)
            .draft(request.draft)
            .prerelease(request.prerelease)
            .send()
            .await?;

        let created = CreatedRelease {
            id: release.id.0,
            tag_name: release.tag_name,
            html_url: release.html_url.to_string(),
        };
        debug!(release_id = created.id, "created release");
        Ok(created)
    }

    async fn pull_request_title(&self, pr_number: u64) -> Result<String> {
        debug!(pr_number, "getting PR title");
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .get(pr_number)
            .await?;
        Ok(pr.title.unwrap_or_default())
    }

    async fn list_pr_commit_messages(&self, pr_number: u64) -> Result<Vec<String>> {
        debug!(pr_number, "listing PR commits");
        let url = self.repo_url(&format!("pulls/{pr_number}/commits"));
        let mut messages = Vec::new();

        for page in 1.. {
            let response = self
                .request(Method::GET, &url)
                .query(&[("per_page", PER_PAGE), ("page", page)])
                .send()
                .await
                .map_err(|e| Error::GitHubApi(format!("Failed to list PR commits: {e}")))?;
            let commits: Vec<PrCommit> = Self::check_status(response, "listing PR commits")
                .await?
                .json()
                .await
                .map_err(|e| Error::GitHubApi(format!("Failed to parse PR commits: {e}")))?;

            let count = commits.len();
            messages.extend(commits.into_iter().map(|c| c.commit.message));
            if count < PER_PAGE {
                break;
            }
        }

        debug!(pr_number, count = messages.len(), "listed PR commits");
        Ok(messages)
    }

    async fn list_pr_changed_files(&self, pr_number: u64) -> Result<Vec<String>> {
        debug!(pr_number, "listing PR files");
        let first_page = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list_files(pr_number)
            .await?;
        let files: Vec<String> = self
            .client
            .all_pages(first_page)
            .await?
            .into_iter()
            .map(|f| f.filename)
            .collect();

        debug!(pr_number, count = files.len(), "listed PR files");
        Ok(files)
    }

    async fn add_labels(&self, issue_number: u64, labels: &[String]) -> Result<()> {
        debug!(issue_number, ?labels, "adding labels");
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .add_labels(issue_number, labels)
            .await?;
        Ok(())
    }

    async fn dispatch_workflow(&self, workflow_id: &str, git_ref: &str) -> Result<()> {
        debug!(workflow_id, git_ref, "dispatching workflow");
        let url = self.repo_url(&format!(
            "actions/workflows/{}/dispatches",
            urlencoding::encode(workflow_id)
        ));
        let response = self
            .request(Method::POST, &url)
            .json(&DispatchPayload { git_ref })
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to dispatch workflow: {e}")))?;
        Self::check_status(response, "workflow dispatch").await?;
        debug!(workflow_id, "dispatched workflow");
        Ok(())
    }

    async fn create_check_run(&self, check: &CheckRun) -> Result<()> {
        debug!(name = %check.name, conclusion = %check.conclusion, "creating check run");
        let payload = CheckRunPayload {
            name: &check.name,
            head_sha: &check.head_sha,
            status: "completed",
            conclusion: check.conclusion.to_string(),
            completed_at: chrono::Utc::now().to_rfc3339(),
            output: CheckRunOutput {
                title: &check.title,
                summary: &check.summary,
                text: &check.text,
            },
        };
        let response = self
            .request(Method::POST, &self.repo_url("check-runs"))
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to create check run: {e}")))?;
        Self::check_status(response, "check run creation").await?;
        Ok(())
    }

    fn config(&self) -> &RepoConfig {
        &self.config
    }
}

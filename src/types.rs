//! Core types for pub-release

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Version assumed when the repository has never been released
pub const BASELINE_VERSION: &str = "0.0.0";

/// Registry credentials handed to the package manager before publishing
///
/// All fields are mandatory workflow inputs.
#[derive(Clone, PartialEq, Eq)]
pub struct RegistryCredentials {
    /// OAuth access token
    pub access_token: String,
    /// OAuth refresh token
    pub refresh_token: String,
    /// OpenID identity token
    pub id_token: String,
    /// Token refresh endpoint
    pub token_endpoint: String,
    /// Access token expiry, milliseconds since the epoch
    pub expiration: i64,
}

impl std::fmt::Debug for RegistryCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryCredentials")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("id_token", &"<redacted>")
            .field("token_endpoint", &self.token_endpoint)
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// Minimum quality score as supplied by the workflow
///
/// The raw value is kept so that a malformed threshold only fails the run
/// when the quality gate actually needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreThreshold(Option<String>);

impl ScoreThreshold {
    /// Wrap a raw input value (`None` when the input was empty)
    pub const fn new(raw: Option<String>) -> Self {
        Self(raw)
    }

    /// Parse the threshold
    ///
    /// `Ok(None)` when no value was provided; a value that is not a whole
    /// number is a configuration error.
    pub fn minimum(&self) -> Result<Option<i64>> {
        self.0
            .as_deref()
            .map(|raw| {
                raw.trim().parse().map_err(|_| {
                    Error::Config(format!("pub-score-min-points must be a number, got `{raw}`"))
                })
            })
            .transpose()
    }

    /// Raw input value
    pub fn raw(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Resolved configuration for one pipeline run
///
/// Built once from workflow inputs and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ReleaseConfig {
    /// Version of the most recent release (without the `v` prefix)
    pub previous_version: String,
    /// Changelog to read the new version from
    pub changelog_file: PathBuf,
    /// Create the release as a draft
    pub is_draft: bool,
    /// Command run before the release is created
    pub pre_release_command: Option<String>,
    /// Command run after the release is created
    pub post_release_command: Option<String>,
    /// Command run before publishing
    pub pre_publish_command: Option<String>,
    /// Command run after publishing
    pub post_publish_command: Option<String>,
    /// Whether the quality gate runs before publishing
    pub run_score_test: bool,
    /// Minimum quality score required to publish
    pub score_min_points: ScoreThreshold,
    /// Registry credentials
    pub credentials: RegistryCredentials,
}

/// Newest entry of the changelog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    /// Version identifier, e.g. `1.2.0` or `2.0.0-beta.1`
    pub version: String,
    /// Release notes
    pub body: String,
}

impl ChangelogEntry {
    /// Pre-releases are versions containing a hyphen
    pub fn is_prerelease(&self) -> bool {
        self.version.contains('-')
    }

    /// Tag name used for the release (`v` + version)
    pub fn tag_name(&self) -> String {
        format!("v{}", self.version)
    }
}

/// Outcome of the release gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseDecision {
    /// The changelog has a version that has not been released yet
    Proceed(ChangelogEntry),
    /// The newest changelog version was already released
    Skip {
        /// The unchanged version
        version: String,
    },
}

impl ReleaseDecision {
    /// Whether the pipeline should continue
    pub const fn should_proceed(&self) -> bool {
        matches!(self, Self::Proceed(_))
    }
}

/// Parameters for creating a release on the forge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRequest {
    /// Tag to create
    pub tag_name: String,
    /// Release display name
    pub name: String,
    /// Commit the tag points at
    pub target_commitish: String,
    /// Release notes
    pub body: String,
    /// Create as draft
    pub draft: bool,
    /// Mark as pre-release
    pub prerelease: bool,
}

impl ReleaseRequest {
    /// Build the request for a changelog entry at a commit
    pub fn for_entry(entry: &ChangelogEntry, target_commitish: &str, draft: bool) -> Self {
        let tag = entry.tag_name();
        Self {
            name: tag.clone(),
            tag_name: tag,
            target_commitish: target_commitish.to_string(),
            body: entry.body.clone(),
            draft,
            prerelease: entry.is_prerelease(),
        }
    }
}

/// A release created on the forge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedRelease {
    /// Release ID
    pub id: u64,
    /// Tag name
    pub tag_name: String,
    /// Web URL of the release
    pub html_url: String,
}

/// Facts about a pull request used by the labeling policy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestSignal {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Commit messages, oldest first
    pub commit_messages: Vec<String>,
    /// Paths of changed files
    pub changed_files: Vec<String>,
}

/// Repository coordinates on the forge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// REST API base URL
    pub api_url: String,
}

/// Conclusion of a completed check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    /// All checks passed
    Success,
    /// At least one check failed
    Failure,
}

impl std::fmt::Display for CheckConclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

/// A completed check run to post on a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRun {
    /// Check name
    pub name: String,
    /// Commit the check belongs to
    pub head_sha: String,
    /// Result
    pub conclusion: CheckConclusion,
    /// Output title
    pub title: String,
    /// Output summary (markdown)
    pub summary: String,
    /// Output details (markdown)
    pub text: String,
}

//! Release configuration resolved from workflow inputs

use crate::actions::{InputSource, RunContext};
use crate::error::{Error, Result};
use crate::forge::ForgeService;
use crate::types::{BASELINE_VERSION, RegistryCredentials, ReleaseConfig, ScoreThreshold};
use std::path::PathBuf;
use tracing::{debug, info};

/// Workflow input names
pub mod input {
    /// Version of the last release; looked up on the forge when absent
    pub const PREVIOUS_VERSION: &str = "previous-version";
    /// Changelog path; defaults to `CHANGELOG.md` in the workspace
    pub const CHANGELOG_FILE: &str = "changelog-file";
    /// Create the release as a draft
    pub const IS_DRAFT: &str = "is-draft";
    /// Hook run before creating the release
    pub const PRE_RELEASE_COMMAND: &str = "pre-release-command";
    /// Hook run after creating the release
    pub const POST_RELEASE_COMMAND: &str = "post-release-command";
    /// Hook run before publishing
    pub const PRE_PUBLISH_COMMAND: &str = "pre-publish-command";
    /// Hook run after publishing
    pub const POST_PUBLISH_COMMAND: &str = "post-publish-command";
    /// Enable the quality gate
    pub const SHOULD_RUN_PUB_SCORE_TEST: &str = "should-run-pub-score-test";
    /// Minimum quality score
    pub const PUB_SCORE_MIN_POINTS: &str = "pub-score-min-points";
    /// Registry access token
    pub const ACCESS_TOKEN: &str = "access-token";
    /// Registry refresh token
    pub const REFRESH_TOKEN: &str = "refresh-token";
    /// Registry identity token
    pub const ID_TOKEN: &str = "id-token";
    /// Registry token endpoint
    pub const TOKEN_ENDPOINT: &str = "token-endpoint";
    /// Registry token expiry
    pub const EXPIRATION: &str = "expiration";
}

/// Read the registry credentials; every field is required
pub fn resolve_credentials(inputs: &dyn InputSource) -> Result<RegistryCredentials> {
    let access_token = inputs.get_required(input::ACCESS_TOKEN)?;
    let refresh_token = inputs.get_required(input::REFRESH_TOKEN)?;
    let id_token = inputs.get_required(input::ID_TOKEN)?;
    let token_endpoint = inputs.get_required(input::TOKEN_ENDPOINT)?;
    let expiration = inputs
        .get_int(input::EXPIRATION)?
        .ok_or_else(|| Error::MissingInput(input::EXPIRATION.to_string()))?;

    Ok(RegistryCredentials {
        access_token,
        refresh_token,
        id_token,
        token_endpoint,
        expiration,
    })
}

/// Version of the latest release on the forge, without its `v` prefix
///
/// Falls back to [`BASELINE_VERSION`] for a repository with no releases.
pub async fn latest_released_version(forge: &dyn ForgeService) -> Result<String> {
    let version = forge.latest_release_tag().await?.map_or_else(
        || BASELINE_VERSION.to_string(),
        |tag| tag.strip_prefix('v').unwrap_or(&tag).to_string(),
    );
    debug!(version, "resolved previous version from releases");
    Ok(version)
}

/// Build the configuration for one pipeline run
///
/// Credentials are checked before anything touches the network, so a
/// misconfigured workflow fails without side effects.
pub async fn resolve_release_config(
    inputs: &dyn InputSource,
    ctx: &RunContext,
    forge: &dyn ForgeService,
) -> Result<ReleaseConfig> {
    let credentials = resolve_credentials(inputs)?;

    let changelog_file = inputs
        .get(input::CHANGELOG_FILE)
        .map_or_else(|| ctx.default_changelog(), |p| ctx.workspace.join(PathBuf::from(p)));

    let previous_version = match inputs.get(input::PREVIOUS_VERSION) {
        Some(v) => v,
        None => latest_released_version(forge).await?,
    };

    let config = ReleaseConfig {
        previous_version,
        changelog_file,
        is_draft: inputs.get_bool(input::IS_DRAFT),
        pre_release_command: inputs.get(input::PRE_RELEASE_COMMAND),
        post_release_command: inputs.get(input::POST_RELEASE_COMMAND),
        pre_publish_command: inputs.get(input::PRE_PUBLISH_COMMAND),
        post_publish_command: inputs.get(input::POST_PUBLISH_COMMAND),
        run_score_test: inputs.get_bool(input::SHOULD_RUN_PUB_SCORE_TEST),
        score_min_points: ScoreThreshold::new(inputs.get(input::PUB_SCORE_MIN_POINTS)),
        credentials,
    };
    info!(
        previous_version = %config.previous_version,
        changelog = %config.changelog_file.display(),
        draft = config.is_draft,
        score_test = config.run_score_test,
        "resolved release configuration"
    );
    Ok(config)
}

//! Pipeline planning - pure functions
//!
//! No I/O happens here: the plan is derived from the resolved configuration,
//! the changelog entry and the commit being released.

use crate::process::HookCommand;
use crate::types::{ChangelogEntry, ReleaseConfig, ReleaseRequest, ScoreThreshold};

/// One side-effecting step of the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineStep {
    /// Run a user hook
    Hook {
        /// Which hook (`pre-release`, `post-publish`, ...)
        stage: &'static str,
        /// Parsed command
        command: HookCommand,
    },
    /// Create the release on the forge
    CreateRelease(ReleaseRequest),
    /// Install or reuse the toolchain and put it on the search path
    ProvisionToolchain,
    /// Run the quality scorer and enforce the minimum
    QualityGate(ScoreThreshold),
    /// Write the registry credentials file
    WriteCredentials,
    /// Publish the package
    Publish,
}

impl std::fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hook { stage, command } => {
                write!(f, "run {stage} hook: {}", command.program)?;
                for arg in &command.args {
                    write!(f, " {arg}")?;
                }
                Ok(())
            }
            Self::CreateRelease(request) => {
                write!(f, "create release {}", request.tag_name)?;
                if request.draft {
                    write!(f, " (draft)")?;
                }
                if request.prerelease {
                    write!(f, " (pre-release)")?;
                }
                Ok(())
            }
            Self::ProvisionToolchain => write!(f, "set up toolchain"),
            Self::QualityGate(threshold) => match threshold.raw() {
                Some(min) => write!(f, "check pub score (minimum {min})"),
                None => write!(f, "check pub score (no minimum configured)"),
            },
            Self::WriteCredentials => write!(f, "write pub credentials"),
            Self::Publish => write!(f, "publish package"),
        }
    }
}

fn hook(steps: &mut Vec<PipelineStep>, stage: &'static str, line: Option<&str>) {
    if let Some(command) = line.and_then(HookCommand::parse) {
        steps.push(PipelineStep::Hook { stage, command });
    }
}

/// Plan the release of `entry` at commit `sha` (PURE)
///
/// Order: pre-release hook, release, post-release hook, toolchain,
/// pre-publish hook, quality gate (when enabled), credentials, publish,
/// post-publish hook. Unconfigured hooks produce no step.
pub fn plan_pipeline(config: &ReleaseConfig, entry: &ChangelogEntry, sha: &str) -> Vec<PipelineStep> {
    let mut steps = Vec::new();

    hook(&mut steps, "pre-release", config.pre_release_command.as_deref());
    steps.push(PipelineStep::CreateRelease(ReleaseRequest::for_entry(
        entry,
        sha,
        config.is_draft,
    )));
    hook(&mut steps, "post-release", config.post_release_command.as_deref());

    steps.push(PipelineStep::ProvisionToolchain);

    hook(&mut steps, "pre-publish", config.pre_publish_command.as_deref());
    if config.run_score_test {
        steps.push(PipelineStep::QualityGate(config.score_min_points.clone()));
    }
    steps.push(PipelineStep::WriteCredentials);
    steps.push(PipelineStep::Publish);
    hook(&mut steps, "post-publish", config.post_publish_command.as_deref());

    steps
}

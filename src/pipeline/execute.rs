//! Pipeline execution - effectful operations

use super::gate::release_gate;
use super::plan::{PipelineStep, plan_pipeline};
use crate::actions::{self, RunContext, RunnerEnv};
use crate::error::{Error, Result};
use crate::forge::ForgeService;
use crate::process::CommandRunner;
use crate::quality;
use crate::registry;
use crate::toolchain::{Provisioned, Provisioner, ToolchainSpec};
use crate::types::{CreatedRelease, ReleaseConfig, ReleaseDecision, ScoreThreshold};
use tracing::info;

/// How a pipeline run ended
#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    /// The newest changelog version was already released; nothing was done
    Skipped {
        /// The unchanged version
        version: String,
    },
    /// Only the plan was computed (`--dry-run`)
    Planned {
        /// Version that would be released
        version: String,
        /// Steps that would run
        steps: Vec<PipelineStep>,
    },
    /// The version was released and published
    Published {
        /// Released version
        version: String,
        /// Release created on the forge
        release: CreatedRelease,
        /// Whether the toolchain had to be downloaded
        toolchain_downloaded: bool,
    },
}

/// Collaborators for one pipeline run
pub struct Pipeline<'a> {
    /// Run context (repository, commit, workspace)
    pub ctx: &'a RunContext,
    /// Runner environment
    pub env: &'a RunnerEnv,
    /// Forge service
    pub forge: &'a dyn ForgeService,
    /// Command runner for hooks and the toolchain
    pub runner: &'a dyn CommandRunner,
    /// Toolchain installer
    pub provisioner: Provisioner<'a>,
    /// Toolchain to install
    pub toolchain: ToolchainSpec,
}

#[derive(Default)]
struct ExecutionState {
    release: Option<CreatedRelease>,
    toolchain: Option<Provisioned>,
}

impl ExecutionState {
    fn flutter(&self) -> Result<String> {
        self.toolchain
            .as_ref()
            .map(Provisioned::program)
            .ok_or_else(|| Error::Internal("toolchain used before it was set up".to_string()))
    }
}

impl Pipeline<'_> {
    /// Run the whole pipeline for `config`
    ///
    /// Every stage runs to completion before the next starts; the first
    /// failure aborts the rest. Completed stages are not rolled back.
    pub async fn run(&self, config: &ReleaseConfig, dry_run: bool) -> Result<PipelineOutcome> {
        let entry = match release_gate(config)? {
            ReleaseDecision::Skip { version } => {
                actions::warning(&format!(
                    "No new version found. Latest version in Changelog ({version}) is the same as the previous version."
                ));
                return Ok(PipelineOutcome::Skipped { version });
            }
            ReleaseDecision::Proceed(entry) => entry,
        };

        let steps = plan_pipeline(config, &entry, &self.ctx.sha);
        if dry_run {
            return Ok(PipelineOutcome::Planned {
                version: entry.version,
                steps,
            });
        }

        let mut state = ExecutionState::default();
        for step in &steps {
            info!(%step, "running step");
            self.execute_step(step, config, &mut state).await?;
        }

        let release = state
            .release
            .ok_or_else(|| Error::Internal("pipeline finished without a release".to_string()))?;
        Ok(PipelineOutcome::Published {
            version: entry.version,
            release,
            toolchain_downloaded: state.toolchain.is_some_and(|t| t.downloaded),
        })
    }

    async fn execute_step(
        &self,
        step: &PipelineStep,
        config: &ReleaseConfig,
        state: &mut ExecutionState,
    ) -> Result<()> {
        match step {
            PipelineStep::Hook { command, .. } => {
                self.runner.run(&command.program, &command.args).await?;
            }
            PipelineStep::CreateRelease(request) => {
                let release = self.forge.create_release(request).await?;
                info!(url = %release.html_url, "created release");
                state.release = Some(release);
            }
            PipelineStep::ProvisionToolchain => {
                state.toolchain = Some(self.provisioner.provision(&self.toolchain).await?);
            }
            PipelineStep::QualityGate(threshold) => {
                self.quality_gate(threshold, &state.flutter()?).await?;
            }
            PipelineStep::WriteCredentials => {
                registry::write_credentials(self.env, &config.credentials)?;
            }
            PipelineStep::Publish => {
                let args = ["pub", "publish", "--force"].map(String::from);
                self.runner.run(&state.flutter()?, &args).await?;
            }
        }
        Ok(())
    }

    async fn quality_gate(&self, threshold: &ScoreThreshold, flutter: &str) -> Result<()> {
        let minimum = threshold.minimum()?.ok_or_else(|| {
            Error::Config(
                "should-run-pub-score-test was set to true but no value for pub-score-min-points was provided"
                    .to_string(),
            )
        })?;

        let report = quality::run_scorer(self.runner, flutter, &self.ctx.workspace).await?;
        let verdict = quality::evaluate(&report, minimum);
        if let Some(err) = verdict.to_error() {
            for section in &verdict.failing_sections {
                actions::warning(&format!("{}\n\n{}", section.title, section.summary));
            }
            return Err(err);
        }
        info!(granted = verdict.granted, minimum, "pub score test passed");
        Ok(())
    }
}

//! Shared test utilities

#![allow(dead_code)]

mod mock_forge;
mod mock_toolchain;

pub use mock_forge::{AddLabelsCall, DispatchCall, MockForgeService};
pub use mock_toolchain::{CountingDownloader, FakeExtractor, MockRunner, RunCall};

use pub_release::actions::{HostOs, RunContext, RunnerEnv};
use pub_release::types::{RegistryCredentials, ReleaseConfig, RepoConfig, ScoreThreshold};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Pana output scoring `granted` points with one failing section
pub fn pana_report(granted: i64) -> String {
    format!(
        r#"{{"scores":{{"grantedPoints":{granted},"maxPoints":130}},"report":{{"sections":[{{"id":"convention","title":"Follow Dart file conventions","status":"failed","summary":"pubspec.yaml is missing a homepage"}},{{"id":"documentation","title":"Provide documentation","status":"passed","summary":"ok"}}]}}}}"#
    )
}

/// Credentials with recognizable placeholder values
pub fn sample_credentials() -> RegistryCredentials {
    RegistryCredentials {
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        id_token: "id".to_string(),
        token_endpoint: "https://oauth2.googleapis.com/token".to_string(),
        expiration: 1_700_000_000_000,
    }
}

/// A throwaway runner: workspace, home, temp dir and tool cache
pub struct RunnerFixture {
    pub temp: TempDir,
    pub env: RunnerEnv,
    pub ctx: RunContext,
}

impl RunnerFixture {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        for dir in ["workspace", "home", "runner-temp", "tool-cache"] {
            fs::create_dir_all(temp.path().join(dir)).unwrap();
        }

        let env = RunnerEnv::from_pairs([
            ("HOME", path_str(&temp.path().join("home"))),
            ("RUNNER_TEMP", path_str(&temp.path().join("runner-temp"))),
            ("RUNNER_TOOL_CACHE", path_str(&temp.path().join("tool-cache"))),
        ])
        .with_os(HostOs::Linux);

        let ctx = RunContext {
            repo: RepoConfig {
                owner: "owner".to_string(),
                repo: "repo".to_string(),
                api_url: "https://api.github.com".to_string(),
            },
            sha: "abc123".to_string(),
            git_ref: "refs/heads/main".to_string(),
            workspace: temp.path().join("workspace"),
            event_path: None,
        };

        Self { temp, env, ctx }
    }

    pub fn home(&self) -> PathBuf {
        self.temp.path().join("home")
    }

    pub fn tool_cache(&self) -> PathBuf {
        self.temp.path().join("tool-cache")
    }

    /// Where the credentials file lands on this runner
    pub fn credentials_file(&self) -> PathBuf {
        self.home().join(".pub-cache").join("credentials.json")
    }

    /// Write `CHANGELOG.md` into the workspace
    pub fn write_changelog(&self, content: &str) -> PathBuf {
        let path = self.ctx.default_changelog();
        fs::write(&path, content).unwrap();
        path
    }

    /// Configuration releasing the workspace changelog over `previous_version`
    pub fn config(&self, previous_version: &str) -> ReleaseConfig {
        ReleaseConfig {
            previous_version: previous_version.to_string(),
            changelog_file: self.ctx.default_changelog(),
            is_draft: false,
            pre_release_command: None,
            post_release_command: None,
            pre_publish_command: None,
            post_publish_command: None,
            run_score_test: false,
            score_min_points: ScoreThreshold::default(),
            credentials: sample_credentials(),
        }
    }

    /// Mark a toolchain version as completely cached
    pub fn seed_tool_cache(&self, tool: &str, version: &str, arch: &str) -> PathBuf {
        let version_dir = self.tool_cache().join(tool).join(version);
        let install = version_dir.join(arch);
        fs::create_dir_all(install.join("bin")).unwrap();
        fs::write(install.join("bin").join("flutter"), b"#!/bin/sh\n").unwrap();
        fs::write(version_dir.join(format!("{arch}.complete")), b"").unwrap();
        install
    }
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

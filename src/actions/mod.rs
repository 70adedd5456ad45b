//! GitHub Actions runner integration
//!
//! Snapshot of the runner environment, workflow inputs, workflow commands
//! (annotations, `GITHUB_PATH`, `GITHUB_ENV`) and the run context.

mod commands;
mod context;
mod inputs;

pub use commands::{add_path, error, escape_data, export_variable, notice, warning};
pub use context::{RunContext, pull_request_number};
pub use inputs::{InputSource, MapInputs, input_env_name};

use std::collections::HashMap;
use std::path::PathBuf;

/// Operating system family of the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    /// Windows runners
    Windows,
    /// macOS runners
    MacOs,
    /// Linux and anything else
    Linux,
}

impl HostOs {
    /// OS this binary was built for
    pub const fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Linux
        }
    }
}

impl std::fmt::Display for HostOs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Windows => write!(f, "windows"),
            Self::MacOs => write!(f, "macos"),
            Self::Linux => write!(f, "linux"),
        }
    }
}

/// Immutable snapshot of the variables the runner gave this process
///
/// Everything that depends on the environment reads from a snapshot rather
/// than from `std::env`, so one run sees one consistent view and tests can
/// build their own.
#[derive(Debug, Clone)]
pub struct RunnerEnv {
    vars: HashMap<String, String>,
    os: HostOs,
}

impl RunnerEnv {
    /// Capture the current process environment
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
            os: HostOs::current(),
        }
    }

    /// Build a snapshot from explicit pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            os: HostOs::current(),
        }
    }

    /// Override the host OS (for platform-specific paths in tests)
    #[must_use]
    pub const fn with_os(mut self, os: HostOs) -> Self {
        self.os = os;
        self
    }

    /// Host OS
    pub const fn os(&self) -> HostOs {
        self.os
    }

    /// Non-empty value of a variable
    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Variable interpreted as a path
    pub fn path(&self, name: &str) -> Option<PathBuf> {
        self.var(name).map(PathBuf::from)
    }

    /// Home directory (`HOME`, or `USERPROFILE` on Windows)
    pub fn home_dir(&self) -> Option<PathBuf> {
        self.path("HOME")
            .or_else(|| self.path("USERPROFILE"))
            .or_else(dirs::home_dir)
    }

    /// Directory for temporary downloads (`RUNNER_TEMP`)
    pub fn temp_dir(&self) -> PathBuf {
        self.path("RUNNER_TEMP").unwrap_or_else(std::env::temp_dir)
    }
}

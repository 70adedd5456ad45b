//! Subprocess execution and hook commands

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Mutex, MutexGuard};
use tokio::process::Command;
use tracing::{debug, warn};

/// Captured result of a finished program
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code
    pub exit_code: i32,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

/// Runs external programs for the pipeline
///
/// Directories added with [`prepend_path`](Self::prepend_path) and variables
/// set with [`set_env`](Self::set_env) apply to every later `run`.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a program to completion; a non-zero exit is an error
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput>;

    /// Put a directory in front of the search path for later commands
    fn prepend_path(&self, dir: &Path);

    /// Set an environment variable for later commands
    fn set_env(&self, key: &str, value: &str);
}

/// [`CommandRunner`] backed by real processes
#[derive(Debug, Default)]
pub struct SystemRunner {
    working_dir: Option<PathBuf>,
    extra_paths: Mutex<Vec<PathBuf>>,
    extra_env: Mutex<Vec<(String, String)>>,
}

impl SystemRunner {
    /// Runner that executes in the current directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner that executes in `dir`
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: Some(dir.into()),
            ..Self::default()
        }
    }

    fn search_path(&self) -> Result<Option<OsString>> {
        let extra = recover(&self.extra_paths);
        if extra.is_empty() {
            return Ok(None);
        }
        let inherited = std::env::var_os("PATH").unwrap_or_default();
        let joined = std::env::join_paths(
            extra
                .iter()
                .cloned()
                .chain(std::env::split_paths(&inherited)),
        )
        .map_err(|e| Error::Internal(format!("invalid PATH entry: {e}")))?;
        Ok(Some(joined))
    }
}

/// Lock an overlay, taking it over if a previous holder panicked
///
/// Overlays are only ever appended to, so a poisoned lock still guards a
/// usable list.
fn recover<T>(lock: &Mutex<T>) -> MutexGuard<'_, T> {
    lock.lock().unwrap_or_else(|poisoned| {
        warn!("runner overlay lock was poisoned, recovering");
        poisoned.into_inner()
    })
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        anstream::println!("[command]{program} {}", args.join(" "));
        debug!(program, ?args, "running command");

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        if let Some(path) = self.search_path()? {
            command.env("PATH", path);
        }
        {
            let env = recover(&self.extra_env);
            command.envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        let output = command.output().await.map_err(|e| Error::CommandFailed {
            program: program.to_string(),
            code: -1,
            stderr: format!("failed to start: {e}"),
        })?;

        let result = CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };
        anstream::print!("{}", result.stdout);
        anstream::eprint!("{}", result.stderr);
        debug!(program, exit_code = result.exit_code, "command finished");

        if !output.status.success() {
            return Err(Error::CommandFailed {
                program: program.to_string(),
                code: result.exit_code,
                stderr: result.stderr.trim().to_string(),
            });
        }
        Ok(result)
    }

    fn prepend_path(&self, dir: &Path) {
        recover(&self.extra_paths).insert(0, dir.to_path_buf());
    }

    fn set_env(&self, key: &str, value: &str) {
        recover(&self.extra_env).push((key.to_string(), value.to_string()));
    }
}

/// A user-supplied command line split into program and arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookCommand {
    /// Program to run
    pub program: String,
    /// Arguments, in order
    pub args: Vec<String>,
}

impl HookCommand {
    /// Split a command line on whitespace; blank input is no command
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(ToString::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

/// Run an optional hook; absent or blank configuration does nothing
pub async fn run_hook(runner: &dyn CommandRunner, line: Option<&str>) -> Result<()> {
    let Some(hook) = line.and_then(HookCommand::parse) else {
        return Ok(());
    };
    runner.run(&hook.program, &hook.args).await?;
    Ok(())
}

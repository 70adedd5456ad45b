//! Test doubles for subprocesses and toolchain installation

#![allow(dead_code)]

use async_trait::async_trait;
use pub_release::error::{Error, Result};
use pub_release::process::{CommandOutput, CommandRunner};
use pub_release::toolchain::{ArchiveExtractor, ArchiveKind, Downloader};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Call record for `run`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCall {
    pub program: String,
    pub args: Vec<String>,
    /// Whether the watched file existed when the program ran
    pub watched_file_existed: Option<bool>,
}

impl RunCall {
    /// Whether any argument equals `arg`
    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }
}

/// Records programs instead of running them
///
/// Features:
/// - Canned stdout keyed by an argument
/// - Failure injection keyed by an argument
/// - Search path and environment overlay tracking
#[derive(Default)]
pub struct MockRunner {
    calls: Mutex<Vec<RunCall>>,
    responses: Mutex<Vec<(String, String)>>,
    failures: Mutex<Vec<String>>,
    prepended: Mutex<Vec<PathBuf>>,
    env: Mutex<Vec<(String, String)>>,
    watched_file: Mutex<Option<PathBuf>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print `stdout` for calls that have `arg` among their arguments
    pub fn respond_when(&self, arg: &str, stdout: &str) {
        self.responses
            .lock()
            .unwrap()
            .push((arg.to_string(), stdout.to_string()));
    }

    /// Exit with code 1 for calls that have `arg` as program or argument
    pub fn fail_when(&self, arg: &str) {
        self.failures.lock().unwrap().push(arg.to_string());
    }

    /// Record for every call whether `path` exists at that moment
    pub fn watch_file(&self, path: &Path) {
        *self.watched_file.lock().unwrap() = Some(path.to_path_buf());
    }

    pub fn get_calls(&self) -> Vec<RunCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn get_prepended_paths(&self) -> Vec<PathBuf> {
        self.prepended.lock().unwrap().clone()
    }

    pub fn get_env(&self) -> Vec<(String, String)> {
        self.env.lock().unwrap().clone()
    }

    /// Calls that ran `pub publish`
    pub fn publish_calls(&self) -> Vec<RunCall> {
        self.get_calls()
            .into_iter()
            .filter(|c| c.has_arg("publish"))
            .collect()
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let watched_file_existed = self
            .watched_file
            .lock()
            .unwrap()
            .as_ref()
            .map(|p| p.exists());
        self.calls.lock().unwrap().push(RunCall {
            program: program.to_string(),
            args: args.to_vec(),
            watched_file_existed,
        });

        let matches = |key: &String| program == key.as_str() || args.contains(key);
        if self.failures.lock().unwrap().iter().any(matches) {
            return Err(Error::CommandFailed {
                program: program.to_string(),
                code: 1,
                stderr: "injected failure".to_string(),
            });
        }

        let stdout = self
            .responses
            .lock()
            .unwrap()
            .iter()
            .find(|(key, _)| matches(key))
            .map(|(_, out)| out.clone())
            .unwrap_or_default();
        Ok(CommandOutput {
            exit_code: 0,
            stdout,
            stderr: String::new(),
        })
    }

    fn prepend_path(&self, dir: &Path) {
        self.prepended.lock().unwrap().push(dir.to_path_buf());
    }

    fn set_env(&self, key: &str, value: &str) {
        self.env
            .lock()
            .unwrap()
            .push((key.to_string(), value.to_string()));
    }
}

/// Writes a placeholder archive and counts downloads
#[derive(Default)]
pub struct CountingDownloader {
    urls: Mutex<Vec<String>>,
}

impl CountingDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn download_count(&self) -> usize {
        self.urls.lock().unwrap().len()
    }

    pub fn get_urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Downloader for CountingDownloader {
    async fn download(&self, url: &str, dest_dir: &Path) -> Result<PathBuf> {
        self.urls.lock().unwrap().push(url.to_string());
        fs::create_dir_all(dest_dir)?;
        let archive = dest_dir.join("toolchain-archive");
        fs::write(&archive, b"archive")?;
        Ok(archive)
    }
}

/// Unpacks any archive into `<dest>/flutter/bin/flutter`
#[derive(Default)]
pub struct FakeExtractor {
    calls: Mutex<Vec<ArchiveKind>>,
}

impl FakeExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_kinds(&self) -> Vec<ArchiveKind> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArchiveExtractor for FakeExtractor {
    async fn extract(&self, _archive: &Path, kind: ArchiveKind, dest: &Path) -> Result<()> {
        self.calls.lock().unwrap().push(kind);
        let bin = dest.join("flutter").join("bin");
        fs::create_dir_all(&bin)?;
        fs::write(bin.join("flutter"), b"#!/bin/sh\n")?;
        Ok(())
    }
}

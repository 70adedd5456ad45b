//! Build toolchain provisioning
//!
//! Ensures the pinned Flutter SDK is installed, caching it so later runs on
//! the same machine skip the download, and exposes its `bin` directory to
//! later commands and workflow steps.

mod cache;
mod download;
mod extract;

pub use cache::ToolCache;
pub use download::{Downloader, HttpDownloader};
pub use extract::{ArchiveExtractor, SystemExtractor, extract_zip};

use crate::actions::{self, HostOs, RunnerEnv};
use crate::error::{Error, Result};
use crate::process::CommandRunner;
use std::path::{Path, PathBuf};
use tracing::info;

/// Archive format of a toolchain download
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// `.zip`
    Zip,
    /// `.tar`, `.tar.xz`, ...
    Tar,
}

/// A pinned toolchain and where to get it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolchainSpec {
    /// Tool name in the cache
    pub name: &'static str,
    /// Exact version installed on a cache miss
    pub version: &'static str,
    /// Range accepted from the cache
    pub version_range: &'static str,
    /// Directory name the archive unpacks to
    pub dir_name: &'static str,
    /// Variable pointing at the install root
    pub root_var: &'static str,
    /// Windows archive (zip)
    pub windows_url: &'static str,
    /// macOS archive (zip)
    pub macos_url: &'static str,
    /// Linux archive (tar)
    pub linux_url: &'static str,
}

/// Latest stable Flutter at the time of release supporting everything we need
pub const FLUTTER: ToolchainSpec = ToolchainSpec {
    name: "flutter",
    version: "2.0.3",
    version_range: "2.x",
    dir_name: "flutter",
    root_var: "FLUTTER_ROOT",
    windows_url: "https://storage.googleapis.com/flutter_infra/releases/stable/windows/flutter_windows_2.0.3-stable.zip",
    macos_url: "https://storage.googleapis.com/flutter_infra/releases/stable/macos/flutter_macos_2.0.3-stable.zip",
    linux_url: "https://storage.googleapis.com/flutter_infra/releases/stable/linux/flutter_linux_2.0.3-stable.tar.xz",
};

impl ToolchainSpec {
    /// Download URL and archive format for an OS
    pub const fn archive_for(&self, os: HostOs) -> (&'static str, ArchiveKind) {
        match os {
            HostOs::Windows => (self.windows_url, ArchiveKind::Zip),
            HostOs::MacOs => (self.macos_url, ArchiveKind::Zip),
            HostOs::Linux => (self.linux_url, ArchiveKind::Tar),
        }
    }
}

/// Architecture name used in the tool cache layout
pub fn cache_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "x64",
        "aarch64" => "arm64",
        "x86" => "x86",
        other => other,
    }
}

/// An installed toolchain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provisioned {
    /// Install directory
    pub root: PathBuf,
    /// Directory added to the search path
    pub bin_dir: PathBuf,
    /// Whether this run downloaded the toolchain
    pub downloaded: bool,
    os: HostOs,
}

impl Provisioned {
    /// Full path of the `flutter` executable
    pub fn executable(&self) -> PathBuf {
        match self.os {
            HostOs::Windows => self.bin_dir.join("flutter.bat"),
            HostOs::MacOs | HostOs::Linux => self.bin_dir.join("flutter"),
        }
    }

    /// Executable as a program string for [`CommandRunner::run`]
    pub fn program(&self) -> String {
        self.executable().to_string_lossy().to_string()
    }
}

/// Collaborators used to install a toolchain
pub struct Provisioner<'a> {
    /// Runner environment
    pub env: &'a RunnerEnv,
    /// Tool cache
    pub cache: &'a ToolCache,
    /// Archive downloader
    pub downloader: &'a dyn Downloader,
    /// Archive extractor
    pub extractor: &'a dyn ArchiveExtractor,
    /// Runner that later stages use
    pub runner: &'a dyn CommandRunner,
}

impl Provisioner<'_> {
    /// Install `spec` unless a matching version is cached, then put it on `PATH`
    pub async fn provision(&self, spec: &ToolchainSpec) -> Result<Provisioned> {
        let home = self
            .env
            .home_dir()
            .ok_or_else(|| Error::Config("HOME is not set".to_string()))?;
        let root = home.join(spec.dir_name);
        self.export(spec.root_var, &root)?;

        let arch = cache_arch();
        let (install_dir, downloaded) = if let Some(cached) =
            self.cache.find(spec.name, spec.version_range, arch)
        {
            info!(dir = %cached.display(), "using cached {}", spec.name);
            (cached, false)
        } else {
            self.install(spec, &home, &root, arch).await?;
            (root, true)
        };

        let bin_dir = install_dir.join("bin");
        self.runner.prepend_path(&bin_dir);
        actions::add_path(self.env, &bin_dir)?;

        Ok(Provisioned {
            root: install_dir,
            bin_dir,
            downloaded,
            os: self.env.os(),
        })
    }

    async fn install(&self, spec: &ToolchainSpec, home: &Path, root: &Path, arch: &str) -> Result<()> {
        let (url, kind) = spec.archive_for(self.env.os());
        info!(url, version = spec.version, "installing {}", spec.name);

        let archive = self.downloader.download(url, &self.env.temp_dir()).await?;
        self.extractor.extract(&archive, kind, home).await?;
        if !root.is_dir() {
            return Err(Error::Toolchain(format!(
                "archive {url} did not unpack to {}",
                root.display()
            )));
        }

        self.cache.cache_dir(root, spec.name, spec.version, arch)?;
        // Best effort: the archive is only needed for this run
        let _ = std::fs::remove_file(&archive);
        Ok(())
    }

    fn export(&self, name: &str, value: &Path) -> Result<()> {
        let value = value.to_string_lossy();
        self.runner.set_env(name, &value);
        actions::export_variable(self.env, name, &value)
    }
}

//! Local tool cache
//!
//! Same layout as the hosted runners: `<root>/<tool>/<version>/<arch>/`, with
//! a sibling `<arch>.complete` marker written once the copy has finished.

use crate::actions::RunnerEnv;
use crate::error::{Error, Result};
use semver::{Version, VersionReq};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Cache of installed tools keyed by name, version and architecture
#[derive(Debug, Clone)]
pub struct ToolCache {
    root: PathBuf,
}

impl ToolCache {
    /// Cache rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache of this runner (`RUNNER_TOOL_CACHE`), or a per-user cache
    /// directory when running outside a runner
    pub fn from_env(env: &RunnerEnv) -> Result<Self> {
        env.path("RUNNER_TOOL_CACHE")
            .or_else(|| dirs::cache_dir().map(|d| d.join("pub-release").join("tools")))
            .map(Self::new)
            .ok_or_else(|| Error::Config("RUNNER_TOOL_CACHE is not set".to_string()))
    }

    /// Cache root
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn version_dir(&self, tool: &str, version: &str) -> PathBuf {
        self.root.join(tool).join(version)
    }

    fn is_complete(&self, tool: &str, version: &str, arch: &str) -> bool {
        self.version_dir(tool, version)
            .join(format!("{arch}.complete"))
            .is_file()
    }

    /// Completely cached versions of a tool
    pub fn cached_versions(&self, tool: &str, arch: &str) -> Vec<Version> {
        let Ok(entries) = fs::read_dir(self.root.join(tool)) else {
            return Vec::new();
        };
        let mut versions: Vec<Version> = entries
            .filter_map(std::result::Result::ok)
            .filter_map(|e| e.file_name().to_str().map(ToString::to_string))
            .filter(|name| self.is_complete(tool, name, arch))
            .filter_map(|name| Version::parse(&name).ok())
            .collect();
        versions.sort();
        versions
    }

    /// Directory of the highest cached version matching `spec`
    ///
    /// `spec` is an exact version (`2.0.3`) or a range (`2.x`, `>=2, <3`).
    pub fn find(&self, tool: &str, spec: &str, arch: &str) -> Option<PathBuf> {
        let version = if Version::parse(spec).is_ok() {
            spec.to_string()
        } else {
            let req = VersionReq::parse(spec).ok()?;
            self.cached_versions(tool, arch)
                .into_iter()
                .rev()
                .find(|v| req.matches(v))?
                .to_string()
        };

        if self.is_complete(tool, &version, arch) {
            let dir = self.version_dir(tool, &version).join(arch);
            debug!(tool, %version, dir = %dir.display(), "found cached tool");
            Some(dir)
        } else {
            debug!(tool, spec, "tool not cached");
            None
        }
    }

    /// Copy `source` into the cache as `tool`/`version`/`arch`
    ///
    /// Any previous copy is replaced. Returns the cached directory.
    pub fn cache_dir(&self, source: &Path, tool: &str, version: &str, arch: &str) -> Result<PathBuf> {
        if !source.is_dir() {
            return Err(Error::Toolchain(format!(
                "cannot cache {}: not a directory",
                source.display()
            )));
        }
        let version_dir = self.version_dir(tool, version);
        let dest = version_dir.join(arch);
        let marker = version_dir.join(format!("{arch}.complete"));

        if marker.exists() {
            fs::remove_file(&marker)?;
        }
        if dest.exists() {
            fs::remove_dir_all(&dest)?;
        }
        fs::create_dir_all(&dest)?;

        copy_tree(source, &dest)?;
        fs::write(&marker, "")?;
        debug!(tool, version, dest = %dest.display(), "cached tool");
        Ok(dest)
    }
}

/// Recursively copy `source` into existing directory `dest`
fn copy_tree(source: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(source).follow_links(false) {
        let entry = entry.map_err(|e| Error::Toolchain(format!("failed to walk source: {e}")))?;
        let rel = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| Error::Internal(e.to_string()))?;
        if rel.as_os_str().is_empty() {
            continue;
        }
        let target = dest.join(rel);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target)?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path) -> Result<()> {
    let pointee = fs::read_link(link)?;
    std::os::unix::fs::symlink(pointee, target)?;
    Ok(())
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, target: &Path) -> Result<()> {
    fs::copy(link, target)?;
    Ok(())
}

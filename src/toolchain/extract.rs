//! Archive extraction

use super::ArchiveKind;
use crate::error::{Error, Result};
use crate::process::CommandRunner;
use async_trait::async_trait;
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use zip::ZipArchive;

/// Unpacks a downloaded archive
#[async_trait]
pub trait ArchiveExtractor: Send + Sync {
    /// Extract `archive` into `dest`, creating it if needed
    async fn extract(&self, archive: &Path, kind: ArchiveKind, dest: &Path) -> Result<()>;
}

/// Extracts zips in-process and tarballs with the system `tar`
pub struct SystemExtractor<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> SystemExtractor<'a> {
    /// Extractor that runs `tar` through `runner`
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl ArchiveExtractor for SystemExtractor<'_> {
    async fn extract(&self, archive: &Path, kind: ArchiveKind, dest: &Path) -> Result<()> {
        fs::create_dir_all(dest)?;
        debug!(archive = %archive.display(), dest = %dest.display(), ?kind, "extracting");
        match kind {
            ArchiveKind::Zip => {
                let archive = archive.to_path_buf();
                let dest = dest.to_path_buf();
                tokio::task::spawn_blocking(move || extract_zip(&archive, &dest))
                    .await
                    .map_err(|e| Error::Internal(format!("zip extraction task failed: {e}")))?
            }
            ArchiveKind::Tar => {
                let args = vec![
                    "-x".to_string(),
                    "-C".to_string(),
                    dest.to_string_lossy().to_string(),
                    "-f".to_string(),
                    archive.to_string_lossy().to_string(),
                ];
                self.runner.run("tar", &args).await?;
                Ok(())
            }
        }
    }
}

/// Extract a zip archive, refusing entries that escape `dest`
///
/// Symlink entries are recreated as links; their targets must resolve inside
/// `dest` as well.
pub fn extract_zip(archive: &Path, dest: &Path) -> Result<()> {
    let mut zip = ZipArchive::new(File::open(archive)?)?;

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        let rel: PathBuf = entry.enclosed_name().ok_or_else(|| {
            Error::Toolchain(format!("zip-slip attempt detected: {}", entry.name()))
        })?;
        let out = dest.join(&rel);

        if entry.is_dir() {
            fs::create_dir_all(&out)?;
            continue;
        }
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent)?;
        }

        if entry.is_symlink() {
            let target = io::read_to_string(&mut entry)?;
            if !link_stays_inside(&rel, Path::new(&target)) {
                return Err(Error::Toolchain(format!(
                    "zip-slip attempt detected: {} -> {target}",
                    rel.display()
                )));
            }
            create_symlink(&target, &out)?;
            continue;
        }

        let mut file = File::create(&out)?;
        io::copy(&mut entry, &mut file)?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&out, fs::Permissions::from_mode(mode))?;
        }
    }
    Ok(())
}

/// Whether a link at `link` (relative to the archive root) pointing at
/// `target` resolves inside the archive root
fn link_stays_inside(link: &Path, target: &Path) -> bool {
    let mut depth: usize = 0;
    let base = link.parent().unwrap_or_else(|| Path::new(""));
    for component in base.components().chain(target.components()) {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => {
                let Some(up) = depth.checked_sub(1) else {
                    return false;
                };
                depth = up;
            }
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    true
}

#[cfg(unix)]
fn create_symlink(target: &str, link: &Path) -> Result<()> {
    std::os::unix::fs::symlink(target, link)?;
    Ok(())
}

#[cfg(not(unix))]
fn create_symlink(target: &str, link: &Path) -> Result<()> {
    // No unprivileged symlinks; keep the target path as file content
    fs::write(link, target)?;
    Ok(())
}

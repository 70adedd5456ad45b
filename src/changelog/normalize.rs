//! In-place changelog normalization

use crate::error::{Error, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use tracing::debug;

/// Heading prepended so the document always starts with a title
///
/// Without it, a changelog whose first line is a `# <version>` heading would
/// have that version consumed as the document title.
pub const FAKE_HEADING: &str = "# Fake Heading\n\n";

/// Paths normalized by this process
fn normalized_paths() -> &'static Mutex<HashSet<PathBuf>> {
    static PATHS: OnceLock<Mutex<HashSet<PathBuf>>> = OnceLock::new();
    PATHS.get_or_init(|| Mutex::new(HashSet::new()))
}

/// Prepend [`FAKE_HEADING`] to the file at `path`
///
/// Reads the whole file, then writes the heading followed by the original
/// content back to the same path. Each path is normalized at most once per
/// process; a second attempt fails instead of stacking headings.
pub fn normalize(path: &Path) -> Result<()> {
    let canonical = fs::canonicalize(path)
        .map_err(|e| Error::Changelog(format!("failed to open {}: {e}", path.display())))?;

    let mut seen = normalized_paths()
        .lock()
        .map_err(|_| Error::Internal("changelog registry lock poisoned".to_string()))?;
    if seen.contains(&canonical) {
        return Err(Error::Changelog(format!(
            "{} was already normalized in this run",
            path.display()
        )));
    }

    let original = fs::read_to_string(&canonical)
        .map_err(|e| Error::Changelog(format!("failed to read {}: {e}", path.display())))?;
    fs::write(&canonical, format!("{FAKE_HEADING}{original}"))
        .map_err(|e| Error::Changelog(format!("failed to write {}: {e}", path.display())))?;

    seen.insert(canonical);
    debug!(path = %path.display(), "normalized changelog");
    Ok(())
}

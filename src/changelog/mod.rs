//! Changelog reading
//!
//! A changelog is normalized once (a synthetic title heading is prepended in
//! place) and then parsed into version sections, newest first.

mod normalize;
mod parse;

pub use normalize::{FAKE_HEADING, normalize};
pub use parse::parse;

use crate::error::{Error, Result};
use crate::types::ChangelogEntry;
use chrono::NaiveDate;
use std::fs;
use std::path::Path;

/// One version section of a changelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSection {
    /// Heading text without the leading `#`s
    pub heading: String,
    /// Version found in the heading, if any
    pub version: Option<String>,
    /// Release date found in the heading, if any
    pub date: Option<NaiveDate>,
    /// Section body, trimmed
    pub body: String,
}

/// Parsed changelog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changelog {
    /// Document title (the first top-level heading)
    pub title: Option<String>,
    /// Version sections, in document order (newest first)
    pub versions: Vec<VersionSection>,
}

impl Changelog {
    /// The newest section as a release entry
    ///
    /// Fails when the changelog has no sections or the newest one has no
    /// recognizable version.
    pub fn latest_entry(&self) -> Result<ChangelogEntry> {
        let section = self
            .versions
            .first()
            .ok_or_else(|| Error::Changelog("no version sections found".to_string()))?;
        let version = section.version.clone().ok_or_else(|| {
            Error::Changelog(format!(
                "newest section `{}` has no version number",
                section.heading
            ))
        })?;
        Ok(ChangelogEntry {
            version,
            body: section.body.clone(),
        })
    }
}

/// Normalize the changelog at `path`, then parse it and return its newest entry
pub fn read_latest_entry(path: &Path) -> Result<ChangelogEntry> {
    normalize(path)?;
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Changelog(format!("failed to read {}: {e}", path.display())))?;
    parse(&content).latest_entry()
}

//! Release gate

use crate::changelog::read_latest_entry;
use crate::error::Result;
use crate::types::{ChangelogEntry, ReleaseConfig, ReleaseDecision};
use tracing::info;

/// Decide whether `entry` is a new release (PURE)
///
/// A version equal to the previous release is never released again.
pub fn decide(entry: ChangelogEntry, previous_version: &str) -> ReleaseDecision {
    if entry.version == previous_version {
        ReleaseDecision::Skip {
            version: entry.version,
        }
    } else {
        ReleaseDecision::Proceed(entry)
    }
}

/// Normalize and parse the configured changelog, then decide
pub fn release_gate(config: &ReleaseConfig) -> Result<ReleaseDecision> {
    let entry = read_latest_entry(&config.changelog_file)?;
    info!(
        latest = %entry.version,
        previous = %config.previous_version,
        "read changelog"
    );
    Ok(decide(entry, &config.previous_version))
}

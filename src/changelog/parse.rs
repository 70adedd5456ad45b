//! Changelog grammar
//!
//! The first `# ` heading is the title. Every later `#` or `##` heading opens
//! a version section whose body runs until the next such heading. Deeper
//! headings (`###`) belong to the body. Link reference definitions are
//! dropped.

use super::{Changelog, VersionSection};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static LINK_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[[^\[\]]*\] *?:").expect("valid regex"));
static TITLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^# ?[^#]").expect("valid regex"));
static SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^##? ?[^#]").expect("valid regex"));
static VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[?v?([\w.-]+\.[\w.-]+[a-zA-Z0-9])\]?").expect("valid regex")
});
static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4}-\d{2}-\d{2})").expect("valid regex"));

struct SectionBuilder {
    heading: String,
    lines: Vec<String>,
}

impl SectionBuilder {
    fn finish(self) -> VersionSection {
        let version = VERSION
            .captures(&self.heading)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());
        let date = DATE
            .captures(&self.heading)
            .and_then(|c| c.get(1))
            .and_then(|m| NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").ok());
        VersionSection {
            heading: self.heading,
            version,
            date,
            body: self.lines.join("\n").trim().to_string(),
        }
    }
}

/// Parse changelog text into title and version sections
pub fn parse(content: &str) -> Changelog {
    let mut changelog = Changelog::default();
    let mut current: Option<SectionBuilder> = None;

    for line in content.lines() {
        if LINK_LABEL.is_match(line) {
            continue;
        }

        if changelog.title.is_none() && TITLE.is_match(line) {
            changelog.title = Some(line[1..].trim().to_string());
            continue;
        }

        if SECTION.is_match(line) {
            if let Some(done) = current.take() {
                changelog.versions.push(done.finish());
            }
            current = Some(SectionBuilder {
                heading: line.trim_start_matches('#').trim().to_string(),
                lines: Vec::new(),
            });
            continue;
        }

        if let Some(section) = current.as_mut() {
            section.lines.push(line.to_string());
        }
    }

    if let Some(done) = current {
        changelog.versions.push(done.finish());
    }
    changelog
}

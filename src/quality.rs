//! Package quality score (pana) gate

use crate::actions;
use crate::config::input;
use crate::error::{Error, Result};
use crate::forge::ForgeService;
use crate::process::CommandRunner;
use crate::types::{CheckConclusion, CheckRun, ScoreThreshold};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Name of the check run posted by the pre-check
pub const PRE_CHECK_NAME: &str = "Release Pre-Check";

/// Placeholder line some scorer versions print instead of output
const PLACEHOLDER_LINE: &str = "undefined";

/// Section status meaning the check passed
pub const STATUS_PASSED: &str = "passed";

/// One report section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportSection {
    /// Section title
    pub title: String,
    /// `passed`, `partial` or `failed`
    pub status: String,
    /// Markdown summary
    #[serde(default)]
    pub summary: String,
}

impl ReportSection {
    /// Whether this section passed
    pub fn passed(&self) -> bool {
        self.status == STATUS_PASSED
    }
}

/// Parsed scorer output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityReport {
    /// Points granted
    pub granted_points: i64,
    /// Points available, when reported
    pub max_points: Option<i64>,
    /// Sections in report order
    pub sections: Vec<ReportSection>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReport {
    scores: RawScores,
    report: RawSections,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawScores {
    granted_points: i64,
    max_points: Option<i64>,
}

#[derive(Deserialize)]
struct RawSections {
    #[serde(default)]
    sections: Vec<ReportSection>,
}

impl From<RawReport> for QualityReport {
    fn from(raw: RawReport) -> Self {
        Self {
            granted_points: raw.scores.granted_points,
            max_points: raw.scores.max_points,
            sections: raw.report.sections,
        }
    }
}

/// Parse the scorer's stdout
///
/// Empty and placeholder lines are discarded. The last remaining line is the
/// report; if it is not a complete document on its own the remaining text is
/// parsed as a whole (pretty-printed output).
pub fn parse_report(output: &str) -> Result<QualityReport> {
    let lines: Vec<&str> = output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && *l != PLACEHOLDER_LINE)
        .collect();

    let last = lines
        .last()
        .ok_or_else(|| Error::QualityReport("scorer produced no output".to_string()))?;

    let raw: RawReport = match serde_json::from_str(last) {
        Ok(raw) => raw,
        Err(_) => serde_json::from_str(&lines.join("\n"))
            .map_err(|e| Error::QualityReport(format!("unreadable scorer output: {e}")))?,
    };
    Ok(raw.into())
}

/// Result of applying the minimum-score policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateVerdict<'a> {
    /// Points granted
    pub granted: i64,
    /// Required minimum
    pub minimum: i64,
    /// Sections whose status is not `passed`
    pub failing_sections: Vec<&'a ReportSection>,
}

impl GateVerdict<'_> {
    /// Whether the score reaches the minimum
    pub const fn passed(&self) -> bool {
        self.granted >= self.minimum
    }

    /// The gate failure as an error, if the gate failed
    pub fn to_error(&self) -> Option<Error> {
        if self.passed() {
            None
        } else {
            Some(Error::QualityGate {
                granted: self.granted,
                minimum: self.minimum,
            })
        }
    }
}

/// Apply the minimum-score policy to a report
pub fn evaluate(report: &QualityReport, minimum: i64) -> GateVerdict<'_> {
    GateVerdict {
        granted: report.granted_points,
        minimum,
        failing_sections: report.sections.iter().filter(|s| !s.passed()).collect(),
    }
}

/// Markdown rendering of every section, for check-run output
pub fn render_sections(report: &QualityReport) -> String {
    report
        .sections
        .iter()
        .map(|s| {
            let mark = if s.passed() { "✅" } else { "⚠️" };
            format!("## {mark} {}\n\n{}", s.title, s.summary)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// `granted/max`, or just `granted` when the maximum is unknown
pub fn score_label(report: &QualityReport) -> String {
    report.max_points.map_or_else(
        || report.granted_points.to_string(),
        |max| format!("{}/{max}", report.granted_points),
    )
}

/// Check run describing a report against `minimum`, plus the gate error
/// when the score falls short
pub fn pre_check_run(
    report: &QualityReport,
    minimum: i64,
    head_sha: &str,
) -> (CheckRun, Option<Error>) {
    let score = score_label(report);
    let failure = evaluate(report, minimum).to_error();
    let (conclusion, summary) = match &failure {
        None => (
            CheckConclusion::Success,
            format!("Pub score of {score} meets the minimum of {minimum}"),
        ),
        Some(err) => (CheckConclusion::Failure, err.to_string()),
    };

    let check = CheckRun {
        name: PRE_CHECK_NAME.to_string(),
        head_sha: head_sha.to_string(),
        conclusion,
        title: format!("Logs for Pre-Check: {score}"),
        summary,
        text: render_sections(report),
    };
    (check, failure)
}

/// Score `workspace`, post the findings as a check run on `head_sha` and
/// enforce the minimum
///
/// The threshold is validated before anything runs. The check run is posted
/// whether or not the gate passes.
pub async fn run_pre_check(
    runner: &dyn CommandRunner,
    forge: &dyn ForgeService,
    flutter: &str,
    workspace: &Path,
    head_sha: &str,
    threshold: &ScoreThreshold,
) -> Result<QualityReport> {
    let minimum = threshold
        .minimum()?
        .ok_or_else(|| Error::MissingInput(input::PUB_SCORE_MIN_POINTS.to_string()))?;

    let report = run_scorer(runner, flutter, workspace).await?;
    for section in &report.sections {
        if section.passed() {
            anstream::println!("{}\n{}", section.title, section.summary);
        } else {
            actions::warning(&format!("{}\n\n{}", section.title, section.summary));
        }
    }

    let (check, failure) = pre_check_run(&report, minimum, head_sha);
    forge.create_check_run(&check).await?;
    info!(conclusion = ?check.conclusion, "posted pre-check run");

    match failure {
        Some(err) => Err(err),
        None => Ok(report),
    }
}

/// Install and run the scorer against `workspace` with the given toolchain
pub async fn run_scorer(
    runner: &dyn CommandRunner,
    flutter: &str,
    workspace: &Path,
) -> Result<QualityReport> {
    info!("activating pana");
    runner
        .run(flutter, &args(&["pub", "global", "activate", "pana"]))
        .await?;

    info!(workspace = %workspace.display(), "running pana");
    let workspace = workspace.to_string_lossy().to_string();
    let output = runner
        .run(
            flutter,
            &args(&[
                "pub",
                "global",
                "run",
                "pana",
                workspace.as_str(),
                "--json",
                "--no-warning",
            ]),
        )
        .await?;

    let report = parse_report(&output.stdout)?;
    debug!(
        granted = report.granted_points,
        sections = report.sections.len(),
        "parsed pana report"
    );
    Ok(report)
}

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"{"scores":{"grantedPoints":40,"maxPoints":130},"report":{"sections":[{"id":"convention","title":"Follow Dart file conventions","grantedPoints":10,"maxPoints":30,"status":"failed","summary":"pubspec.yaml is missing a homepage"},{"id":"documentation","title":"Provide documentation","grantedPoints":10,"maxPoints":10,"status":"passed","summary":"ok"},{"id":"platform","title":"Platform support","grantedPoints":10,"maxPoints":20,"status":"partial","summary":"Web not supported"}]}}"#;

    #[test]
    fn test_parse_report_skips_placeholder_and_progress_lines() {
        let output = format!("Activated pana.\n\nundefined\n{REPORT}\n\n");
        let report = parse_report(&output).unwrap();
        assert_eq!(report.granted_points, 40);
        assert_eq!(report.max_points, Some(130));
        assert_eq!(report.sections.len(), 3);
        assert_eq!(report.sections[0].title, "Follow Dart file conventions");
    }

    #[test]
    fn test_parse_pretty_printed_report() {
        let pretty = serde_json::to_string_pretty(
            &serde_json::from_str::<serde_json::Value>(REPORT).unwrap(),
        )
        .unwrap();
        let report = parse_report(&pretty).unwrap();
        assert_eq!(report.granted_points, 40);
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(matches!(
            parse_report("\n\nundefined\n"),
            Err(Error::QualityReport(_))
        ));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_report("not json at all"),
            Err(Error::QualityReport(_))
        ));
    }

    #[test]
    fn test_evaluate_below_minimum_lists_every_non_passing_section() {
        let report = parse_report(REPORT).unwrap();
        let verdict = evaluate(&report, 50);

        assert!(!verdict.passed());
        let titles: Vec<&str> = verdict
            .failing_sections
            .iter()
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(
            titles,
            vec!["Follow Dart file conventions", "Platform support"]
        );
        match verdict.to_error() {
            Some(Error::QualityGate { granted, minimum }) => {
                assert_eq!((granted, minimum), (40, 50));
            }
            other => panic!("Expected QualityGate, got: {other:?}"),
        }
    }

    #[test]
    fn test_evaluate_above_minimum_passes() {
        let mut report = parse_report(REPORT).unwrap();
        report.granted_points = 60;
        let verdict = evaluate(&report, 50);
        assert!(verdict.passed());
        assert!(verdict.to_error().is_none());
    }

    #[test]
    fn test_evaluate_equal_to_minimum_passes() {
        let report = parse_report(REPORT).unwrap();
        assert!(evaluate(&report, 40).passed());
    }

    #[test]
    fn test_gate_error_message() {
        let err = Error::QualityGate {
            granted: 40,
            minimum: 50,
        };
        assert_eq!(
            err.to_string(),
            "Pub score test failed. Achieved score of 40 is less than expected minimum score of 50"
        );
    }

    #[test]
    fn test_pre_check_run_below_minimum() {
        let report = parse_report(REPORT).unwrap();
        let (check, failure) = pre_check_run(&report, 50, "abc123");

        assert_eq!(check.name, "Release Pre-Check");
        assert_eq!(check.head_sha, "abc123");
        assert_eq!(check.conclusion, CheckConclusion::Failure);
        assert_eq!(check.title, "Logs for Pre-Check: 40/130");
        assert!(check.summary.contains("expected minimum score of 50"));
        assert!(check.text.contains("Platform support"));
        assert!(matches!(
            failure,
            Some(Error::QualityGate {
                granted: 40,
                minimum: 50
            })
        ));
    }

    #[test]
    fn test_pre_check_run_without_max_points() {
        let mut report = parse_report(REPORT).unwrap();
        report.max_points = None;
        let (check, failure) = pre_check_run(&report, 30, "abc123");

        assert_eq!(check.conclusion, CheckConclusion::Success);
        assert_eq!(check.title, "Logs for Pre-Check: 40");
        assert_eq!(check.summary, "Pub score of 40 meets the minimum of 30");
        assert!(failure.is_none());
    }

    #[test]
    fn test_render_sections() {
        let report = parse_report(REPORT).unwrap();
        let rendered = render_sections(&report);
        assert!(rendered.contains("## ⚠️ Follow Dart file conventions"));
        assert!(rendered.contains("## ✅ Provide documentation\n\nok"));
    }
}

//! Label command - mark revert and release pull requests

use crate::cli::CommandContext;
use crate::cli::style::{Stylize, arrow, check};
use anstream::println;
use pub_release::actions::{self, pull_request_number};
use pub_release::error::{Error, Result};
use pub_release::labeler::{ReleasePolicy, apply_labels, gather_signal, plan_labels};

/// Options for the label command
#[derive(Debug, Clone, Default)]
pub struct LabelOptions {
    /// How release PRs are recognized
    pub policy: ReleasePolicy,
    /// Workflow to dispatch for release PRs
    pub workflow: Option<String>,
}

/// Run the label command against the PR of the triggering event
pub async fn run_label(options: LabelOptions) -> Result<()> {
    let ctx = CommandContext::new().await?;
    let event_path = ctx
        .run
        .event_path
        .as_deref()
        .ok_or_else(|| Error::Config("GITHUB_EVENT_PATH is not set".to_string()))?;
    let pr_number = pull_request_number(event_path)?;

    let signal = gather_signal(ctx.forge.as_ref(), pr_number, &options.policy).await?;
    let plan = plan_labels(&signal, &options.policy, options.workflow.as_deref());
    if plan.release && options.workflow.is_none() {
        actions::notice("Release PR detected but no workflow was given to dispatch");
    }
    if plan.is_empty() {
        println!("{}", format!("PR #{pr_number}: nothing to label").muted());
        return Ok(());
    }

    let outcome = apply_labels(ctx.forge.as_ref(), pr_number, &plan, &ctx.run.git_ref).await?;
    println!("{} Labeled PR #{}", check(), pr_number.accent());
    for label in &outcome.labels {
        println!("  {} {label}", arrow());
    }
    if let Some(workflow) = &outcome.dispatched {
        println!(
            "  {} dispatched {} at {}",
            arrow(),
            workflow.accent(),
            ctx.run.git_ref.muted()
        );
    }

    Ok(())
}

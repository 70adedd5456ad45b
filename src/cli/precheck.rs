//! Pre-check command - report the pub score on a commit

use crate::cli::CommandContext;
use crate::cli::style::{Stylize, check};
use anstream::println;
use pub_release::actions::InputSource;
use pub_release::config::input;
use pub_release::error::Result;
use pub_release::process::SystemRunner;
use pub_release::quality::{run_pre_check, score_label};
use pub_release::toolchain::{FLUTTER, HttpDownloader, Provisioner, SystemExtractor, ToolCache};
use pub_release::types::ScoreThreshold;

/// Run the scorer, post a check run with its findings and enforce the minimum
pub async fn run_precheck() -> Result<()> {
    let ctx = CommandContext::new().await?;
    let threshold = ScoreThreshold::new(ctx.env.get(input::PUB_SCORE_MIN_POINTS));
    // Reject a bad threshold before downloading a toolchain
    threshold.minimum()?;

    let runner = SystemRunner::in_dir(&ctx.run.workspace);
    let cache = ToolCache::from_env(&ctx.env)?;
    let downloader = HttpDownloader::new()?;
    let extractor = SystemExtractor::new(&runner);
    let provisioner = Provisioner {
        env: &ctx.env,
        cache: &cache,
        downloader: &downloader,
        extractor: &extractor,
        runner: &runner,
    };
    let toolchain = provisioner.provision(&FLUTTER).await?;

    let report = run_pre_check(
        &runner,
        ctx.forge.as_ref(),
        &toolchain.program(),
        &ctx.run.workspace,
        &ctx.run.sha,
        &threshold,
    )
    .await?;

    println!("{} Pub score {}", check(), score_label(&report).accent());
    Ok(())
}

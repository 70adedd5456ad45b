//! Release command - publish the newest changelog version

use crate::cli::CommandContext;
use crate::cli::style::{Stylize, arrow, check, spinner_style};
use anstream::println;
use indicatif::ProgressBar;
use pub_release::config::resolve_release_config;
use pub_release::error::Result;
use pub_release::pipeline::{Pipeline, PipelineOutcome};
use pub_release::process::SystemRunner;
use pub_release::toolchain::{FLUTTER, HttpDownloader, Provisioner, SystemExtractor, ToolCache};
use std::time::Duration;

/// Run the release command
pub async fn run_release(dry_run: bool) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message("Resolving release configuration...");

    let ctx = CommandContext::new().await?;
    let config = resolve_release_config(&ctx.env, &ctx.run, ctx.forge.as_ref()).await;
    spinner.finish_and_clear();
    let config = config?;

    let runner = SystemRunner::in_dir(&ctx.run.workspace);
    let cache = ToolCache::from_env(&ctx.env)?;
    let downloader = HttpDownloader::new()?;
    let extractor = SystemExtractor::new(&runner);

    let pipeline = Pipeline {
        ctx: &ctx.run,
        env: &ctx.env,
        forge: ctx.forge.as_ref(),
        runner: &runner,
        provisioner: Provisioner {
            env: &ctx.env,
            cache: &cache,
            downloader: &downloader,
            extractor: &extractor,
            runner: &runner,
        },
        toolchain: FLUTTER,
    };

    match pipeline.run(&config, dry_run).await? {
        PipelineOutcome::Skipped { version } => {
            println!(
                "{} {} {}",
                "Nothing to release:".caution(),
                version.accent(),
                "is already released".muted()
            );
        }
        PipelineOutcome::Planned { version, steps } => {
            println!(
                "{} {}",
                "Release plan for".emphasis(),
                version.accent()
            );
            for step in &steps {
                println!("  {} {step}", arrow());
            }
            println!();
            println!("{}", "Dry run: no changes made".muted());
        }
        PipelineOutcome::Published {
            version,
            release,
            toolchain_downloaded,
        } => {
            let toolchain = if toolchain_downloaded {
                "downloaded"
            } else {
                "cached"
            };
            println!(
                "{} Published {} {}",
                check(),
                version.accent(),
                format!("(toolchain {toolchain})").muted()
            );
            println!("  {} {}", arrow(), release.html_url);
        }
    }

    Ok(())
}

//! pub-release - changelog-driven package releases for GitHub Actions

mod cli;

use clap::{Parser, Subcommand, ValueEnum};
use pub_release::actions;
use pub_release::error::Result;
use pub_release::labeler::ReleasePolicy;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pub-release")]
#[command(version)]
#[command(about = "Release and publish a Dart/Flutter package from its changelog")]
struct Cli {
    /// Show debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a release for a new changelog version and publish it to pub.dev
    Release {
        /// Show the steps without running them
        #[arg(long)]
        dry_run: bool,
    },
    /// Label the pull request of the triggering event
    Label {
        /// How release pull requests are recognized
        #[arg(long, value_enum, default_value_t = PolicyArg::TitleOrCommits)]
        policy: PolicyArg,

        /// File that must change in a release PR (repeatable)
        #[arg(long = "required-file", value_name = "PATH")]
        required_files: Vec<String>,

        /// Workflow to dispatch when a release PR is labeled
        #[arg(long, value_name = "ID")]
        workflow: Option<String>,
    },
    /// Score the package and report the result as a check run
    PreCheck,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Title contains `Release` or a commit message starts with `release…:`
    TitleOrCommits,
    /// Every `--required-file` is changed by the PR
    RequiredFiles,
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "pub_release=debug"
    } else {
        "pub_release=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Release { dry_run } => cli::run_release(dry_run).await,
        Commands::Label {
            policy,
            required_files,
            workflow,
        } => {
            let policy = match policy {
                PolicyArg::TitleOrCommits => ReleasePolicy::TitleOrCommits,
                PolicyArg::RequiredFiles => ReleasePolicy::RequiredFiles(required_files),
            };
            cli::run_label(cli::LabelOptions { policy, workflow }).await
        }
        Commands::PreCheck => cli::run_precheck().await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            actions::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

//! herald - merge a branch with a tracker-enriched commit message

mod cli;

use anyhow::Context as _;
use clap::{CommandFactory, Parser};
use merge_herald::host;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Merge a source branch into a target branch, composing the commit
/// message and release notes from issue-tracker metadata
#[derive(Parser, Debug)]
#[command(name = "herald", version)]
struct Args {
    /// Report everything without mutating the repository
    #[arg(short = 'd', long)]
    dry_run: bool,

    /// Path to the git repository (defaults to the current directory)
    #[arg(short = 'r', long, value_name = "PATH")]
    repo_path: Option<PathBuf>,

    /// Branch to merge from
    source_branch: Option<String>,

    /// Branch to merge into
    target_branch: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = init_tracing() {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    let outcome = if host::running_under_host() {
        cli::run_host().await
    } else {
        let args = Args::parse();
        let (Some(source), Some(target)) = (args.source_branch, args.target_branch) else {
            let _ = Args::command().print_help();
            return ExitCode::FAILURE;
        };
        cli::run(cli::RunOptions {
            source,
            target,
            dry_run: args.dry_run,
            repo_path: args.repo_path,
        })
        .await
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Route log events to stderr, keeping stdout for command output
fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("failed to initialize logging")
}

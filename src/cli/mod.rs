//! Command-line entry points
//!
//! A thin shell over the library pipeline: wire collaborators from
//! configuration, run once, and render the report. The host mode swaps
//! terminal rendering for structured outputs.

mod context;
pub mod style;

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check, spinner_style};
use anstream::println;
use indicatif::ProgressBar;
use merge_herald::config::Config;
use merge_herald::error::Result;
use merge_herald::host;
use merge_herald::pipeline::{Pipeline, PipelineReport};
use std::path::PathBuf;
use std::time::Duration;

/// Options for a shell-invoked run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Branch to merge from
    pub source: String,
    /// Branch to merge into
    pub target: String,
    /// Report without mutating the repository
    pub dry_run: bool,
    /// Repository path override
    pub repo_path: Option<PathBuf>,
}

/// Run the merge pipeline for a shell invocation
///
/// Returns whether the pipeline succeeded; the caller maps that to the
/// process exit code.
pub async fn run(options: RunOptions) -> Result<bool> {
    let mut config = Config::from_env()?;
    if options.dry_run {
        config.dry_run = true;
    }
    if let Some(repo_path) = options.repo_path {
        config.repo_path = repo_path;
    }

    let ctx = CommandContext::new(&config)?;

    println!(
        "{} {} into {}",
        "Merging".emphasis(),
        options.source.accent(),
        options.target.accent()
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message("Running merge pipeline...");
    spinner.enable_steady_tick(Duration::from_millis(80));

    let pipeline = Pipeline::new(&config, &ctx.git, ctx.tracker_ref(), &ctx.notifiers);
    let report = pipeline.run(&options.source, &options.target).await;

    spinner.finish_and_clear();

    if report.success {
        if config.dry_run {
            report_dry_run(&report);
        } else {
            report_success(&report);
        }
    } else {
        report_failure(&report);
    }
    print_notification_outcomes(&report);

    Ok(report.success)
}

/// Run under the automation host, reading inputs and writing outputs
pub async fn run_host() -> Result<bool> {
    let config = host::config_from_inputs()?;
    let (source, target) = host::branch_inputs()?;

    let ctx = CommandContext::new(&config)?;
    let pipeline = Pipeline::new(&config, &ctx.git, ctx.tracker_ref(), &ctx.notifiers);
    let report = pipeline.run(&source, &target).await;

    host::write_outputs(&report)?;
    Ok(report.success)
}

/// Report what would be run (dry run)
fn report_dry_run(report: &PipelineReport) {
    println!("{}:", "Merge plan".emphasis());
    println!();

    if let Some(plan) = &report.plan {
        for line in plan.step_lines() {
            println!("  {} {}", "Would run".success(), line.accent());
        }
    }
    println!();

    if let Some(message) = &report.commit_message {
        println!("{}:", "Commit message".emphasis());
        for line in message.lines() {
            println!("  {}", line.muted());
        }
        println!();
    }

    println!("{}", "Run without --dry-run to execute.".muted());
}

fn report_success(report: &PipelineReport) {
    println!();
    println!("{} Merge complete!", check());
    if !report.issue_keys.is_empty() {
        let keys: Vec<String> = report.issue_keys.iter().map(ToString::to_string).collect();
        println!("   Issues: {}", keys.join(", ").accent());
    }
}

fn report_failure(report: &PipelineReport) {
    println!();
    println!("{} {}", "✗".warn(), "Merge failed".emphasis());
    if let Some(error) = &report.error {
        println!("   {}", error.muted());
    }
}

fn print_notification_outcomes(report: &PipelineReport) {
    for outcome in &report.notifications {
        if outcome.delivered() {
            println!("   {} {} notified", check(), outcome.channel);
        } else if let Some(error) = &outcome.error {
            println!(
                "   {} {} delivery failed: {}",
                "⚠".warn(),
                outcome.channel,
                error.muted()
            );
        }
    }
}

//! Automation-host integration
//!
//! When launched by a CI host, branch names and configuration are read
//! from `INPUT_*` variables instead of the regular environment surface,
//! and run results are appended to the output file the host points at.
//! The pipeline itself stays host-agnostic.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::pipeline::PipelineReport;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::Path;
use tracing::debug;

/// Variable that marks a host-managed run
const HOST_MARKER: &str = "GITHUB_ACTIONS";
/// Variable pointing at the structured-output file
const OUTPUT_FILE_VAR: &str = "GITHUB_OUTPUT";

/// Whether the process was launched by the automation host
pub fn running_under_host() -> bool {
    std::env::var(HOST_MARKER).is_ok_and(|value| value == "true")
}

/// Host input variable for a configuration key
///
/// Inputs are declared without the `GIT_` prefix the environment surface
/// uses for the strategy, hence the single remapping.
fn input_var(key: &str) -> String {
    let name = match key {
        "GIT_MERGE_STRATEGY" => "MERGE_STRATEGY",
        other => other,
    };
    format!("INPUT_{name}")
}

/// Load configuration from host inputs
pub fn config_from_inputs() -> Result<Config> {
    Config::from_lookup(|key| std::env::var(input_var(key)).ok())
}

/// Read the required source and target branch inputs
pub fn branch_inputs() -> Result<(String, String)> {
    Ok((
        require_input("SOURCE_BRANCH")?,
        require_input("TARGET_BRANCH")?,
    ))
}

fn require_input(name: &str) -> Result<String> {
    std::env::var(format!("INPUT_{name}"))
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| {
            Error::Config(format!(
                "missing required input '{}'",
                name.to_ascii_lowercase()
            ))
        })
}

/// Report run results back to the host
///
/// A missing output file is not an error; the results are simply not
/// exported.
pub fn write_outputs(report: &PipelineReport) -> Result<()> {
    let Ok(path) = std::env::var(OUTPUT_FILE_VAR) else {
        debug!("no host output file configured, skipping outputs");
        return Ok(());
    };
    write_outputs_to(Path::new(&path), report)
}

fn write_outputs_to(path: &Path, report: &PipelineReport) -> Result<()> {
    let block = render_outputs(report)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(block.as_bytes())?;
    Ok(())
}

fn render_outputs(report: &PipelineReport) -> Result<String> {
    let keys_json = serde_json::to_string(&report.issue_keys)
        .map_err(|e| Error::Host(format!("failed to serialize issue keys: {e}")))?;

    let mut block = String::new();
    block.push_str(&format!("success={}\n", report.success));
    block.push_str(&format!("issue-keys={keys_json}\n"));
    if let Some(message) = &report.commit_message {
        block.push_str(&multiline_output("commit-message", message));
    }
    if let Some(error) = &report.error {
        block.push_str(&multiline_output("error", error));
    }
    Ok(block)
}

/// Heredoc encoding for values that may span lines; the delimiter is
/// lengthened until it does not occur in the value
fn multiline_output(name: &str, value: &str) -> String {
    let mut delimiter = String::from("EOF");
    while value.contains(&delimiter) {
        delimiter.push('_');
    }
    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
}

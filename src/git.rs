//! Git command execution and commit-range discovery
//!
//! Git is treated as a black-box command executor behind the [`GitRunner`]
//! trait, so the merge executor and the discovery queries can be exercised
//! against scripted doubles in tests.

use crate::error::{Error, Result};
use crate::types::Commit;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

/// Field separator in machine-parsable log output
const FIELD_SEP: char = '\u{1f}';
/// Record separator between log entries
const RECORD_SEP: char = '\u{1e}';

/// Captured output of one git invocation
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// Raw standard output
    pub stdout: String,
    /// Raw standard error
    pub stderr: String,
    /// Whether the process exited zero
    pub success: bool,
}

impl From<Output> for GitOutput {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
        }
    }
}

/// Trait for executing git commands (allows scripting in tests)
#[async_trait]
pub trait GitRunner: Send + Sync {
    /// Run git with the given arguments, capturing output
    async fn run(&self, args: &[&str]) -> Result<GitOutput>;

    /// Run git and return stdout, mapping a non-zero exit to [`Error::Git`]
    async fn run_checked(&self, args: &[&str]) -> Result<String> {
        let output = self.run(args).await?;
        if output.success {
            Ok(output.stdout)
        } else {
            Err(Error::Git(format!(
                "git {} failed: {}",
                args.join(" "),
                output.stderr.trim()
            )))
        }
    }
}

/// Real git executor rooted at a repository path
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_path: PathBuf,
}

impl GitCli {
    /// Create an executor for the given repository path
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
        }
    }
}

#[async_trait]
impl GitRunner for GitCli {
    async fn run(&self, args: &[&str]) -> Result<GitOutput> {
        debug!(repo = %self.repo_path.display(), "running git {:?}", args);

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()
            .await
            .map_err(|e| Error::Git(format!("failed to execute git: {e}")))?;

        let git_output = GitOutput::from(output);
        if !git_output.success {
            debug!("git command failed: {}", git_output.stderr.trim());
        }
        Ok(git_output)
    }
}

/// Whether `path` contains version-control metadata (a `.git` entry)
pub fn is_git_repo(path: &Path) -> bool {
    path.join(".git").exists()
}

/// Resolve the merge-base commit of `target` and `source`
pub async fn merge_base(git: &dyn GitRunner, target: &str, source: &str) -> Result<String> {
    let stdout = git.run_checked(&["merge-base", target, source]).await?;
    let base = stdout.trim();
    if base.is_empty() {
        return Err(Error::Git(format!(
            "no merge base between {target} and {source}"
        )));
    }
    Ok(base.to_string())
}

/// List the commits `source` adds over its merge-base with `target`
///
/// Entries come back in log traversal order (newest first). Hashes,
/// subjects, and full bodies are captured; bodies may span lines, hence
/// the non-printing field and record separators in the format string.
pub async fn commits_between(
    git: &dyn GitRunner,
    target: &str,
    source: &str,
) -> Result<Vec<Commit>> {
    let base = merge_base(git, target, source).await?;
    let range = format!("{base}..{source}");
    let pretty = format!("--pretty=format:%H{FIELD_SEP}%s{FIELD_SEP}%b{RECORD_SEP}");
    let stdout = git.run_checked(&["log", &range, &pretty]).await?;
    Ok(parse_log(&stdout))
}

/// Parse separator-delimited log output, skipping malformed records
fn parse_log(raw: &str) -> Vec<Commit> {
    raw.split(RECORD_SEP)
        .filter_map(|record| {
            let record = record.trim_start_matches('\n');
            let mut fields = record.splitn(3, FIELD_SEP);
            let hash = fields.next()?.trim();
            let subject = fields.next()?;
            let body = fields.next().unwrap_or("");
            if hash.is_empty() {
                return None;
            }
            Some(Commit {
                hash: hash.to_string(),
                subject: subject.to_string(),
                body: body.trim_end().to_string(),
            })
        })
        .collect()
}

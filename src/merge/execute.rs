//! Merge execution - effectful operations
//!
//! Takes a [`MergePlan`] (created by the pure planning functions) and drives
//! git through the runner. The commit message travels via the staging file,
//! which exists only for the duration of this call.

use crate::error::Result;
use crate::git::GitRunner;
use crate::merge::plan::{MESSAGE_FILE, MergePlan};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Removes the staged message file when dropped, on success and failure alike
struct MessageFile {
    path: PathBuf,
}

impl MessageFile {
    fn write(repo_path: &Path, contents: &str) -> Result<Self> {
        let path = repo_path.join(MESSAGE_FILE);
        std::fs::write(&path, contents)?;
        Ok(Self { path })
    }
}

impl Drop for MessageFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Execute the merge plan (EFFECTFUL)
///
/// Writes the staged message file, then runs each step in order; the first
/// failing invocation (checkout failure, merge conflict, commit failure)
/// aborts the run with a fatal error.
pub async fn execute_merge(plan: &MergePlan, git: &dyn GitRunner, repo_path: &Path) -> Result<()> {
    let _message_file = MessageFile::write(repo_path, &plan.message)?;

    for step in &plan.steps {
        debug!(%step, "executing merge step");
        let args = step.args();
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        git.run_checked(&arg_refs).await?;
    }

    info!(
        source = %plan.source,
        target = %plan.target,
        strategy = %plan.strategy,
        "merge completed"
    );
    Ok(())
}

//! Pipeline orchestration, from commit discovery through notification
//!
//! [`Pipeline::run`] never returns an error: every failure is folded into
//! the [`PipelineReport`] so the caller can render it and exit non-zero,
//! and so failure notifications still go out.

use crate::compose::compose_message;
use crate::config::Config;
use crate::extract::KeyExtractor;
use crate::git::{GitRunner, commits_between};
use crate::merge::{MergePlan, create_merge_plan, execute_merge};
use crate::notify::{ChannelOutcome, Notification, Notifier, dispatch};
use crate::tracker::{IssueTracker, enrich_issues};
use crate::types::{IssueKey, MessageFormat};
use std::fmt;
use tracing::{debug, error, info};

/// Named phases of a run, recorded on log events for correlation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Resolving the merge-base and listing commits
    Discovering,
    /// Scanning branch name and commits for issue keys
    Extracting,
    /// Querying the tracker for issue metadata
    Enriching,
    /// Rendering the commit message and release notes
    Composing,
    /// Running the planned git steps
    Merging,
    /// Fanning out to notification channels
    Notifying,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Discovering => "discovering",
            Self::Extracting => "extracting",
            Self::Enriching => "enriching",
            Self::Composing => "composing",
            Self::Merging => "merging",
            Self::Notifying => "notifying",
        };
        f.write_str(name)
    }
}

/// Everything a caller needs to render or export the outcome of a run
#[derive(Debug)]
pub struct PipelineReport {
    /// Whether the run completed without error
    pub success: bool,
    /// Issue keys found in the commit range, in sorted order
    pub issue_keys: Vec<IssueKey>,
    /// The composed commit message, when composition was reached
    pub commit_message: Option<String>,
    /// Failure description, when the run did not complete
    pub error: Option<String>,
    /// The merge plan, when planning was reached
    pub plan: Option<MergePlan>,
    /// Per-channel delivery outcomes
    pub notifications: Vec<ChannelOutcome>,
}

/// Orchestrates one merge run over injected collaborators
pub struct Pipeline<'a> {
    config: &'a Config,
    git: &'a dyn GitRunner,
    tracker: Option<&'a dyn IssueTracker>,
    notifiers: &'a [Box<dyn Notifier>],
}

impl<'a> Pipeline<'a> {
    /// Wire up a pipeline over the given collaborators
    pub fn new(
        config: &'a Config,
        git: &'a dyn GitRunner,
        tracker: Option<&'a dyn IssueTracker>,
        notifiers: &'a [Box<dyn Notifier>],
    ) -> Self {
        Self {
            config,
            git,
            tracker,
            notifiers,
        }
    }

    /// Run the full pipeline for `source` into `target`
    pub async fn run(&self, source: &str, target: &str) -> PipelineReport {
        info!(stage = %Stage::Discovering, "merging {source} into {target}");
        let commits = match commits_between(self.git, target, source).await {
            Ok(commits) => commits,
            Err(e) => return self.fail(source, target, Vec::new(), None, e.to_string()).await,
        };
        debug!("found {} commits in range", commits.len());

        info!(stage = %Stage::Extracting, "scanning for issue keys");
        let extractor = match KeyExtractor::new(&self.config.project_keys) {
            Ok(extractor) => extractor,
            Err(e) => return self.fail(source, target, Vec::new(), None, e.to_string()).await,
        };
        let keys = extractor.extract_all(source, &commits);
        let issue_keys: Vec<IssueKey> = keys.iter().cloned().collect();
        info!(stage = %Stage::Extracting, "found {} issue keys", issue_keys.len());

        info!(stage = %Stage::Enriching, "resolving issue metadata");
        let records = enrich_issues(self.tracker, &self.config.tracker.base_url, &keys).await;

        info!(stage = %Stage::Composing, "rendering messages");
        let commit_message = compose_message(
            &records,
            source,
            target,
            MessageFormat::Plain,
            &self.config.type_order,
        );
        let release_notes = compose_message(
            &records,
            source,
            target,
            MessageFormat::Rich,
            &self.config.type_order,
        );

        let plan = create_merge_plan(source, target, self.config.strategy, commit_message.clone());

        info!(stage = %Stage::Merging, "strategy {}", self.config.strategy);
        if self.config.dry_run {
            info!("dry run, leaving the repository untouched");
        } else if let Err(e) = execute_merge(&plan, self.git, &self.config.repo_path).await {
            return self
                .fail(source, target, issue_keys, Some(plan), e.to_string())
                .await;
        }

        info!(stage = %Stage::Notifying, "dispatching notifications");
        let notification = Notification::for_run(source, target, true, release_notes);
        let notifications = dispatch(self.notifiers, &notification).await;

        PipelineReport {
            success: true,
            issue_keys,
            commit_message: Some(commit_message),
            error: None,
            plan: Some(plan),
            notifications,
        }
    }

    /// Fold a failure into a report, notifying channels before returning
    async fn fail(
        &self,
        source: &str,
        target: &str,
        issue_keys: Vec<IssueKey>,
        plan: Option<MergePlan>,
        error: String,
    ) -> PipelineReport {
        error!("merge of {source} into {target} failed: {error}");

        let body = format!("Failed to merge {source} into {target}: {error}");
        let notification = Notification::for_run(source, target, false, body);
        let notifications = dispatch(self.notifiers, &notification).await;

        PipelineReport {
            success: false,
            issue_keys,
            commit_message: None,
            error: Some(error),
            plan,
            notifications,
        }
    }
}

//! Shared command context for CLI and host entry points
//!
//! Extracts the collaborator wiring shared by the shell and host modes:
//! validating the repository path, building the git executor, the optional
//! tracker client, and the enabled notification channels.

use merge_herald::config::Config;
use merge_herald::error::{Error, Result};
use merge_herald::git::{GitCli, is_git_repo};
use merge_herald::notify::{Notifier, build_notifiers};
use merge_herald::tracker::{IssueTracker, JiraClient};

/// Collaborators the pipeline runs over, wired from configuration
pub struct CommandContext {
    /// Git executor rooted at the configured repository path
    pub git: GitCli,
    /// Tracker client, present when credentials are configured
    pub tracker: Option<JiraClient>,
    /// Enabled notification channels
    pub notifiers: Vec<Box<dyn Notifier>>,
}

impl CommandContext {
    /// Validate the repository path and wire up the collaborators
    pub fn new(config: &Config) -> Result<Self> {
        if !is_git_repo(&config.repo_path) {
            return Err(Error::Git(format!(
                "not a git repository (no .git entry in {})",
                config.repo_path.display()
            )));
        }

        let git = GitCli::new(&config.repo_path);
        let tracker = JiraClient::from_config(&config.tracker)?;
        let notifiers = build_notifiers(config)?;

        Ok(Self {
            git,
            tracker,
            notifiers,
        })
    }

    /// The tracker as a trait object, when one is configured
    pub fn tracker_ref(&self) -> Option<&dyn IssueTracker> {
        self.tracker
            .as_ref()
            .map(|tracker| tracker as &dyn IssueTracker)
    }
}

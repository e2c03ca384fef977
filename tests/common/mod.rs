//! Shared test fixtures
//!
//! These are test utilities - not all may be used by every test binary but
//! are available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use merge_herald::error::{Error, Result};
use merge_herald::notify::{Notification, Notifier};
use merge_herald::tracker::IssueTracker;
use merge_herald::types::{IssueKey, IssueRecord};
use std::path::Path;
use std::process::Command;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Temporary git repository with branch and commit helpers
pub struct TempGitRepo {
    dir: TempDir,
}

impl TempGitRepo {
    /// Initialize a repository with one commit on `main`
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let repo = Self { dir };
        repo.git(&["init"]);
        repo.git(&["symbolic-ref", "HEAD", "refs/heads/main"]);
        repo.git(&["config", "user.name", "Test User"]);
        repo.git(&["config", "user.email", "test@example.com"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo.commit_file("README.md", "init\n", "Initial commit");
        repo
    }

    /// Repository working directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Run git, panicking on failure
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.dir.path())
            .output()
            .expect("run git");
        assert!(
            output.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// Create a branch off the current HEAD and switch to it
    pub fn branch(&self, name: &str) {
        self.git(&["checkout", "-b", name]);
    }

    /// Switch to an existing branch
    pub fn checkout(&self, name: &str) {
        self.git(&["checkout", name]);
    }

    /// Write a file and commit it with the given message
    pub fn commit_file(&self, name: &str, contents: &str, message: &str) {
        std::fs::write(self.dir.path().join(name), contents).expect("write file");
        self.git(&["add", "."]);
        self.git(&["commit", "-m", message]);
    }

    /// Name of the currently checked-out branch
    pub fn current_branch(&self) -> String {
        self.git(&["rev-parse", "--abbrev-ref", "HEAD"])
            .trim()
            .to_string()
    }

    /// Commit hash of a revision
    pub fn rev(&self, rev: &str) -> String {
        self.git(&["rev-parse", rev]).trim().to_string()
    }

    /// Full commit message at a revision
    pub fn message_of(&self, rev: &str) -> String {
        self.git(&["log", "-1", "--pretty=format:%B", rev])
    }

    /// Number of parents of a revision
    pub fn parent_count(&self, rev: &str) -> usize {
        self.git(&["rev-list", "--parents", "-1", rev])
            .trim()
            .split_whitespace()
            .count()
            - 1
    }
}

/// Build an enriched record the way tracker responses look
pub fn make_record(key: &str, summary: &str, issue_type: &str) -> IssueRecord {
    IssueRecord {
        key: IssueKey::new(key),
        summary: summary.to_string(),
        issue_type: issue_type.to_string(),
        status: "Done".to_string(),
        url: format!("https://tracker.test/browse/{key}"),
    }
}

/// Issue tracker double with call tracking and error injection
pub struct MockTracker {
    records: Vec<IssueRecord>,
    fetch_calls: Mutex<Vec<Vec<IssueKey>>>,
    error: Mutex<Option<String>>,
}

impl MockTracker {
    /// A tracker that answers every query with the given records
    pub fn with_records(records: Vec<IssueRecord>) -> Self {
        Self {
            records,
            fetch_calls: Mutex::new(Vec::new()),
            error: Mutex::new(None),
        }
    }

    /// Make `fetch_issues` return an error
    pub fn fail(&self, msg: &str) {
        *self.error.lock().unwrap() = Some(msg.to_string());
    }

    /// Key lists `fetch_issues` was called with
    pub fn fetch_calls(&self) -> Vec<Vec<IssueKey>> {
        self.fetch_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IssueTracker for MockTracker {
    async fn fetch_issues(&self, keys: &[IssueKey]) -> Result<Vec<IssueRecord>> {
        self.fetch_calls.lock().unwrap().push(keys.to_vec());
        if let Some(msg) = self.error.lock().unwrap().as_ref() {
            return Err(Error::TrackerApi(msg.clone()));
        }
        Ok(self.records.clone())
    }
}

/// Notification channel double that records everything it is asked to send
pub struct RecordingNotifier {
    channel: &'static str,
    fail_with: Option<String>,
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    /// A channel that accepts every notification
    pub fn new(channel: &'static str) -> Self {
        Self {
            channel,
            fail_with: None,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A channel that rejects every notification with the given error
    pub fn failing(channel: &'static str, msg: &str) -> Self {
        Self {
            channel,
            fail_with: Some(msg.to_string()),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle to the notifications sent so far
    pub fn sent(&self) -> Arc<Mutex<Vec<Notification>>> {
        Arc::clone(&self.sent)
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &'static str {
        self.channel
    }

    async fn send(&self, notification: &Notification) -> Result<()> {
        self.sent.lock().unwrap().push(notification.clone());
        match &self.fail_with {
            Some(msg) => Err(Error::Notify(msg.clone())),
            None => Ok(()),
        }
    }
}

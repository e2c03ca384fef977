//! Core types for merge-herald

use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Sentinel value for issue fields that enrichment could not resolve
pub const UNKNOWN: &str = "Unknown";

/// A commit in the range the source branch adds over the merge-base
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Commit {
    /// Full commit hash (hex)
    pub hash: String,
    /// First line of the commit message
    pub subject: String,
    /// Remainder of the commit message (may be empty)
    pub body: String,
}

/// A normalized issue-tracker key of the form `PREFIX-NUMBER`
///
/// Construction uppercases the raw match, so set membership is
/// case-insensitive by the time keys reach a collection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueKey(String);

impl IssueKey {
    /// Normalize a raw match into a key
    pub fn new(raw: &str) -> Self {
        Self(raw.to_uppercase())
    }

    /// The key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IssueKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Descriptive metadata for one issue key
///
/// Created once per unique key after enrichment and immutable thereafter.
/// Fields the tracker could not describe hold the `"Unknown"` sentinel;
/// `url` is always derived from the tracker base URL and the key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssueRecord {
    /// The issue key
    pub key: IssueKey,
    /// One-line issue summary
    pub summary: String,
    /// Issue type name (e.g., "Bug", "Task")
    pub issue_type: String,
    /// Workflow status name
    pub status: String,
    /// Browse URL for the issue
    pub url: String,
}

impl IssueRecord {
    /// Fallback record for a key the tracker could not describe
    pub fn unknown(key: IssueKey, url: String) -> Self {
        Self {
            key,
            summary: UNKNOWN.to_string(),
            issue_type: UNKNOWN.to_string(),
            status: UNKNOWN.to_string(),
            url,
        }
    }

    /// Whether enrichment produced a usable summary
    pub fn has_summary(&self) -> bool {
        self.summary != UNKNOWN
    }
}

/// How the source branch is folded into the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Non-fast-forward merge commit carrying the composed message
    Merge,
    /// Squash merge followed by a single commit with the composed message
    Squash,
}

impl std::fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Merge => write!(f, "merge"),
            Self::Squash => write!(f, "squash"),
        }
    }
}

impl std::str::FromStr for MergeStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "merge" => Ok(Self::Merge),
            "squash" => Ok(Self::Squash),
            other => Err(Error::Config(format!(
                "unknown merge strategy '{other}' (expected 'merge' or 'squash')"
            ))),
        }
    }
}

/// Output variant of the message composer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFormat {
    /// Plain text with `##` type headings, used as the commit message
    Plain,
    /// Slack markup with bold headings and hyperlinked keys
    Rich,
}

impl std::fmt::Display for MessageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Rich => write!(f, "rich"),
        }
    }
}

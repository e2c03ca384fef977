//! Merge planning - pure functions for describing the merge
//!
//! This module contains the pure, testable logic for turning a strategy and
//! a composed message into the ordered list of git invocations. No I/O
//! happens here - execution and dry-run reporting both consume the plan.

use crate::types::MergeStrategy;

/// Name of the staging file carrying the commit message
///
/// Created inside the repository path for the duration of execution and
/// removed on every exit path.
pub const MESSAGE_FILE: &str = "MERGE_MSG";

/// A single git invocation in the merge plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeStep {
    /// Check out the target branch
    Checkout {
        /// Branch to check out
        branch: String,
    },
    /// Non-fast-forward merge reading the staged message file
    Merge {
        /// Branch being merged in
        source: String,
    },
    /// Squash merge, staging changes without committing
    SquashMerge {
        /// Branch being merged in
        source: String,
    },
    /// Commit staged changes with the staged message file
    Commit,
}

impl MergeStep {
    /// The git argument vector for this step
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::Checkout { branch } => vec!["checkout".to_string(), branch.clone()],
            Self::Merge { source } => vec![
                "merge".to_string(),
                "--no-ff".to_string(),
                source.clone(),
                "-F".to_string(),
                MESSAGE_FILE.to_string(),
            ],
            Self::SquashMerge { source } => vec![
                "merge".to_string(),
                "--squash".to_string(),
                source.clone(),
            ],
            Self::Commit => vec![
                "commit".to_string(),
                "-F".to_string(),
                MESSAGE_FILE.to_string(),
            ],
        }
    }
}

impl std::fmt::Display for MergeStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "git {}", self.args().join(" "))
    }
}

/// Merge plan - the functional core output
///
/// A pure data structure describing what the merge will do. Created by
/// [`create_merge_plan`] and either executed by
/// [`execute_merge`](crate::merge::execute_merge) or reported verbatim in
/// dry-run mode.
#[derive(Debug, Clone)]
pub struct MergePlan {
    /// Branch being merged in
    pub source: String,
    /// Branch receiving the merge
    pub target: String,
    /// Strategy the steps encode
    pub strategy: MergeStrategy,
    /// Full commit message destined for the staging file
    pub message: String,
    /// Ordered git invocations
    pub steps: Vec<MergeStep>,
}

impl MergePlan {
    /// Human-readable step lines for reporting
    pub fn step_lines(&self) -> Vec<String> {
        self.steps.iter().map(ToString::to_string).collect()
    }
}

/// Create a merge plan (PURE - no I/O, easily testable)
#[must_use]
pub fn create_merge_plan(
    source: &str,
    target: &str,
    strategy: MergeStrategy,
    message: String,
) -> MergePlan {
    let steps = match strategy {
        MergeStrategy::Merge => vec![
            MergeStep::Checkout {
                branch: target.to_string(),
            },
            MergeStep::Merge {
                source: source.to_string(),
            },
        ],
        MergeStrategy::Squash => vec![
            MergeStep::Checkout {
                branch: target.to_string(),
            },
            MergeStep::SquashMerge {
                source: source.to_string(),
            },
            MergeStep::Commit,
        ],
    };

    MergePlan {
        source: source.to_string(),
        target: target.to_string(),
        strategy,
        message,
        steps,
    }
}

//! Merge engine
//!
//! Two-phase pattern:
//! 1. Plan - describe the git invocations and message (pure, testable)
//! 2. Execute - perform them through the git runner (effectful)
//!
//! Dry-run consumes the plan without ever reaching execute.

mod execute;
mod plan;

pub use execute::execute_merge;
pub use plan::{MESSAGE_FILE, MergePlan, MergeStep, create_merge_plan};

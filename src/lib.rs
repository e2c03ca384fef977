//! Merge branches with tracker-enriched commit messages and notifications
//!
//! The pipeline discovers the commits a source branch adds over a target,
//! extracts issue keys from branch name and commit messages, enriches them
//! against an issue tracker, composes a type-grouped summary in plain and
//! rich variants, performs the merge with the plain variant staged as the
//! commit message, and fans the rich variant out to notification channels.

pub mod compose;
pub mod config;
pub mod error;
pub mod extract;
pub mod git;
pub mod host;
pub mod merge;
pub mod notify;
pub mod pipeline;
pub mod tracker;
pub mod types;

pub use error::{Error, Result};

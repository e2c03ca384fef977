//! Issue tracker integration
//!
//! Provides the enrichment seam: a trait for the batched issue query plus
//! the fallback that keeps the pipeline total when the tracker is absent or
//! failing. Downstream grouping never has to handle a missing record.

mod jira;

pub use jira::JiraClient;

use crate::error::Result;
use crate::types::{IssueKey, IssueRecord};
use async_trait::async_trait;
use std::collections::BTreeSet;
use tracing::{debug, warn};
use url::Url;

/// Issue tracker query trait
///
/// Abstracts the tracker HTTP API so enrichment and the orchestrator can be
/// exercised against in-memory doubles.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Fetch descriptive metadata for all keys in one batched query
    async fn fetch_issues(&self, keys: &[IssueKey]) -> Result<Vec<IssueRecord>>;
}

/// Deterministic browse URL for a key, derived from the tracker base URL
pub fn browse_url(base_url: &Url, key: &IssueKey) -> String {
    format!("{}/browse/{key}", base_url.as_str().trim_end_matches('/'))
}

/// Enrich the extracted key set
///
/// Issues at most one batched query. Absent credentials and query failures
/// degrade to "Unknown" records instead of raising, so the caller always
/// receives a record per requested key; an empty key set yields an empty
/// list without touching the tracker.
pub async fn enrich_issues(
    tracker: Option<&dyn IssueTracker>,
    base_url: &Url,
    keys: &BTreeSet<IssueKey>,
) -> Vec<IssueRecord> {
    if keys.is_empty() {
        return Vec::new();
    }

    let Some(tracker) = tracker else {
        debug!("tracker credentials absent, synthesizing fallback records");
        return fallback_records(base_url, keys);
    };

    let requested: Vec<IssueKey> = keys.iter().cloned().collect();
    match tracker.fetch_issues(&requested).await {
        Ok(records) => {
            debug!(count = records.len(), "issues enriched from tracker");
            records
        }
        Err(e) => {
            warn!("issue enrichment failed, falling back to Unknown records: {e}");
            fallback_records(base_url, keys)
        }
    }
}

/// One "Unknown" record per key, in sorted key order
fn fallback_records(base_url: &Url, keys: &BTreeSet<IssueKey>) -> Vec<IssueRecord> {
    keys.iter()
        .map(|key| IssueRecord::unknown(key.clone(), browse_url(base_url, key)))
        .collect()
}

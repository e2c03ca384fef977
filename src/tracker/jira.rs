//! Jira tracker implementation

use crate::config::TrackerConfig;
use crate::error::{Error, Result};
use crate::tracker::{IssueTracker, browse_url};
use crate::types::{IssueKey, IssueRecord, UNKNOWN};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fields requested from the search endpoint
const SEARCH_FIELDS: &str = "summary,issuetype,status";

/// Jira REST client issuing the batched issue search
pub struct JiraClient {
    client: Client,
    base_url: Url,
    username: String,
    api_token: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    issues: Vec<SearchIssue>,
}

#[derive(Deserialize)]
struct SearchIssue {
    key: String,
    #[serde(default)]
    fields: IssueFields,
}

#[derive(Deserialize, Default)]
struct IssueFields {
    summary: Option<String>,
    issuetype: Option<NamedEntity>,
    status: Option<NamedEntity>,
}

#[derive(Deserialize)]
struct NamedEntity {
    name: String,
}

impl JiraClient {
    /// Build a client from tracker configuration
    ///
    /// Returns `None` when credentials are incomplete; enrichment then runs
    /// on fallback records alone.
    pub fn from_config(config: &TrackerConfig) -> Result<Option<Self>> {
        let (Some(username), Some(api_token)) = (config.username.clone(), config.api_token.clone())
        else {
            return Ok(None);
        };

        let client = Client::builder()
            .user_agent("merge-herald")
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::TrackerApi(format!("failed to create HTTP client: {e}")))?;

        Ok(Some(Self {
            client,
            base_url: config.base_url.clone(),
            username,
            api_token,
        }))
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.as_str().trim_end_matches('/'))
    }

    fn record_from(&self, issue: SearchIssue) -> IssueRecord {
        let key = IssueKey::new(&issue.key);
        let url = browse_url(&self.base_url, &key);
        IssueRecord {
            key,
            summary: issue.fields.summary.unwrap_or_else(|| UNKNOWN.to_string()),
            issue_type: issue
                .fields
                .issuetype
                .map_or_else(|| UNKNOWN.to_string(), |t| t.name),
            status: issue
                .fields
                .status
                .map_or_else(|| UNKNOWN.to_string(), |s| s.name),
            url,
        }
    }
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn fetch_issues(&self, keys: &[IssueKey]) -> Result<Vec<IssueRecord>> {
        let key_list = keys
            .iter()
            .map(IssueKey::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let jql = format!("key in ({key_list})");
        debug!(%jql, "querying tracker");

        let response: SearchResponse = self
            .client
            .get(self.api_url("/rest/api/2/search"))
            .basic_auth(&self.username, Some(&self.api_token))
            .query(&[("jql", jql.as_str()), ("fields", SEARCH_FIELDS)])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::TrackerApi(e.to_string()))?
            .json()
            .await?;

        debug!(count = response.issues.len(), "tracker returned issues");
        Ok(response
            .issues
            .into_iter()
            .map(|issue| self.record_from(issue))
            .collect())
    }
}

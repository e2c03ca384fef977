//! Runtime configuration, assembled once at startup and read-only afterward
//!
//! Values come from the process environment (or, under a CI host, from the
//! host's named inputs mapped onto the same keys). Loading is parameterized
//! over a lookup function so tests never touch the real environment.

use crate::error::{Error, Result};
use crate::types::MergeStrategy;
use std::path::PathBuf;
use url::Url;

const DEFAULT_TRACKER_URL: &str = "https://your-domain.atlassian.net";
const DEFAULT_PROJECT_KEYS: &str = "PROJ,TEST";
const DEFAULT_EMAIL_FROM: &str = "build@yourcompany.com";
const DEFAULT_EMAIL_TO: &str = "team@yourcompany.com";
const DEFAULT_SMTP_HOST: &str = "smtp.yourcompany.com";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_SLACK_CHANNEL: &str = "#builds";

/// Issue-tracker connection settings
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Base URL of the tracker instance
    pub base_url: Url,
    /// Basic-auth username
    pub username: Option<String>,
    /// Basic-auth API token
    pub api_token: Option<String>,
}

impl TrackerConfig {
    /// Whether credentials are present for live enrichment
    pub const fn has_credentials(&self) -> bool {
        self.username.is_some() && self.api_token.is_some()
    }
}

/// Email notification channel settings
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Channel toggle
    pub enabled: bool,
    /// Sender address
    pub from: String,
    /// Recipient addresses
    pub to: Vec<String>,
    /// SMTP relay host
    pub smtp_host: String,
    /// SMTP port (465 selects implicit TLS, anything else STARTTLS)
    pub smtp_port: u16,
    /// SMTP auth username
    pub username: Option<String>,
    /// SMTP auth password
    pub password: Option<String>,
}

/// Slack notification channel settings
#[derive(Debug, Clone)]
pub struct SlackConfig {
    /// Channel toggle
    pub enabled: bool,
    /// Incoming-webhook URL
    pub webhook_url: Option<String>,
    /// Channel override included in the payload
    pub channel: String,
}

/// Immutable configuration for one pipeline run
#[derive(Debug, Clone)]
pub struct Config {
    /// How the source branch folds into the target
    pub strategy: MergeStrategy,
    /// Compute and report everything without mutating the repository
    pub dry_run: bool,
    /// Repository working directory
    pub repo_path: PathBuf,
    /// Recognized issue-key prefixes
    pub project_keys: Vec<String>,
    /// Issue-type group ordering (empty means lexicographic)
    pub type_order: Vec<String>,
    /// Tracker settings
    pub tracker: TrackerConfig,
    /// Email channel settings
    pub email: EmailConfig,
    /// Slack channel settings
    pub slack: SlackConfig,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key-value source
    ///
    /// Keys are the environment-variable names from the configuration
    /// surface. Empty values count as unset.
    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| get(key).filter(|value| !value.trim().is_empty());

        let strategy = match get("GIT_MERGE_STRATEGY") {
            Some(raw) => raw.parse()?,
            None => MergeStrategy::Merge,
        };

        let repo_path = get("REPO_PATH").map_or_else(|| PathBuf::from("."), PathBuf::from);

        let base_url_raw = get("JIRA_URL").unwrap_or_else(|| DEFAULT_TRACKER_URL.to_string());
        let base_url = Url::parse(&base_url_raw)
            .map_err(|e| Error::Config(format!("invalid JIRA_URL '{base_url_raw}': {e}")))?;

        let smtp_port = match get("SMTP_PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| Error::Config(format!("invalid SMTP_PORT '{raw}': {e}")))?,
            None => DEFAULT_SMTP_PORT,
        };

        Ok(Self {
            strategy,
            dry_run: parse_bool(get("DRY_RUN")),
            repo_path,
            project_keys: parse_list(get("JIRA_PROJECT_KEYS"), DEFAULT_PROJECT_KEYS),
            type_order: parse_list(get("ISSUE_TYPE_ORDER"), ""),
            tracker: TrackerConfig {
                base_url,
                username: get("JIRA_USERNAME"),
                api_token: get("JIRA_API_TOKEN"),
            },
            email: EmailConfig {
                enabled: parse_bool(get("EMAIL_ENABLED")),
                from: get("EMAIL_FROM").unwrap_or_else(|| DEFAULT_EMAIL_FROM.to_string()),
                to: parse_list(get("EMAIL_TO"), DEFAULT_EMAIL_TO),
                smtp_host: get("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
                smtp_port,
                username: get("SMTP_USER"),
                password: get("SMTP_PASS"),
            },
            slack: SlackConfig {
                enabled: parse_bool(get("SLACK_ENABLED")),
                webhook_url: get("SLACK_WEBHOOK_URL"),
                channel: get("SLACK_CHANNEL").unwrap_or_else(|| DEFAULT_SLACK_CHANNEL.to_string()),
            },
        })
    }
}

/// `true` (case-insensitive) turns a toggle on; anything else is off
fn parse_bool(value: Option<String>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Comma-split a list value, trimming entries and dropping blanks
fn parse_list(value: Option<String>, default: &str) -> Vec<String> {
    value
        .unwrap_or_else(|| default.to_string())
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.strategy, MergeStrategy::Merge);
        assert!(!config.dry_run);
        assert_eq!(config.repo_path, PathBuf::from("."));
        assert_eq!(config.project_keys, ["PROJ", "TEST"]);
        assert!(config.type_order.is_empty());
        assert_eq!(config.tracker.base_url.as_str(), "https://your-domain.atlassian.net/");
        assert!(!config.tracker.has_credentials());
        assert!(!config.email.enabled);
        assert_eq!(config.email.smtp_port, 587);
        assert!(!config.slack.enabled);
        assert_eq!(config.slack.channel, "#builds");
    }

    #[test]
    fn test_lists_are_trimmed_and_blank_entries_dropped() {
        let config = load(&[
            ("JIRA_PROJECT_KEYS", " ABC , DEF ,,XYZ"),
            ("ISSUE_TYPE_ORDER", "Bug, Task"),
            ("EMAIL_TO", "a@x.com, b@x.com"),
        ])
        .unwrap();
        assert_eq!(config.project_keys, ["ABC", "DEF", "XYZ"]);
        assert_eq!(config.type_order, ["Bug", "Task"]);
        assert_eq!(config.email.to, ["a@x.com", "b@x.com"]);
    }

    #[test]
    fn test_bool_parsing_accepts_only_true() {
        assert!(load(&[("DRY_RUN", "true")]).unwrap().dry_run);
        assert!(load(&[("DRY_RUN", "TRUE")]).unwrap().dry_run);
        assert!(!load(&[("DRY_RUN", "1")]).unwrap().dry_run);
        assert!(!load(&[("DRY_RUN", "yes")]).unwrap().dry_run);
    }

    #[test]
    fn test_invalid_strategy_is_a_config_error() {
        let err = load(&[("GIT_MERGE_STRATEGY", "rebase")]).unwrap_err();
        assert!(err.to_string().contains("merge strategy"));
    }

    #[test]
    fn test_invalid_port_is_a_config_error() {
        let err = load(&[("SMTP_PORT", "not-a-port")]).unwrap_err();
        assert!(err.to_string().contains("SMTP_PORT"));
    }

    #[test]
    fn test_invalid_tracker_url_is_a_config_error() {
        let err = load(&[("JIRA_URL", "not a url")]).unwrap_err();
        assert!(err.to_string().contains("JIRA_URL"));
    }

    #[test]
    fn test_credentials_require_both_halves() {
        let config = load(&[("JIRA_USERNAME", "bot@x.com")]).unwrap();
        assert!(!config.tracker.has_credentials());
        let config = load(&[("JIRA_USERNAME", "bot@x.com"), ("JIRA_API_TOKEN", "tok")]).unwrap();
        assert!(config.tracker.has_credentials());
    }

    #[test]
    fn test_empty_values_count_as_unset() {
        let config = load(&[("JIRA_USERNAME", ""), ("SLACK_CHANNEL", "  ")]).unwrap();
        assert!(config.tracker.username.is_none());
        assert_eq!(config.slack.channel, "#builds");
    }
}

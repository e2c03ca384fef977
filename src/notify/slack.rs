//! Slack notification channel (incoming webhook)

use crate::config::SlackConfig;
use crate::error::{Error, Result};
use crate::notify::{Notification, Notifier};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Incoming-webhook delivery sink
pub struct SlackNotifier {
    client: Client,
    config: SlackConfig,
}

impl SlackNotifier {
    /// Create the channel from its configuration
    pub fn new(config: SlackConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Notify(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    fn payload(&self, notification: &Notification) -> Value {
        let status = if notification.success {
            "Status: ✅ Success"
        } else {
            "Status: ❌ Failed"
        };
        json!({
            "channel": self.config.channel,
            "text": format!("{}\n\n{}", notification.subject, notification.body),
            "blocks": [
                {
                    "type": "header",
                    "text": { "type": "plain_text", "text": notification.subject }
                },
                {
                    "type": "section",
                    "text": { "type": "mrkdwn", "text": notification.body }
                },
                {
                    "type": "context",
                    "elements": [ { "type": "mrkdwn", "text": status } ]
                }
            ]
        })
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    fn name(&self) -> &'static str {
        "slack"
    }

    async fn send(&self, notification: &Notification) -> Result<()> {
        let Some(webhook_url) = &self.config.webhook_url else {
            return Err(Error::Notify("no Slack webhook URL configured".to_string()));
        };

        debug!(channel = %self.config.channel, "posting to Slack webhook");
        self.client
            .post(webhook_url)
            .json(&self.payload(notification))
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Notify(format!("Slack webhook rejected the message: {e}")))?;
        Ok(())
    }
}

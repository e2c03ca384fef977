//! Notification fan-out
//!
//! Channels implement [`Notifier`] and are attempted independently, one
//! attempt per run: a failing channel never blocks a sibling and never
//! fails the run. Each attempt produces a [`ChannelOutcome`] for the
//! caller to log.

mod email;
mod slack;

pub use email::EmailNotifier;
pub use slack::SlackNotifier;

use crate::config::Config;
use crate::error::Result;
use async_trait::async_trait;
use tracing::{info, warn};

/// A rendered notification ready for delivery
#[derive(Debug, Clone)]
pub struct Notification {
    /// Subject line
    pub subject: String,
    /// Rich message body
    pub body: String,
    /// Whether the run being reported succeeded
    pub success: bool,
}

impl Notification {
    /// Build the notification for a run outcome
    pub fn for_run(source: &str, target: &str, success: bool, body: String) -> Self {
        let subject = if success {
            format!("Merge Completed: {source} → {target}")
        } else {
            format!("Merge Failed: {source} → {target}")
        };
        Self {
            subject,
            body,
            success,
        }
    }
}

/// A delivery sink for run notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Channel name used in logs and outcomes
    fn name(&self) -> &'static str;

    /// Attempt delivery once
    async fn send(&self, notification: &Notification) -> Result<()>;
}

/// Result of one channel's delivery attempt
#[derive(Debug, Clone)]
pub struct ChannelOutcome {
    /// Channel name
    pub channel: &'static str,
    /// Delivery error text, if the attempt failed
    pub error: Option<String>,
}

impl ChannelOutcome {
    /// Whether the channel accepted the notification
    pub const fn delivered(&self) -> bool {
        self.error.is_none()
    }
}

/// Build the enabled channels from configuration
///
/// Disabled channels are skipped here, so the dispatcher only ever sees
/// sinks that should receive an attempt.
pub fn build_notifiers(config: &Config) -> Result<Vec<Box<dyn Notifier>>> {
    let mut notifiers: Vec<Box<dyn Notifier>> = Vec::new();
    if config.email.enabled {
        notifiers.push(Box::new(EmailNotifier::new(config.email.clone())));
    }
    if config.slack.enabled {
        notifiers.push(Box::new(SlackNotifier::new(config.slack.clone())?));
    }
    Ok(notifiers)
}

/// Attempt delivery on every channel, isolating failures
pub async fn dispatch(
    notifiers: &[Box<dyn Notifier>],
    notification: &Notification,
) -> Vec<ChannelOutcome> {
    let mut outcomes = Vec::with_capacity(notifiers.len());
    for notifier in notifiers {
        let outcome = match notifier.send(notification).await {
            Ok(()) => {
                info!(channel = notifier.name(), "notification delivered");
                ChannelOutcome {
                    channel: notifier.name(),
                    error: None,
                }
            }
            Err(e) => {
                warn!(channel = notifier.name(), "notification failed: {e}");
                ChannelOutcome {
                    channel: notifier.name(),
                    error: Some(e.to_string()),
                }
            }
        };
        outcomes.push(outcome);
    }
    outcomes
}

//! Email notification channel (SMTP)

use crate::config::EmailConfig;
use crate::error::{Error, Result};
use crate::notify::{Notification, Notifier};
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

/// Port that selects implicit TLS instead of STARTTLS
const SMTPS_PORT: u16 = 465;

/// Whether a port carries implicit TLS rather than STARTTLS
const fn uses_implicit_tls(port: u16) -> bool {
    port == SMTPS_PORT
}

/// SMTP delivery sink
pub struct EmailNotifier {
    config: EmailConfig,
}

impl EmailNotifier {
    /// Create the channel from its configuration
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let relay = if uses_implicit_tls(self.config.smtp_port) {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)
        };
        let mut builder = relay
            .map_err(|e| {
                Error::Notify(format!("invalid SMTP relay {}: {e}", self.config.smtp_host))
            })?
            .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.username, &self.config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }
        Ok(builder.build())
    }

    fn build_message(&self, notification: &Notification) -> Result<Message> {
        let from: Mailbox = self.config.from.parse().map_err(|e| {
            Error::Notify(format!("invalid sender address {}: {e}", self.config.from))
        })?;

        let mut builder = Message::builder()
            .from(from)
            .subject(notification.subject.as_str());
        for recipient in &self.config.to {
            let to: Mailbox = recipient
                .parse()
                .map_err(|e| Error::Notify(format!("invalid recipient address {recipient}: {e}")))?;
            builder = builder.to(to);
        }

        builder
            .multipart(MultiPart::alternative_plain_html(
                notification.body.clone(),
                to_html(&notification.body),
            ))
            .map_err(|e| Error::Notify(format!("failed to build email: {e}")))
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn send(&self, notification: &Notification) -> Result<()> {
        if self.config.to.is_empty() {
            return Err(Error::Notify("no email recipients configured".to_string()));
        }

        let message = self.build_message(notification)?;
        let transport = self.transport()?;
        debug!(
            host = %self.config.smtp_host,
            port = self.config.smtp_port,
            "sending email notification"
        );
        transport
            .send(message)
            .await
            .map_err(|e| Error::Notify(format!("SMTP delivery failed: {e}")))?;
        Ok(())
    }
}

/// Convert the rich message to simple HTML
///
/// Bold heading lines become `<h2>`, Slack links become anchors, and line
/// breaks become `<br>`.
fn to_html(body: &str) -> String {
    body.lines()
        .map(|line| {
            let trimmed = line.trim();
            if trimmed.len() > 2 && trimmed.starts_with('*') && trimmed.ends_with('*') {
                format!("<h2>{}</h2>", &trimmed[1..trimmed.len() - 1])
            } else {
                convert_links(line)
            }
        })
        .collect::<Vec<_>>()
        .join("<br>")
}

/// Rewrite `<url|text>` tokens as HTML anchors, leaving other text alone
fn convert_links(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(start) = rest.find('<') {
        let Some(end_offset) = rest[start..].find('>') else {
            break;
        };
        let end = start + end_offset;
        let inner = &rest[start + 1..end];
        if let Some((url, text)) = inner.split_once('|') {
            out.push_str(&rest[..start]);
            out.push_str(&format!("<a href=\"{url}\">{text}</a>"));
            rest = &rest[end + 1..];
        } else {
            out.push_str(&rest[..=start]);
            rest = &rest[start + 1..];
        }
    }
    out.push_str(rest);
    out
}

//! Email notifier sending through Gmail's SMTP relay.

use std::error::Error as StdError;
use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, warn};

use fargufa_core::{
    config::present,
    model::{Alert, ChannelId, ChannelMeta, Channels, Delivery},
    ports::{Notifier, PortError},
};

const SMTP_HOST: &str = "smtp.gmail.com";
// Implicit TLS; the session is encrypted from the first byte.
const SMTP_PORT: u16 = 465;

/// Account the alert is sent from and the address it goes to.
#[derive(Clone, PartialEq, Eq)]
pub struct GmailConfig {
    /// Sending Gmail address, also the SMTP user name.
    pub user: String,
    /// App password for the sending account.
    pub password: String,
    /// Recipient address.
    pub to: String,
}

impl GmailConfig {
    /// Assemble a configuration when all three values are set and non-blank.
    #[must_use]
    pub fn from_parts(
        user: Option<String>,
        password: Option<String>,
        to: Option<String>,
    ) -> Option<Self> {
        Some(Self {
            user: present(user)?,
            password: present(password)?,
            to: present(to)?,
        })
    }
}

/// Email channel; does nothing without a [`GmailConfig`].
pub struct GmailNotifier {
    config: Option<GmailConfig>,
    meta: ChannelMeta,
}

impl GmailNotifier {
    /// Create a notifier for the given account.
    #[must_use]
    pub fn new(config: Option<GmailConfig>) -> Self {
        Self {
            config,
            meta: channel_meta(),
        }
    }
}

#[async_trait]
impl Notifier for GmailNotifier {
    fn channel(&self) -> &ChannelMeta {
        &self.meta
    }

    async fn notify(&self, alert: &Alert) -> Result<Delivery, PortError> {
        let Some(config) = &self.config else {
            warn!("Email not configured; skipping.");
            return Ok(Delivery::Skipped);
        };

        let message = build_message(config, alert)?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(SMTP_HOST)
            .map_err(delivery_error)?
            .port(SMTP_PORT)
            .credentials(Credentials::new(
                config.user.clone(),
                config.password.clone(),
            ))
            .build();

        let response = mailer.send(message).await.map_err(delivery_error)?;
        debug!(code = %response.code(), "SMTP accepted message");

        Ok(Delivery::Sent)
    }
}

/// Build the email channel.
#[must_use]
pub fn plugin(config: Option<GmailConfig>) -> Arc<dyn Notifier> {
    Arc::new(GmailNotifier::new(config))
}

fn channel_meta() -> ChannelMeta {
    ChannelMeta {
        id: ChannelId::from(Channels::Email),
        name: String::from("Email"),
    }
}

/// Plain-text message from the sending account to the recipient.
fn build_message(config: &GmailConfig, alert: &Alert) -> Result<Message, PortError> {
    let from = parse_mailbox(&config.user)?;
    let to = parse_mailbox(&config.to)?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(alert.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(alert.body.clone())
        .map_err(delivery_error)
}

fn parse_mailbox(address: &str) -> Result<Mailbox, PortError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|err| PortError::InvalidAddress(format!("{address}: {err}")))
}

fn delivery_error(err: impl StdError) -> PortError {
    PortError::Delivery(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(to: &str) -> GmailConfig {
        GmailConfig::from_parts(
            Some("checker@gmail.com".to_owned()),
            Some("app-password".to_owned()),
            Some(to.to_owned()),
        )
        .unwrap()
    }

    fn alert() -> Alert {
        Alert {
            subject: "LAUST: Gufunes – 3 pláss".to_owned(),
            body: "🔥 Laust í Gufunes!\nPláss: 3".to_owned(),
            text: "Gufunes: 3 pláss.".to_owned(),
        }
    }

    #[test]
    fn any_missing_value_disables_the_channel() {
        let some = |value: &str| Some(value.to_owned());

        assert!(GmailConfig::from_parts(None, some("pw"), some("to@example.com")).is_none());
        assert!(GmailConfig::from_parts(some("me@gmail.com"), None, some("to@example.com")).is_none());
        assert!(GmailConfig::from_parts(some("me@gmail.com"), some("pw"), some("")).is_none());
        assert!(GmailConfig::from_parts(some("me@gmail.com"), some("pw"), some("to@example.com")).is_some());
    }

    #[tokio::test]
    async fn unconfigured_channel_is_skipped() {
        let delivery = GmailNotifier::new(None).notify(&alert()).await.unwrap();

        assert_eq!(delivery, Delivery::Skipped);
    }

    #[tokio::test]
    async fn invalid_recipient_fails_before_connecting() {
        let result = GmailNotifier::new(Some(config("not an address")))
            .notify(&alert())
            .await;

        assert!(matches!(result, Err(PortError::InvalidAddress(_))));
    }

    #[test]
    fn message_is_addressed_from_the_account_to_the_recipient() {
        let message = build_message(&config("owner@example.com"), &alert()).unwrap();

        let envelope = message.envelope();
        assert_eq!(
            envelope.from().map(ToString::to_string).as_deref(),
            Some("checker@gmail.com")
        );
        let recipients: Vec<String> = envelope.to().iter().map(ToString::to_string).collect();
        assert_eq!(recipients, ["owner@example.com"]);

        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(formatted.contains("Content-Type: text/plain"));
    }
}

//! SMS notifier using the Twilio Programmable Messaging API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use fargufa_core::{
    config::present,
    model::{Alert, ChannelId, ChannelMeta, Channels, Delivery},
    ports::{Notifier, PortError},
};

const BASE_URL: &str = "https://api.twilio.com/2010-04-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Account and numbers used to send the SMS.
#[derive(Clone, PartialEq, Eq)]
pub struct TwilioConfig {
    /// Account SID, also the basic-auth user name.
    pub account_sid: String,
    /// Auth token, the basic-auth password.
    pub auth_token: String,
    /// Sending number.
    pub from: String,
    /// Recipient number.
    pub to: String,
}

impl TwilioConfig {
    /// Assemble a configuration when all four values are set and non-blank.
    #[must_use]
    pub fn from_parts(
        account_sid: Option<String>,
        auth_token: Option<String>,
        from: Option<String>,
        to: Option<String>,
    ) -> Option<Self> {
        Some(Self {
            account_sid: present(account_sid)?,
            auth_token: present(auth_token)?,
            from: present(from)?,
            to: present(to)?,
        })
    }
}

/// Subset of the message resource returned on creation.
#[derive(Debug, Deserialize)]
struct MessageResponse {
    sid: String,
    #[serde(default)]
    status: Option<String>,
}

/// SMS channel; does nothing without a [`TwilioConfig`].
pub struct TwilioNotifier {
    client: Client,
    config: Option<TwilioConfig>,
    base_url: String,
    meta: ChannelMeta,
}

impl TwilioNotifier {
    /// Create a notifier bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client, config: Option<TwilioConfig>) -> Self {
        Self {
            client,
            config,
            base_url: BASE_URL.to_owned(),
            meta: channel_meta(),
        }
    }

    /// Send requests to another API root, e.g. a local mock.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Notifier for TwilioNotifier {
    fn channel(&self) -> &ChannelMeta {
        &self.meta
    }

    async fn notify(&self, alert: &Alert) -> Result<Delivery, PortError> {
        let Some(config) = &self.config else {
            warn!("SMS not configured; skipping.");
            return Ok(Delivery::Skipped);
        };

        let url = format!(
            "{}/Accounts/{}/Messages.json",
            self.base_url, config.account_sid
        );

        let response = self
            .client
            .post(url)
            .basic_auth(&config.account_sid, Some(&config.auth_token))
            .form(&[
                ("From", config.from.as_str()),
                ("To", config.to.as_str()),
                ("Body", alert.text.as_str()),
            ])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;

        // The message is accepted at this point; the body only adds the SID to the log.
        match response.json::<MessageResponse>().await {
            Ok(message) => info!(sid = %message.sid, status = ?message.status, "SMS queued"),
            Err(err) => debug!(%err, "SMS accepted without a readable message resource"),
        }

        Ok(Delivery::Sent)
    }
}

/// Build the SMS channel.
#[must_use]
pub fn plugin(client: Client, config: Option<TwilioConfig>) -> Arc<dyn Notifier> {
    Arc::new(TwilioNotifier::new(client, config))
}

fn channel_meta() -> ChannelMeta {
    ChannelMeta {
        id: ChannelId::from(Channels::Sms),
        name: String::from("SMS"),
    }
}

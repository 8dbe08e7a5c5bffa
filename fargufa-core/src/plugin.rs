//! Registry of notification channels and best-effort fan-out of alerts.

use std::sync::Arc;

use tracing::{error, info};

use crate::model::{Alert, ChannelMeta, Delivery};
use crate::ports::{Notifier, PortError};

/// Outcome of handing an alert to one channel.
#[derive(Debug)]
pub struct DeliveryReport {
    /// Channel the alert was handed to.
    pub channel: ChannelMeta,
    /// What the channel did, or why it failed.
    pub result: Result<Delivery, PortError>,
}

/// Ordered set of notification channels.
pub struct ChannelRegistry {
    channels: Vec<Arc<dyn Notifier>>,
}

impl ChannelRegistry {
    /// Build a registry; alerts go out in the given order.
    #[must_use]
    pub fn new(channels: Vec<Arc<dyn Notifier>>) -> Self {
        Self { channels }
    }

    /// Metadata for all registered channels.
    #[must_use]
    pub fn channels(&self) -> Vec<ChannelMeta> {
        self.channels
            .iter()
            .map(|notifier| notifier.channel().clone())
            .collect()
    }

    /// Hand the alert to every channel.
    ///
    /// Each channel is tried once regardless of how the others fared; failures
    /// are logged and reported, never propagated.
    pub async fn deliver_all(&self, alert: &Alert) -> Vec<DeliveryReport> {
        let mut reports = Vec::with_capacity(self.channels.len());

        for notifier in &self.channels {
            let channel = notifier.channel().clone();
            let result = notifier.notify(alert).await;

            match &result {
                Ok(Delivery::Sent) => info!(channel = %channel.id, "{} sent", channel.name),
                Ok(Delivery::Skipped) => {}
                Err(err) => error!(channel = %channel.id, "{} error: {err}", channel.name),
            }

            reports.push(DeliveryReport { channel, result });
        }

        reports
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::model::{ChannelId, Channels};

    struct StubNotifier {
        meta: ChannelMeta,
        outcome: fn() -> Result<Delivery, PortError>,
        calls: AtomicUsize,
    }

    impl StubNotifier {
        fn new(channel: Channels, outcome: fn() -> Result<Delivery, PortError>) -> Arc<Self> {
            let name = channel.to_string();
            Arc::new(Self {
                meta: ChannelMeta {
                    id: ChannelId::from(channel),
                    name,
                },
                outcome,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Notifier for StubNotifier {
        fn channel(&self) -> &ChannelMeta {
            &self.meta
        }

        async fn notify(&self, _alert: &Alert) -> Result<Delivery, PortError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.outcome)()
        }
    }

    fn alert() -> Alert {
        Alert {
            subject: "subject".to_owned(),
            body: "body".to_owned(),
            text: "text".to_owned(),
        }
    }

    #[tokio::test]
    async fn a_failing_channel_does_not_stop_the_next_one() {
        let email = StubNotifier::new(Channels::Email, || {
            Err(PortError::Delivery("535 bad credentials".to_owned()))
        });
        let sms = StubNotifier::new(Channels::Sms, || Ok(Delivery::Sent));
        let registry = ChannelRegistry::new(vec![
            Arc::clone(&email) as Arc<dyn Notifier>,
            Arc::clone(&sms) as Arc<dyn Notifier>,
        ]);

        let reports = registry.deliver_all(&alert()).await;

        assert_eq!(email.calls.load(Ordering::SeqCst), 1);
        assert_eq!(sms.calls.load(Ordering::SeqCst), 1);
        assert_eq!(reports.len(), 2);
        assert!(matches!(
            reports.first().map(|report| &report.result),
            Some(Err(PortError::Delivery(_)))
        ));
        assert!(matches!(
            reports.get(1).map(|report| &report.result),
            Some(Ok(Delivery::Sent))
        ));
    }

    #[test]
    fn lists_channels_in_registration_order() {
        let registry = ChannelRegistry::new(vec![
            StubNotifier::new(Channels::Sms, || Ok(Delivery::Skipped)) as Arc<dyn Notifier>,
            StubNotifier::new(Channels::Email, || Ok(Delivery::Skipped)) as Arc<dyn Notifier>,
        ]);

        let ids: Vec<String> = registry
            .channels()
            .into_iter()
            .map(|meta| meta.id.0)
            .collect();

        assert_eq!(ids, ["sms", "email"]);
    }
}

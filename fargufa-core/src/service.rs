//! The check pipeline: gate, fetch, locate, parse, alert.

use std::io::Write;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::CheckerConfig;
use crate::extract::{SectionLocator, parse_availability};
use crate::model::{Alert, AvailabilityResult, timestamp_label};
use crate::plugin::{ChannelRegistry, DeliveryReport};
use crate::ports::{PageSource, PortError};

/// How a single check ended.
#[derive(Debug)]
pub enum CheckOutcome {
    /// The check fell inside the quiet window and did nothing.
    QuietHours,
    /// The page had no text to search.
    SectionNotFound,
    /// The section carried no place count.
    NoAvailability,
    /// Places were found and the alert was handed to every channel.
    Notified {
        /// What was parsed from the page.
        result: AvailabilityResult,
        /// The message that went out.
        alert: Alert,
        /// Per-channel delivery results, in registry order.
        deliveries: Vec<DeliveryReport>,
    },
}

/// Entry point running one availability check.
pub struct CheckService {
    config: CheckerConfig,
    source: Arc<dyn PageSource>,
    channels: ChannelRegistry,
    locator: SectionLocator,
}

impl CheckService {
    /// Create a service for `config`, reading pages from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Pattern`] if the target location cannot be searched for.
    pub fn new(
        config: &CheckerConfig,
        source: Arc<dyn PageSource>,
        channels: ChannelRegistry,
    ) -> Result<Self, PortError> {
        Ok(Self {
            locator: SectionLocator::new(&config.target_location)?,
            config: config.clone(),
            source,
            channels,
        })
    }

    /// Run the check as of `now`, writing status lines and the alert body to `out`.
    ///
    /// Nothing-to-report cases end in `Ok`; delivery failures are reported in
    /// [`CheckOutcome::Notified`] and never turn into an error.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the page cannot be fetched, the place count
    /// cannot be parsed, or `out` cannot be written.
    pub async fn run<W: Write>(
        &self,
        now: DateTime<Utc>,
        out: &mut W,
    ) -> Result<CheckOutcome, PortError> {
        if self.config.quiet.contains(now) {
            writeln!(
                out,
                "In quiet hours ({} UTC). Skipping notifications at {}.",
                self.config.quiet,
                timestamp_label(now)
            )?;
            return Ok(CheckOutcome::QuietHours);
        }

        let html = self.source.fetch().await?;
        debug!(url = self.source.url(), bytes = html.len(), "page fetched");

        let Some(block) = self.locator.locate(&html) else {
            writeln!(
                out,
                "Could not locate {} section; exiting silently.",
                self.config.target_location
            )?;
            return Ok(CheckOutcome::SectionNotFound);
        };
        debug!(section = %block, "section located");

        let Some(result) = parse_availability(&block)? else {
            writeln!(out, "No availability; silent.")?;
            return Ok(CheckOutcome::NoAvailability);
        };

        let alert = Alert::compose(
            &self.config.target_location,
            &result,
            self.source.url(),
            now,
        );
        writeln!(out, "{}", alert.body)?;
        out.flush()?;

        let deliveries = self.channels.deliver_all(&alert).await;

        Ok(CheckOutcome::Notified {
            result,
            alert,
            deliveries,
        })
    }
}

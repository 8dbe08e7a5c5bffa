use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use fargufa_core::{
    config::CheckerConfig,
    model::Delivery,
    plugin::ChannelRegistry,
    ports::PortError,
    service::{CheckOutcome, CheckService},
};
use fargufa_provider_gmail::{self as gmail, GmailConfig};
use fargufa_provider_page as page;
use fargufa_provider_twilio::{self as twilio, TwilioConfig};
use reqwest::Client;
use tracing::{debug, info};

/// Everything a run is configured with, resolved once at startup.
pub(crate) struct Settings {
    pub checker: CheckerConfig,
    pub gmail: Option<GmailConfig>,
    pub twilio: Option<TwilioConfig>,
}

/// Wire the page source and both channels into a check service.
pub(crate) fn build_service(settings: &Settings, client: Client) -> Result<CheckService, PortError> {
    let channels = ChannelRegistry::new(vec![
        gmail::plugin(settings.gmail.clone()),
        twilio::plugin(client.clone(), settings.twilio.clone()),
    ]);
    let names: Vec<String> = channels
        .channels()
        .into_iter()
        .map(|meta| meta.name)
        .collect();
    debug!(
        url = %settings.checker.url,
        target = %settings.checker.target_location,
        channels = ?names,
        "check wired"
    );
    let source = page::source(client, settings.checker.url.clone());

    CheckService::new(&settings.checker, source, channels)
}

/// Run one check as of `now`.
pub(crate) async fn check<W: Write>(
    settings: &Settings,
    now: DateTime<Utc>,
    out: &mut W,
) -> Result<CheckOutcome> {
    let client = Client::builder().build()?;
    let service = build_service(settings, client)?;

    let outcome = service.run(now, out).await?;

    if let CheckOutcome::Notified {
        result, deliveries, ..
    } = &outcome
    {
        let sent = deliveries
            .iter()
            .filter(|report| matches!(report.result, Ok(Delivery::Sent)))
            .count();
        info!(
            places = result.places,
            times = result.times.len(),
            sent,
            "availability reported"
        );
    }

    Ok(outcome)
}

/// Line logged for a run that could not complete.
///
/// Port errors already carry their cause in their message, so the source chain is not repeated.
pub(crate) fn fatal_message(err: &anyhow::Error) -> String {
    format!("Checker error: {err}")
}

/// Process exit status for a finished run: only failures to get or read the page count.
pub(crate) fn exit_status(result: &Result<CheckOutcome>) -> u8 {
    u8::from(result.is_err())
}

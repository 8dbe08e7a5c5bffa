//! Domain data structures for availability results, alerts, and notification channels.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder shown in place of the time list when no times were found.
pub const NO_TIMES: &str = "—";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Built-in notification channels.
pub enum Channels {
    /// Email over SMTP.
    Email,
    /// Text message.
    Sms,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a notification channel.
pub struct ChannelId(pub String);

impl fmt::Display for Channels {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slug = match self {
            Channels::Email => "email",
            Channels::Sms => "sms",
        };
        write!(formatter, "{slug}")
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl From<Channels> for ChannelId {
    fn from(channel: Channels) -> Self {
        ChannelId(channel.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Metadata describing a channel and the name used in log lines.
pub struct ChannelMeta {
    /// Unique identifier.
    pub id: ChannelId,
    /// Display name, e.g. "Email".
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// What a notifier did with an alert.
pub enum Delivery {
    /// The alert was handed to the provider.
    Sent,
    /// The channel is not configured; nothing was attempted.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Free places found next to the target location.
pub struct AvailabilityResult {
    /// Number of free places.
    pub places: u64,
    /// Distinct clock times mentioned in the section, in string order.
    pub times: BTreeSet<String>,
}

impl AvailabilityResult {
    /// Times joined with `", "`, or [`NO_TIMES`] when there are none.
    #[must_use]
    pub fn times_label(&self) -> String {
        if self.times.is_empty() {
            return NO_TIMES.to_owned();
        }
        self.times
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Message sent out when places are available.
pub struct Alert {
    /// Email subject line.
    pub subject: String,
    /// Multi-line body used for email and standard output.
    pub body: String,
    /// Short single-line text for SMS.
    pub text: String,
}

impl Alert {
    /// Format the alert for `location` from a parsed result.
    #[must_use]
    pub fn compose(
        location: &str,
        result: &AvailabilityResult,
        url: &str,
        checked_at: DateTime<Utc>,
    ) -> Self {
        let places = result.places;
        let times = result.times_label();
        let confirmed = timestamp_label(checked_at);

        Self {
            subject: format!("LAUST: {location} – {places} pláss"),
            body: format!(
                "🔥 Laust í {location}!\nPláss: {places}\nTímar: {times}\nSlóð: {url}\nStaðfest: {confirmed}"
            ),
            text: format!("{location}: {places} pláss. Tímar: {times}. {url}"),
        }
    }
}

/// Render an instant the way it appears in alerts and status lines.
#[must_use]
pub fn timestamp_label(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn result(places: u64, times: &[&str]) -> AvailabilityResult {
        AvailabilityResult {
            places,
            times: times.iter().map(|time| (*time).to_owned()).collect(),
        }
    }

    #[test]
    fn empty_times_render_as_placeholder() {
        assert_eq!(result(2, &[]).times_label(), "—");
    }

    #[test]
    fn alert_embeds_count_times_url_and_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 5, 17, 14, 5, 59).unwrap();
        let alert = Alert::compose(
            "Gufunes",
            &result(3, &["14:30", "09:00"]),
            "https://fargufa.is/",
            at,
        );

        assert_eq!(alert.subject, "LAUST: Gufunes – 3 pláss");
        assert_eq!(
            alert.body,
            "🔥 Laust í Gufunes!\nPláss: 3\nTímar: 09:00, 14:30\nSlóð: https://fargufa.is/\nStaðfest: 2024-05-17 14:05 UTC"
        );
        assert_eq!(
            alert.text,
            "Gufunes: 3 pláss. Tímar: 09:00, 14:30. https://fargufa.is/"
        );
    }

    #[test]
    fn channel_ids_use_slugs() {
        assert_eq!(ChannelId::from(Channels::Email).0, "email");
        assert_eq!(ChannelId::from(Channels::Sms).to_string(), "sms");
    }
}

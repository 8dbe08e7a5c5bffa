use chrono::NaiveTime;
use clap::Parser;
use fargufa_core::{
    config::{CheckerConfig, DEFAULT_LOCATION, DEFAULT_URL},
    quiet::{QuietWindow, parse_clock},
};
use fargufa_provider_gmail::GmailConfig;
use fargufa_provider_twilio::TwilioConfig;

use crate::app::Settings;

/// Check Fargufa for free storage places and send an alert when some open up.
///
/// Every option can also be given through the environment variable shown.
#[derive(Parser)]
#[command(name = "fargufa-checker", version, about)]
pub(crate) struct Cli {
    /// Page listing the storage locations.
    #[arg(long, env = "FARGUFA_URL", default_value = DEFAULT_URL)]
    pub url: String,

    /// Location to look for on the page.
    #[arg(long, env = "TARGET_LOCATION", default_value = DEFAULT_LOCATION)]
    pub target_location: String,

    /// Start of the quiet window, HH:MM UTC (inclusive).
    #[arg(long, env = "QUIET_START", default_value = "01:00", value_parser = parse_clock)]
    pub quiet_start: NaiveTime,

    /// End of the quiet window, HH:MM UTC (exclusive).
    #[arg(long, env = "QUIET_END", default_value = "06:30", value_parser = parse_clock)]
    pub quiet_end: NaiveTime,

    /// Gmail account the alert is sent from.
    #[arg(long, env = "GMAIL_USER")]
    pub gmail_user: Option<String>,

    /// App password for the Gmail account.
    #[arg(long, env = "GMAIL_PASS", hide_env_values = true)]
    pub gmail_pass: Option<String>,

    /// Address the email alert is sent to.
    #[arg(long, env = "TO_EMAIL")]
    pub to_email: Option<String>,

    /// Twilio account SID.
    #[arg(long, env = "TWILIO_SID")]
    pub twilio_sid: Option<String>,

    /// Twilio auth token.
    #[arg(long, env = "TWILIO_TOKEN", hide_env_values = true)]
    pub twilio_token: Option<String>,

    /// Twilio sending number.
    #[arg(long, env = "TWILIO_FROM")]
    pub twilio_from: Option<String>,

    /// Number the SMS alert is sent to.
    #[arg(long, env = "TO_SMS")]
    pub to_sms: Option<String>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Exit status when the arguments could not be turned into a [`Cli`].
///
/// Help and version requests are not failures; every other parse error is a
/// configuration error and exits with 1 like any other failed check.
pub(crate) fn startup_exit_status(err: &clap::Error) -> u8 {
    u8::from(err.use_stderr())
}

impl Cli {
    /// Resolve the arguments into the settings the check runs with.
    pub(crate) fn into_settings(self) -> Settings {
        Settings {
            checker: CheckerConfig {
                url: self.url,
                target_location: self.target_location,
                quiet: QuietWindow::new(self.quiet_start, self.quiet_end),
            },
            gmail: GmailConfig::from_parts(self.gmail_user, self.gmail_pass, self.to_email),
            twilio: TwilioConfig::from_parts(
                self.twilio_sid,
                self.twilio_token,
                self.twilio_from,
                self.to_sms,
            ),
        }
    }
}

//! Settings the check service is built from.

use serde::{Deserialize, Serialize};

use crate::quiet::QuietWindow;

/// Page checked when no URL is configured.
pub const DEFAULT_URL: &str = "https://fargufa.is/";
/// Location searched for when none is configured.
pub const DEFAULT_LOCATION: &str = "Gufunes";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Where to look, what to look for, and when to stay silent.
pub struct CheckerConfig {
    /// Page listing the storage locations.
    pub url: String,
    /// Location name searched for on the page.
    pub target_location: String,
    /// Window in which the check is skipped entirely.
    pub quiet: QuietWindow,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_owned(),
            target_location: DEFAULT_LOCATION.to_owned(),
            quiet: QuietWindow::default(),
        }
    }
}

/// Treat unset and blank values alike.
#[must_use]
pub fn present(value: Option<String>) -> Option<String> {
    value.filter(|inner| !inner.trim().is_empty())
}

//! Traits describing the page source and notifier capabilities, plus the shared error type.

use std::io::Error as IoError;
use std::num::ParseIntError;

use async_trait::async_trait;
use regex::Error as RegexError;
use reqwest::Error as ReqwestError;

use crate::model::{Alert, ChannelMeta, Delivery};

#[derive(thiserror::Error, Debug)]
/// Errors raised while fetching the page, reading it, or delivering alerts.
pub enum PortError {
    /// Network layer failed or the server answered with a non-success status.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// The place count on the page is not a usable number.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseIntError),
    /// The location name could not be turned into a search pattern.
    #[error("Pattern error: {0}")]
    Pattern(#[from] RegexError),
    /// Writing a status line failed.
    #[error("Output error: {0}")]
    Output(#[from] IoError),
    /// A sender or recipient address was rejected before sending.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    /// The provider refused or failed to deliver the alert.
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

#[async_trait]
/// Trait for backends that return the raw page markup.
pub trait PageSource: Send + Sync {
    /// Address of the page, also quoted in alerts.
    fn url(&self) -> &str;

    /// Retrieve the page body.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails or the server answers with
    /// a non-success status.
    async fn fetch(&self) -> Result<String, PortError>;
}

#[async_trait]
/// Trait for a single best-effort notification channel.
pub trait Notifier: Send + Sync {
    /// Metadata describing the channel.
    fn channel(&self) -> &ChannelMeta;

    /// Deliver the alert, or return [`Delivery::Skipped`] when the channel has
    /// no configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the provider rejects the alert or cannot be
    /// reached.
    async fn notify(&self, alert: &Alert) -> Result<Delivery, PortError>;
}

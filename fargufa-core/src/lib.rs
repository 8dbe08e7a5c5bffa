//! Core types and service wiring for the Fargufa storage availability checker.

/// Checker configuration shared by all components.
pub mod config;
/// Locating the target section in a page and reading availability from it.
pub mod extract;
/// Domain models for availability results, alerts, and channels.
pub mod model;
/// Registry of notification channels.
pub mod plugin;
/// Traits describing the page source and notifier interfaces.
pub mod ports;
/// Quiet-hours time gate.
pub mod quiet;
/// The check pipeline run once per invocation.
pub mod service;

pub use config::*;
pub use extract::*;
pub use model::*;
pub use plugin::*;
pub use ports::*;
pub use quiet::*;
pub use service::*;

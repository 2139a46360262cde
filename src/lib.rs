//! Notifeed: lifecycle engine for an in-app notification feed.
//!
//! Notifeed keeps a screen's notification list in sync with a remote service and
//! animates every change to it:
//! - Full-list pulls on focus and pull-to-refresh
//! - Live push ingestion with a fade-in and glow on arrival
//! - Optimistic-after-ack removal of single notifications
//! - Staggered batch clear with a single server acknowledgment and a reconcile pull
//! - Tap-through navigation to the booking a notification refers to
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Screen events
//! │  - Event dispatch                                   │
//! │  - Pull / push ingestion                            │
//! │  - Mark-read / clear-all lifecycle                  │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Feed (feed/)  │   │ Identity      │   │ Navigation    │
//! │ - Store       │   │ (identity)    │   │ (navigation)  │
//! │ - Animations  │   │ - Storage     │   │ - Bookings    │
//! │ - View model  │   │   (storage/)  │   │ - Navigator   │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain & Infrastructure                            │
//! │  - Records, bookings, push payloads (domain/)       │
//! │  - Remote service seam (service)                    │
//! │  - Data paths (infrastructure/)                     │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```toml
//! storage_path = "~/.local/share/notifeed/storage.json"
//! role = "customer"
//! trace_level = "debug"
//! trace_file = "~/.local/share/notifeed/spans.jsonl"
//!
//! [navigation]
//! stack = "BookingStack"
//! screen = "BookingDetails"
//! param_key = "booking"
//! ```
//!
//! # Timing
//!
//! All animation timings are fixed; see [`feed::animation`]. Under a paused tokio
//! clock every flow is fully deterministic, which is how the test suite drives it.

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod domain;
pub mod feed;
pub mod identity;
pub mod infrastructure;
pub mod navigation;
pub mod observability;
pub mod service;
pub mod storage;

#[cfg(test)]
mod testing;

pub use app::{ClearAllOutcome, Event, FeedController, MarkReadOutcome, PullOutcome};
pub use domain::{ActionKind, Booking, Envelope, FeedError, NotificationRecord, PushEvent, Result};
pub use feed::{FeedViewModel, Phase, PullKind};
pub use identity::IdentityResolver;
pub use navigation::{NavigationConfig, NavigationOutcome, NavigationTarget, Navigator};
pub use service::NotificationService;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Engine configuration, usually read from a TOML file.
///
/// Every field is optional in the file; missing ones take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Key-value JSON file the signed-in user is read from.
    ///
    /// A leading `~` is expanded. Default: [`infrastructure::default_storage_path`].
    pub storage_path: Option<String>,

    /// Role discriminator sent with every notification fetch. Default: `"customer"`
    pub role: String,

    /// Booking hand-off target.
    pub navigation: NavigationConfig,

    /// Log filter when `RUST_LOG` is unset.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,

    /// File spans are exported to. Span export is off when unset.
    pub trace_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_path: None,
            role: "customer".to_string(),
            navigation: NavigationConfig::default(),
            trace_level: None,
            trace_file: None,
        }
    }
}

impl Config {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Config`] if the text is not valid TOML or a field has
    /// the wrong type.
    ///
    /// # Example
    ///
    /// ```rust
    /// use notifeed::Config;
    ///
    /// let config = Config::from_toml_str("role = \"driver\"\n[navigation]\nscreen = \"Trip\"")?;
    /// assert_eq!(config.role, "driver");
    /// assert_eq!(config.navigation.screen, "Trip");
    /// assert_eq!(config.navigation.stack, "BookingStack");
    /// # Ok::<(), notifeed::FeedError>(())
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| FeedError::Config(e.to_string()))
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Io`] if the file cannot be read and
    /// [`FeedError::Config`] if it cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = ?path, "loading configuration");
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Resolved location of the key-value store.
    #[must_use]
    pub fn resolved_storage_path(&self) -> PathBuf {
        self.storage_path.as_deref().map_or_else(infrastructure::default_storage_path, |raw| {
            PathBuf::from(infrastructure::expand_tilde(raw))
        })
    }
}

/// Builds a ready-to-use controller.
///
/// Installs tracing (first call only), opens the key-value store at
/// [`Config::resolved_storage_path`] and wires it with the given collaborators.
///
/// # Errors
///
/// Returns an error if the key-value store cannot be opened or parsed.
pub fn initialize(
    config: &Config,
    service: Arc<dyn NotificationService>,
    navigator: Arc<dyn Navigator>,
) -> Result<FeedController> {
    observability::init_tracing(config);
    tracing::debug!(role = %config.role, "initializing notification feed");

    let store = storage::JsonKeyValueStore::new(config.resolved_storage_path())?;
    Ok(FeedController::new(config, service, Arc::new(store), navigator))
}

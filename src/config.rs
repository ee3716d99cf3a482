//! Runtime configuration for order lifecycle services.
//!
//! Configuration is plain data with sensible defaults. Hosts may build it in
//! code or deserialise it from JSON; every field is optional in JSON.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Top-level configuration.
///
/// # Examples
///
/// ```
/// use orderflow::config::OrderflowConfig;
///
/// let config = OrderflowConfig::from_json_str(r#"{"notifications": {"queue_capacity": 8}}"#)
///     .expect("valid configuration");
/// assert_eq!(config.notifications.queue_capacity, 8);
/// assert_eq!(config.log_filter, "info");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderflowConfig {
    /// Notification delivery settings.
    pub notifications: NotificationConfig,
    /// Default `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for OrderflowConfig {
    fn default() -> Self {
        Self {
            notifications: NotificationConfig::default(),
            log_filter: "info".to_owned(),
        }
    }
}

impl OrderflowConfig {
    /// Parses and validates configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] when a value is out of range.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the offending field.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        self.notifications.validate()
    }
}

/// Settings for status-change notification delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Events buffered per broadcast subscriber before it starts lagging.
    pub broadcast_capacity: usize,
    /// Events buffered in the outbound dispatch queue.
    pub queue_capacity: usize,
    /// Delivery attempts per event before it is dropped.
    pub delivery_attempts: u32,
    /// Pause between delivery attempts, in milliseconds.
    pub retry_backoff_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 1024,
            queue_capacity: 256,
            delivery_attempts: 3,
            retry_backoff_ms: 100,
        }
    }
}

impl NotificationConfig {
    /// Creates a configuration that retries without pausing.
    ///
    /// Useful for tests.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            retry_backoff_ms: 0,
            ..Self::default()
        }
    }

    /// Returns the pause between delivery attempts.
    #[must_use]
    pub const fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a capacity or the attempt count
    /// is zero.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.broadcast_capacity == 0 {
            return Err(ConfigError::Invalid("notifications.broadcast_capacity"));
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::Invalid("notifications.queue_capacity"));
        }
        if self.delivery_attempts == 0 {
            return Err(ConfigError::Invalid("notifications.delivery_attempts"));
        }
        Ok(())
    }
}

/// Errors returned while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration text is not valid JSON for the schema.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds an out-of-range value.
    #[error("configuration value {0} must be positive")]
    Invalid(&'static str),
}

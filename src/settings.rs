//! User-editable feeder settings.
//!
//! Unlike [`FeederConfig`](crate::config::FeederConfig), which is fixed at
//! startup, settings change at runtime through the service and are
//! persisted through a [`SettingsPort`](crate::app::ports::SettingsPort).

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::notifications::NotificationPrefs;

/// Zones offered by the settings form.
pub const SUPPORTED_TIME_ZONES: [&str; 8] = [
    "UTC",
    "America/New_York",
    "America/Chicago",
    "America/Denver",
    "America/Los_Angeles",
    "Europe/London",
    "Europe/Paris",
    "Asia/Tokyo",
];

const MAX_NAME_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeederSettings {
    /// Display name of the feeder.
    pub feeder_name: String,
    /// Free-form location label, e.g. "Kitchen".
    pub location: String,
    /// IANA zone name; one of [`SUPPORTED_TIME_ZONES`].
    pub time_zone: String,
    /// Keep the device clock synchronised automatically.
    pub time_sync: bool,
    pub notifications: NotificationPrefs,
}

impl Default for FeederSettings {
    fn default() -> Self {
        Self {
            feeder_name: "Kitchen Feeder".to_string(),
            location: "Kitchen".to_string(),
            time_zone: "America/New_York".to_string(),
            time_sync: true,
            notifications: NotificationPrefs::default(),
        }
    }
}

impl FeederSettings {
    /// Parsed zone.  Falls back to UTC for names chrono-tz does not know;
    /// [`validate_settings`] rejects those before they are stored.
    pub fn time_zone(&self) -> Tz {
        self.time_zone.parse::<Tz>().unwrap_or(Tz::UTC)
    }
}

/// Check every field.  Invalid values are rejected, not trimmed or clamped.
pub fn validate_settings(settings: &FeederSettings) -> Result<(), ConfigError> {
    let name = settings.feeder_name.trim();
    if name.is_empty() {
        return Err(ConfigError::ValidationFailed("feeder_name must not be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ConfigError::ValidationFailed(
            "feeder_name must be at most 32 characters",
        ));
    }
    if settings.location.trim().chars().count() > MAX_NAME_LEN {
        return Err(ConfigError::ValidationFailed(
            "location must be at most 32 characters",
        ));
    }
    if !SUPPORTED_TIME_ZONES.contains(&settings.time_zone.as_str()) {
        return Err(ConfigError::ValidationFailed("time_zone is not supported"));
    }
    if settings.time_zone.parse::<Tz>().is_err() {
        return Err(ConfigError::ValidationFailed("time_zone is not a valid zone"));
    }
    Ok(())
}

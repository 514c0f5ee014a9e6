//! Controller configuration parameters
//!
//! All tunable parameters for the PawFeeder controller.
//! Values can be overridden from a JSON file at startup (see `main.rs`).

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::portion::PortionLimits;

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeederConfig {
    // --- Timing ---
    /// Main loop wake interval (seconds)
    pub poll_interval_secs: u32,
    /// How far behind `now` the auto-feed check looks for a due meal (seconds)
    pub auto_feed_lookback_secs: u32,
    /// Maximum lateness for a scheduled feed to still fire (seconds)
    pub auto_feed_grace_secs: u32,
    /// Minimum gap since the last feed before an automatic feed fires (seconds)
    pub feed_debounce_secs: u32,
    /// Dashboard report interval (seconds)
    pub dashboard_interval_secs: u32,
    /// Delay between a settings change and its auto-save (seconds)
    pub settings_autosave_secs: u32,

    // --- Portions ---
    /// Limits for schedule quantities and the dashboard "feed now" action
    pub schedule_portion: PortionLimits,
    /// Limits for the dedicated manual-feed control
    pub manual_portion: PortionLimits,
    /// Starting value of the manual portion selector (grams)
    pub default_manual_grams: u16,

    // --- Notifications ---
    /// Notifications retained before the oldest is evicted
    pub notification_capacity: usize,

    // --- Simulator ---
    /// Hopper capacity used by the simulated feeder (grams)
    pub hopper_capacity_grams: u32,
}

impl Default for FeederConfig {
    fn default() -> Self {
        Self {
            // Timing
            poll_interval_secs: 30,
            auto_feed_lookback_secs: 60,
            auto_feed_grace_secs: 120,
            feed_debounce_secs: 60,
            dashboard_interval_secs: 300, // 1/5min
            settings_autosave_secs: 5,

            // Portions
            schedule_portion: PortionLimits::new(10, 200, 5),
            manual_portion: PortionLimits::new(10, 150, 5),
            default_manual_grams: 30,

            // Notifications
            notification_capacity: 32,

            // Simulator
            hopper_capacity_grams: 2000,
        }
    }
}

/// Range-check every field.  Invalid values are rejected, not clamped.
pub fn validate_config(cfg: &FeederConfig) -> Result<(), ConfigError> {
    if !(1..=3600).contains(&cfg.poll_interval_secs) {
        return Err(ConfigError::ValidationFailed(
            "poll_interval_secs must be 1-3600",
        ));
    }
    if cfg.auto_feed_lookback_secs < cfg.poll_interval_secs {
        return Err(ConfigError::ValidationFailed(
            "auto_feed_lookback_secs must cover at least one poll interval",
        ));
    }
    if cfg.auto_feed_grace_secs < cfg.auto_feed_lookback_secs {
        return Err(ConfigError::ValidationFailed(
            "auto_feed_grace_secs must be >= auto_feed_lookback_secs",
        ));
    }
    if cfg.feed_debounce_secs > 3600 {
        return Err(ConfigError::ValidationFailed(
            "feed_debounce_secs must be 0-3600",
        ));
    }
    if cfg.dashboard_interval_secs == 0 {
        return Err(ConfigError::ValidationFailed(
            "dashboard_interval_secs must be > 0",
        ));
    }
    for limits in [&cfg.schedule_portion, &cfg.manual_portion] {
        if limits.min == 0 || limits.min > limits.max || limits.step == 0 {
            return Err(ConfigError::ValidationFailed(
                "portion limits must satisfy 0 < min <= max and step > 0",
            ));
        }
    }
    if !cfg.manual_portion.contains(cfg.default_manual_grams) {
        return Err(ConfigError::ValidationFailed(
            "default_manual_grams must lie within manual_portion",
        ));
    }
    if !(1..=256).contains(&cfg.notification_capacity) {
        return Err(ConfigError::ValidationFailed(
            "notification_capacity must be 1-256",
        ));
    }
    if cfg.hopper_capacity_grams == 0 {
        return Err(ConfigError::ValidationFailed(
            "hopper_capacity_grams must be > 0",
        ));
    }
    Ok(())
}

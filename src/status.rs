//! Feeder status as shown on the dashboard.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Coarse hopper fill level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoodLevel {
    Full,
    Okay,
    Low,
    Empty,
}

impl FoodLevel {
    /// Map a hopper fill percentage (0–100) to a level.
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            75.. => Self::Full,
            25..=74 => Self::Okay,
            1..=24 => Self::Low,
            0 => Self::Empty,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Full => "Full",
            Self::Okay => "Okay",
            Self::Low => "Low",
            Self::Empty => "Empty",
        }
    }

    /// `Low` or `Empty`: time to refill.
    pub fn needs_refill(&self) -> bool {
        matches!(self, Self::Low | Self::Empty)
    }
}

/// Where the feeder draws power from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerSource {
    Mains,
    /// Battery charge in percent, when the feeder reports it.
    Battery { percent: Option<u8> },
}

impl PowerSource {
    pub fn label(&self) -> String {
        match self {
            Self::Mains => "Mains".to_string(),
            Self::Battery { percent: Some(p) } => format!("Battery ({p}%)"),
            Self::Battery { percent: None } => "Battery".to_string(),
        }
    }
}

/// One poll of the feeder hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceReading {
    pub connected: bool,
    pub power: PowerSource,
    pub food_level: FoodLevel,
}

/// Everything the dashboard's status card shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeederStatus {
    pub connected: bool,
    pub power: PowerSource,
    /// Local time of the last successful dispense.
    pub last_fed: Option<NaiveDateTime>,
    pub food_level: FoodLevel,
}

impl Default for FeederStatus {
    fn default() -> Self {
        Self {
            connected: true,
            power: PowerSource::Mains,
            last_fed: None,
            food_level: FoodLevel::Okay,
        }
    }
}

impl FeederStatus {
    pub fn connection_label(&self) -> &'static str {
        if self.connected { "Connected" } else { "Offline" }
    }

    /// Fold a device poll into the status.  Keeps `last_fed`.
    pub fn apply(&mut self, reading: DeviceReading) {
        self.connected = reading.connected;
        self.power = reading.power;
        self.food_level = reading.food_level;
    }
}

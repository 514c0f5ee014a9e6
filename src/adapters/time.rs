//! Wall-clock adapter.
//!
//! Implements [`ClockPort`] by converting the system UTC time into the
//! feeder's configured zone and dropping the offset.  Schedules are
//! expressed in device-local wall time, so every comparison downstream
//! works on `NaiveDateTime`.

use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use log::info;

use crate::app::ports::ClockPort;

pub struct SystemClock {
    zone: Tz,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl SystemClock {
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }

    /// Follow a settings change.
    pub fn set_time_zone(&mut self, zone: Tz) {
        if zone != self.zone {
            info!("SystemClock: time zone {} -> {}", self.zone.name(), zone.name());
            self.zone = zone;
        }
    }

    pub fn time_zone(&self) -> Tz {
        self.zone
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.zone).naive_local()
    }
}

//! Simulated feeder: a hopper model behind the device ports.
//!
//! Stands in for the real dispenser so the host binary can run the full
//! loop.  Food drains from a gram counter; jams and disconnects can be
//! injected for demos and tests.

use log::{debug, info};

use crate::app::ports::{DevicePort, DispenseError, DispenserPort};
use crate::status::{DeviceReading, FoodLevel, PowerSource};

pub struct SimulatedFeeder {
    hopper_grams: u32,
    capacity_grams: u32,
    connected: bool,
    power: PowerSource,
    /// Number of upcoming dispenses that will jam.
    pending_jams: u32,
    dispensed_total: u32,
}

impl SimulatedFeeder {
    /// A full hopper on mains power.
    pub fn new(capacity_grams: u32) -> Self {
        Self {
            hopper_grams: capacity_grams,
            capacity_grams: capacity_grams.max(1),
            connected: true,
            power: PowerSource::Mains,
            pending_jams: 0,
            dispensed_total: 0,
        }
    }

    pub fn refill(&mut self) {
        self.hopper_grams = self.capacity_grams;
        info!("SimulatedFeeder: hopper refilled to {}g", self.capacity_grams);
    }

    pub fn set_hopper_grams(&mut self, grams: u32) {
        self.hopper_grams = grams.min(self.capacity_grams);
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    pub fn set_power(&mut self, power: PowerSource) {
        self.power = power;
    }

    /// Make the next `count` dispenses fail with [`DispenseError::Jammed`].
    pub fn inject_jams(&mut self, count: u32) {
        self.pending_jams = count;
    }

    pub fn hopper_grams(&self) -> u32 {
        self.hopper_grams
    }

    pub fn dispensed_total(&self) -> u32 {
        self.dispensed_total
    }

    /// Hopper fill in percent, rounded down.
    pub fn fill_percent(&self) -> u8 {
        let pct = u64::from(self.hopper_grams) * 100 / u64::from(self.capacity_grams);
        pct.min(100) as u8
    }
}

impl DevicePort for SimulatedFeeder {
    fn read_status(&mut self) -> DeviceReading {
        DeviceReading {
            connected: self.connected,
            power: self.power,
            food_level: FoodLevel::from_percent(self.fill_percent()),
        }
    }
}

impl DispenserPort for SimulatedFeeder {
    fn dispense(&mut self, grams: u16) -> Result<(), DispenseError> {
        if !self.connected {
            return Err(DispenseError::Offline);
        }
        if self.pending_jams > 0 {
            self.pending_jams -= 1;
            return Err(DispenseError::Jammed);
        }
        if self.hopper_grams == 0 {
            return Err(DispenseError::HopperEmpty);
        }
        // A short last portion still counts as a feed.
        let delivered = u32::from(grams).min(self.hopper_grams);
        self.hopper_grams -= delivered;
        self.dispensed_total += delivered;
        debug!(
            "SimulatedFeeder: dispensed {}g, {}g left",
            delivered, self.hopper_grams
        );
        Ok(())
    }
}

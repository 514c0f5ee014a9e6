//! Mock feeder and storage adapters for integration tests.
//!
//! Records every dispense so tests can assert on the full command
//! history without a real auger.

use std::cell::Cell;
use std::collections::{HashMap, VecDeque};

use chrono::{NaiveDate, NaiveDateTime};
use pawfeeder::app::commands::AppCommand;
use pawfeeder::app::events::AppEvent;
use pawfeeder::app::ports::{
    ConfigError, DevicePort, DispenseError, DispenserPort, EventSink, SchedulerDelegate,
    SettingsPort, StorageError, StoragePort,
};
use pawfeeder::schedule::Occurrence;
use pawfeeder::settings::{FeederSettings, validate_settings};
use pawfeeder::status::{DeviceReading, FoodLevel, PowerSource};

/// 2024-01-01 (a Monday) at the given wall time.
pub fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    on(1, h, m, s)
}

/// January 2024, day `d`, at the given wall time.
pub fn on(d: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, d)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

// ── MockFeeder ────────────────────────────────────────────────

pub struct MockFeeder {
    /// Grams of every successful dispense, in order.
    pub dispensed: Vec<u16>,
    /// Every dispense attempt, successful or not.
    pub attempts: u32,
    /// Error returned by the next dispenses while `fail_count > 0`.
    pub fail_with: DispenseError,
    pub fail_count: u32,
    pub reading: DeviceReading,
}

#[allow(dead_code)]
impl MockFeeder {
    pub fn new() -> Self {
        Self {
            dispensed: Vec::new(),
            attempts: 0,
            fail_with: DispenseError::Jammed,
            fail_count: 0,
            reading: DeviceReading {
                connected: true,
                power: PowerSource::Mains,
                food_level: FoodLevel::Full,
            },
        }
    }

    pub fn fail_next(&mut self, error: DispenseError, count: u32) {
        self.fail_with = error;
        self.fail_count = count;
    }

    pub fn total_grams(&self) -> u32 {
        self.dispensed.iter().map(|g| u32::from(*g)).sum()
    }
}

impl Default for MockFeeder {
    fn default() -> Self {
        Self::new()
    }
}

impl DevicePort for MockFeeder {
    fn read_status(&mut self) -> DeviceReading {
        self.reading
    }
}

impl DispenserPort for MockFeeder {
    fn dispense(&mut self, grams: u16) -> Result<(), DispenseError> {
        self.attempts += 1;
        if self.fail_count > 0 {
            self.fail_count -= 1;
            return Err(self.fail_with);
        }
        self.dispensed.push(grams);
        Ok(())
    }
}

// ── MockStore ─────────────────────────────────────────────────

pub struct MockStore {
    store: HashMap<String, Vec<u8>>,
    pub saved: Cell<Option<FeederSettings>>,
    pub save_count: Cell<u32>,
    /// Writes to this key fail while `write_failures` is non-zero.
    failing_key: Option<&'static str>,
    write_failures: u32,
}

#[allow(dead_code)]
impl MockStore {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
            saved: Cell::new(None),
            save_count: Cell::new(0),
            failing_key: None,
            write_failures: 0,
        }
    }

    /// Make the next `count` writes to `key` fail with an I/O error.
    pub fn fail_writes(&mut self, key: &'static str, count: u32) {
        self.failing_key = Some(key);
        self.write_failures = count;
    }

    pub fn last_saved(&self) -> Option<FeederSettings> {
        let value = self.saved.take();
        self.saved.set(value.clone());
        value
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StoragePort for MockStore {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        let k = format!("{}::{}", namespace, key);
        match self.store.get(&k) {
            Some(v) => {
                let n = v.len().min(buf.len());
                buf[..n].copy_from_slice(&v[..n]);
                Ok(n)
            }
            None => Err(StorageError::NotFound),
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        if self.write_failures > 0 && self.failing_key == Some(key) {
            self.write_failures -= 1;
            return Err(StorageError::IoError);
        }
        self.store
            .insert(format!("{}::{}", namespace, key), data.to_vec());
        Ok(())
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        self.store.contains_key(&format!("{}::{}", namespace, key))
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        self.store.remove(&format!("{}::{}", namespace, key));
        Ok(())
    }
}

impl SettingsPort for MockStore {
    fn load(&self) -> Result<FeederSettings, ConfigError> {
        Ok(self.last_saved().unwrap_or_default())
    }

    fn save(&self, settings: &FeederSettings) -> Result<(), ConfigError> {
        validate_settings(settings)?;
        self.saved.set(Some(settings.clone()));
        self.save_count.set(self.save_count.get() + 1);
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn dispensed(&self) -> usize {
        self.count(|e| matches!(e, AppEvent::Dispensed { .. }))
    }

    pub fn dashboards(&self) -> usize {
        self.count(|e| matches!(e, AppEvent::Dashboard(_)))
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── QueueDelegate ─────────────────────────────────────────────

#[derive(Default)]
pub struct QueueDelegate {
    pub queue: VecDeque<AppCommand>,
}

impl SchedulerDelegate for QueueDelegate {
    fn on_feed_due(&mut self, occurrence: &Occurrence) {
        self.queue.push_back(AppCommand::ScheduledFeed(*occurrence));
    }
}

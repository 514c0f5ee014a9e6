//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ FeederService (domain)
//! ```
//!
//! Driven adapters (feeder hardware, clock, event sinks, storage) implement
//! these traits.  The [`FeederService`](super::service::FeederService)
//! consumes them via generics, so the domain core never touches a device,
//! a wall clock or a flash partition directly.
//!
//! - **SettingsPort** implementations MUST validate before persisting.
//! - All port errors are typed; callers must handle every variant explicitly.

use chrono::NaiveDateTime;

use crate::schedule::Occurrence;
use crate::settings::FeederSettings;
use crate::status::DeviceReading;

// ───────────────────────────────────────────────────────────────
// Device port (driven adapter: feeder → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to learn the feeder's condition.
pub trait DevicePort {
    /// Poll connection, power and hopper state.
    fn read_status(&mut self) -> DeviceReading;
}

// ───────────────────────────────────────────────────────────────
// Dispenser port (driven adapter: domain → feeder)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to release food.
pub trait DispenserPort {
    /// Dispense `grams` of food.  Blocks until the auger stops.
    fn dispense(&mut self, grams: u16) -> Result<(), DispenseError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Device-local wall clock.
pub trait ClockPort {
    /// Current local date and time (no zone attached).
    fn now(&self) -> NaiveDateTime;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / UI)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (log, UI push, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Settings port (driven adapter: domain ↔ persistent settings)
// ───────────────────────────────────────────────────────────────

/// Loads and persists user-editable feeder settings.
///
/// Implementations MUST validate before persisting.  Invalid values are
/// rejected with [`ConfigError::ValidationFailed`], not silently fixed up.
pub trait SettingsPort {
    /// Load settings from storage.
    /// Returns [`FeederSettings::default()`] if nothing is stored.
    fn load(&self) -> Result<FeederSettings, ConfigError>;

    /// Validate and persist settings.
    fn save(&self, settings: &FeederSettings) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ key/value store)
// ───────────────────────────────────────────────────────────────

/// Persistent key-value storage for settings blobs and the feed log.
///
/// Keys are namespaced to prevent collisions between subsystems.
/// Write operations MUST be atomic; no partial writes.
pub trait StoragePort {
    /// Read a value.  Returns the number of bytes written to `buf`.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Delete a key.  Returns `Ok(())` even if the key didn't exist.
    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError>;

    /// Check whether a key exists without reading it.
    fn exists(&self, namespace: &str, key: &str) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate (decouples scheduler from command dispatch)
// ───────────────────────────────────────────────────────────────

/// Callback trait that the scheduler invokes when a meal is due.
///
/// This decouples the [`FeedScheduler`](crate::scheduler::FeedScheduler)
/// from the service.  The main loop implements this by queueing an
/// [`AppCommand::ScheduledFeed`](super::commands::AppCommand::ScheduledFeed),
/// but the scheduler itself knows nothing about commands or dispensers.
pub trait SchedulerDelegate {
    /// Called once per due occurrence.
    fn on_feed_due(&mut self, occurrence: &Occurrence);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`DispenserPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispenseError {
    /// The auger stalled; food may be stuck.
    Jammed,
    /// The hopper has no food left.
    HopperEmpty,
    /// The feeder is not reachable.
    Offline,
}

/// Errors from [`SettingsPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No settings found in storage.
    NotFound,
    /// Stored settings failed deserialization.
    Corrupted,
    /// A field failed validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Underlying storage is full.
    StorageFull,
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Storage is full.
    Full,
    /// Generic I/O error.
    IoError,
}

impl core::fmt::Display for DispenseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Jammed => write!(f, "feeder jammed"),
            Self::HopperEmpty => write!(f, "hopper empty"),
            Self::Offline => write!(f, "feeder offline"),
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::StorageFull => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for DispenseError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for StorageError {}

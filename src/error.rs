//! Unified error types for the PawFeeder controller.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! command dispatch path's error handling uniform.  Variants are `Copy`
//! so they can be returned from command handlers and carried in events
//! without allocation.

use core::fmt;

use crate::app::ports::{ConfigError, DispenseError, StorageError};
use crate::notifications::NotificationId;
use crate::schedule::ScheduleId;

// ---------------------------------------------------------------------------
// Top-level controller error
// ---------------------------------------------------------------------------

/// Every fallible command in the controller funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Caller-supplied data failed a range or shape check.
    Validation(ValidationError),
    /// The dispenser could not deliver food.
    Dispense(DispenseError),
    /// No schedule with this id exists.
    ScheduleNotFound(ScheduleId),
    /// No notification with this id exists.
    NotificationNotFound(NotificationId),
    /// The schedule table is at capacity.
    ScheduleBookFull,
    /// Settings could not be loaded or persisted.
    Config(ConfigError),
    /// Key/value storage failed.
    Storage(StorageError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(e) => write!(f, "validation: {e}"),
            Self::Dispense(e) => write!(f, "dispense: {e}"),
            Self::ScheduleNotFound(id) => write!(f, "schedule {id} not found"),
            Self::NotificationNotFound(id) => write!(f, "notification {id} not found"),
            Self::ScheduleBookFull => write!(f, "schedule table full"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Portion is outside the allowed gram range.
    QuantityOutOfRange { grams: u16, min: u16, max: u16 },
    /// A specific-days schedule has no days selected.
    NoDaysSelected,
    /// A settings field was rejected.  Describes which field and why.
    Field(&'static str),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuantityOutOfRange { grams, min, max } => {
                write!(f, "amount {grams}g must be {min}-{max}g")
            }
            Self::NoDaysSelected => write!(f, "no days selected"),
            Self::Field(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DispenseError> for Error {
    fn from(e: DispenseError) -> Self {
        Self::Dispense(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Controller-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

//! PawFeeder controller library.
//!
//! The controller core for a networked pet feeder: schedules, the
//! next-feed calculator, the auto-feed scheduler, notifications and
//! settings behind a single application service.  Exposed as a library
//! for integration testing and for the host simulator binary.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod error;
pub mod format;
pub mod history;
pub mod notifications;
pub mod portion;
pub mod schedule;
pub mod scheduler;
pub mod settings;
pub mod status;

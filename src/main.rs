//! PawFeeder host simulator: main entry point.
//!
//! Runs the controller loop against a simulated feeder.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SimulatedFeeder     LogEventSink   MemoryStore   SystemClock  │
//! │  (Device+Dispenser)  (EventSink)    (Settings+KV) (ClockPort)  │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            FeederService (pure logic)                  │    │
//! │  │  Schedules · Status · Notifications · Settings         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  FeedScheduler (delegate-driven)                               │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::collections::VecDeque;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};

use pawfeeder::adapters::log_sink::LogEventSink;
use pawfeeder::adapters::simulated::SimulatedFeeder;
use pawfeeder::adapters::store::MemoryStore;
use pawfeeder::adapters::time::SystemClock;
use pawfeeder::app::commands::AppCommand;
use pawfeeder::app::ports::{ClockPort, DevicePort, SchedulerDelegate, SettingsPort};
use pawfeeder::app::service::FeederService;
use pawfeeder::config::{FeederConfig, validate_config};
use pawfeeder::schedule::Occurrence;
use pawfeeder::scheduler::FeedScheduler;
use pawfeeder::settings::FeederSettings;
use pawfeeder::status::FoodLevel;

/// JSON file overriding [`FeederConfig`] defaults.
const CONFIG_ENV: &str = "PAWFEEDER_CONFIG";
/// Stop after this many polls (unset: run forever).
const MAX_TICKS_ENV: &str = "PAWFEEDER_MAX_TICKS";

// ── Scheduler delegate ────────────────────────────────────────
//
// Bridges the scheduler (which knows nothing about commands) to the
// service: a due meal becomes a queued `ScheduledFeed` command that the
// loop dispatches on the same poll.

#[derive(Default)]
struct CommandQueueDelegate {
    queue: VecDeque<AppCommand>,
}

impl SchedulerDelegate for CommandQueueDelegate {
    fn on_feed_due(&mut self, occurrence: &Occurrence) {
        info!(
            "Meal due: {} at {} ({}g)",
            occurrence.schedule, occurrence.at, occurrence.quantity
        );
        self.queue.push_back(AppCommand::ScheduledFeed(*occurrence));
    }
}

fn load_config() -> Result<FeederConfig> {
    let Ok(path) = std::env::var(CONFIG_ENV) else {
        info!("{} not set, using default config", CONFIG_ENV);
        return Ok(FeederConfig::default());
    };
    let text =
        std::fs::read_to_string(&path).with_context(|| format!("reading config file {path}"))?;
    let config: FeederConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing config file {path}"))?;
    validate_config(&config).with_context(|| format!("validating config file {path}"))?;
    info!("Config loaded from {}", path);
    Ok(config)
}

fn max_ticks() -> Result<Option<u64>> {
    match std::env::var(MAX_TICKS_ENV) {
        Ok(v) => Ok(Some(
            v.parse()
                .with_context(|| format!("{MAX_TICKS_ENV} must be a number, got '{v}'"))?,
        )),
        Err(_) => Ok(None),
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("╔══════════════════════════════════════╗");
    info!("║  PawFeeder v{}                    ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Config + settings ──────────────────────────────────
    let config = load_config()?;
    let max_ticks = max_ticks()?;

    let mut store = MemoryStore::new();
    let settings = match store.load() {
        Ok(s) => s,
        Err(e) => {
            warn!("Settings load failed ({}), using defaults", e);
            FeederSettings::default()
        }
    };

    // ── 3. Construct adapters ─────────────────────────────────
    let mut clock = SystemClock::new(settings.time_zone());
    let mut feeder = SimulatedFeeder::new(config.hopper_capacity_grams);
    let mut log_sink = LogEventSink::new();
    let mut sched = FeedScheduler::new(&config);
    let mut sched_delegate = CommandQueueDelegate::default();

    // ── 4. Construct app service ──────────────────────────────
    let mut app = FeederService::new(config.clone(), settings);
    app.restore_history(&store);
    app.start(&mut log_sink);

    if let Some(next) = app.next_feed(clock.now()) {
        info!("First meal: {} at {} ({}g)", next.schedule, next.at, next.quantity);
    }
    info!("System ready. Entering poll loop.");

    // ── 5. Poll loop ──────────────────────────────────────────
    let poll = Duration::from_secs(u64::from(config.poll_interval_secs));
    let mut ticks: u64 = 0;

    loop {
        let now = clock.now();

        app.tick(now, &mut feeder, &mut log_sink);
        sched.tick(
            now,
            app.schedules().as_slice(),
            app.status().last_fed,
            &mut sched_delegate,
        );

        while let Some(cmd) = sched_delegate.queue.pop_front() {
            // Failures are logged and notified by the service.
            if app.handle_command(cmd, now, &mut feeder, &mut log_sink).is_err()
                && feeder.read_status().food_level == FoodLevel::Empty
            {
                feeder.refill();
            }
        }

        app.persist_history(&mut store);
        app.auto_save_if_needed(&store, now);
        clock.set_time_zone(app.settings().time_zone());

        ticks += 1;
        if max_ticks.is_some_and(|max| ticks >= max) {
            info!("Reached {} polls, shutting down", ticks);
            break;
        }
        std::thread::sleep(poll);
    }

    app.force_save_if_dirty(&store);
    Ok(())
}

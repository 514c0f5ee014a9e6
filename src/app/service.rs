//! Application service: the hexagonal core.
//!
//! [`FeederService`] owns the schedule book, feeder status, notifications
//! and user settings.  It exposes a clean, hardware-agnostic API.  All I/O
//! flows through port traits injected at call sites, making the entire
//! service testable with mock adapters.
//!
//! ```text
//!    DevicePort ──▶ ┌────────────────────────────┐ ──▶ EventSink
//!                   │       FeederService         │
//! DispenserPort ◀──│ Schedules · Status · Notify │ ◀─▶ SettingsPort
//!                   └────────────────────────────┘ ──▶ StoragePort (history)
//! ```

use std::collections::VecDeque;

use chrono::{NaiveDateTime, TimeDelta};
use log::{info, warn};

use crate::config::FeederConfig;
use crate::error::Result;
use crate::format;
use crate::history::{FEED_LOG_SLOTS, FeedLog, FeedRecord, FeedTrigger};
use crate::notifications::{NotificationCenter, NotificationKind};
use crate::portion::PortionSelector;
use crate::schedule::{Occurrence, ScheduleBook, next_occurrence};
use crate::settings::{FeederSettings, validate_settings};
use crate::status::FeederStatus;

use super::commands::AppCommand;
use super::events::{AppEvent, DashboardView, ScheduleChange};
use super::ports::{
    DevicePort, DispenseError, DispenserPort, EventSink, SettingsPort, StoragePort,
};

const MSG_JAMMED: &str = "Feeder jammed. Please check the dispenser unit.";
const MSG_LOW_FOOD: &str = "Low food level detected. Refill soon.";
const MSG_CONNECTION_LOST: &str = "Feeder connection lost.";

// ───────────────────────────────────────────────────────────────
// FeederService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct FeederService {
    config: FeederConfig,
    settings: FeederSettings,
    book: ScheduleBook,
    status: FeederStatus,
    notifications: NotificationCenter,
    feed_log: FeedLog,
    /// Dispenses not yet written to the feed log.  Bounded like the log
    /// itself; the oldest is dropped when the store keeps failing.
    pending_records: VecDeque<FeedRecord>,
    settings_dirty: bool,
    dirty_since: Option<NaiveDateTime>,
    /// Explicit save requested; skips the auto-save delay.
    save_requested: bool,
    last_dashboard: Option<NaiveDateTime>,
}

impl FeederService {
    /// Construct the service with the default schedule set.
    ///
    /// Does **not** emit anything. Call [`start`](Self::start) next.
    pub fn new(config: FeederConfig, settings: FeederSettings) -> Self {
        let book = ScheduleBook::with_defaults(config.schedule_portion);
        let notifications = NotificationCenter::new(config.notification_capacity);
        Self {
            config,
            settings,
            book,
            status: FeederStatus::default(),
            notifications,
            feed_log: FeedLog::new(),
            pending_records: VecDeque::with_capacity(FEED_LOG_SLOTS),
            settings_dirty: false,
            dirty_since: None,
            save_requested: false,
            last_dashboard: None,
        }
    }

    /// Replace the schedule book (e.g. an empty one for a fresh feeder).
    pub fn with_schedules(mut self, book: ScheduleBook) -> Self {
        self.book = book;
        self
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started {
            schedules: self.book.len(),
            active: self.book.active_count(),
        });
        info!(
            "FeederService started: '{}' with {} schedules ({} active)",
            self.settings.feeder_name,
            self.book.len(),
            self.book.active_count()
        );
    }

    /// Reload the feed log index and last-fed time from storage.
    pub fn restore_history(&mut self, store: &dyn StoragePort) {
        self.feed_log.init(store);
        if let Some(latest) = self.feed_log.latest(store) {
            self.status.last_fed = Some(latest.at);
            info!("FeederService: last fed {} ({}g)", latest.at, latest.grams);
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Poll the feeder, post transition warnings, and emit the dashboard
    /// snapshot when it is due.
    pub fn tick(&mut self, now: NaiveDateTime, hw: &mut impl DevicePort, sink: &mut impl EventSink) {
        let prev = self.status;
        self.status.apply(hw.read_status());
        let prefs = self.settings.notifications;

        if prev.connected && !self.status.connected {
            warn!("Feeder went offline");
            if prefs.connection_lost {
                self.notify(NotificationKind::Warning, MSG_CONNECTION_LOST, now, sink);
            }
        }
        if !prev.food_level.needs_refill() && self.status.food_level.needs_refill() {
            warn!("Food level dropped to {}", self.status.food_level.label());
            if prefs.low_food {
                self.notify(NotificationKind::Warning, MSG_LOW_FOOD, now, sink);
            }
        }
        if self.status != prev {
            sink.emit(&AppEvent::StatusChanged(self.status));
        }

        let interval = TimeDelta::seconds(i64::from(self.config.dashboard_interval_secs));
        if self.last_dashboard.is_none_or(|t| now - t >= interval) {
            self.last_dashboard = Some(now);
            sink.emit(&AppEvent::Dashboard(self.dashboard(now)));
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command.  Rejected commands leave state
    /// unchanged and are logged before the error is returned.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        now: NaiveDateTime,
        hw: &mut impl DispenserPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let label = command_label(&cmd);
        let result = self.apply_command(cmd, now, hw, sink);
        if let Err(e) = &result {
            warn!("Command {} rejected: {}", label, e);
        }
        result
    }

    fn apply_command(
        &mut self,
        cmd: AppCommand,
        now: NaiveDateTime,
        hw: &mut impl DispenserPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        match cmd {
            AppCommand::FeedNow { grams } => {
                let grams = self.config.schedule_portion.check(grams)?;
                self.dispense(grams, FeedTrigger::Manual, now, hw, sink)
            }
            AppCommand::ManualFeed { grams } => {
                let grams = self.config.manual_portion.check(grams)?;
                self.dispense(grams, FeedTrigger::Manual, now, hw, sink)
            }
            AppCommand::ScheduledFeed(occurrence) => self.scheduled_feed(occurrence, now, hw, sink),
            AppCommand::AddSchedule(draft) => {
                let id = self.book.add(draft)?;
                sink.emit(&AppEvent::ScheduleChanged {
                    id,
                    change: ScheduleChange::Added,
                });
                Ok(())
            }
            AppCommand::UpdateSchedule { id, draft } => {
                self.book.update(id, draft)?;
                sink.emit(&AppEvent::ScheduleChanged {
                    id,
                    change: ScheduleChange::Updated,
                });
                Ok(())
            }
            AppCommand::DeleteSchedule(id) => {
                self.book.remove(id)?;
                sink.emit(&AppEvent::ScheduleChanged {
                    id,
                    change: ScheduleChange::Removed,
                });
                Ok(())
            }
            AppCommand::ToggleSchedule(id) => {
                let enabled = self.book.toggle(id)?;
                let change = if enabled {
                    ScheduleChange::Enabled
                } else {
                    ScheduleChange::Disabled
                };
                sink.emit(&AppEvent::ScheduleChanged { id, change });
                Ok(())
            }
            AppCommand::MarkNotificationRead(id) => self.notifications.mark_read(id),
            AppCommand::DeleteNotification(id) => self.notifications.delete(id).map(|_| ()),
            AppCommand::ClearNotifications => {
                self.notifications.clear_all();
                Ok(())
            }
            AppCommand::UpdateSettings(settings) => {
                validate_settings(&settings)?;
                self.settings = settings;
                self.mark_settings_dirty(now);
                sink.emit(&AppEvent::SettingsUpdated);
                info!("Settings updated at runtime");
                Ok(())
            }
            AppCommand::SaveSettings => {
                self.save_requested = true;
                self.mark_settings_dirty(now);
                info!("Explicit settings save requested (will flush on next auto-save check)");
                Ok(())
            }
        }
    }

    /// Dispense for a due occurrence if its schedule still exists and is
    /// enabled.  Stale occurrences are dropped silently.
    fn scheduled_feed(
        &mut self,
        occurrence: Occurrence,
        now: NaiveDateTime,
        hw: &mut impl DispenserPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let Some(grams) = self
            .book
            .get(occurrence.schedule)
            .filter(|s| s.enabled)
            .map(|s| s.quantity)
        else {
            info!(
                "Skipping feed for {}: schedule removed or disabled",
                occurrence.schedule
            );
            return Ok(());
        };

        self.dispense(grams, FeedTrigger::Scheduled(occurrence.schedule), now, hw, sink)?;

        if self.settings.notifications.feed_confirm {
            let message = format!(
                "Scheduled feed at {} completed successfully ({}g).",
                format::clock_time(occurrence.at),
                grams
            );
            self.notify(NotificationKind::Info, message, now, sink);
        }
        Ok(())
    }

    fn dispense(
        &mut self,
        grams: u16,
        trigger: FeedTrigger,
        now: NaiveDateTime,
        hw: &mut impl DispenserPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        match hw.dispense(grams) {
            Ok(()) => {
                self.status.last_fed = Some(now);
                if self.pending_records.len() == FEED_LOG_SLOTS {
                    if let Some(dropped) = self.pending_records.pop_front() {
                        warn!("Feed log backlog full, dropping record from {}", dropped.at);
                    }
                }
                self.pending_records.push_back(FeedRecord {
                    at: now,
                    grams,
                    trigger,
                });
                sink.emit(&AppEvent::Dispensed { grams, trigger });
                Ok(())
            }
            Err(error) => {
                warn!("Dispense of {}g failed: {}", grams, error);
                sink.emit(&AppEvent::DispenseFailed { trigger, error });
                let prefs = self.settings.notifications;
                match error {
                    DispenseError::Jammed if prefs.feeder_jam => {
                        self.notify(NotificationKind::Error, MSG_JAMMED, now, sink);
                    }
                    DispenseError::HopperEmpty if prefs.low_food => {
                        self.notify(NotificationKind::Warning, MSG_LOW_FOOD, now, sink);
                    }
                    _ => {}
                }
                Err(error.into())
            }
        }
    }

    fn notify(
        &mut self,
        kind: NotificationKind,
        message: impl Into<String>,
        now: NaiveDateTime,
        sink: &mut impl EventSink,
    ) {
        let id = self.notifications.post(kind, message, now);
        sink.emit(&AppEvent::NotificationPosted { id, kind });
    }

    // ── Feed history ──────────────────────────────────────────

    /// Write pending dispenses to the feed log.  Returns how many were
    /// written; failed writes stay queued for the next call.
    pub fn persist_history(&mut self, store: &mut dyn StoragePort) -> usize {
        let mut written = 0;
        while let Some(record) = self.pending_records.front().copied() {
            if let Err(e) = self.feed_log.write_entry(store, &record) {
                warn!("Feed log write failed: {}", e);
                break;
            }
            self.pending_records.pop_front();
            written += 1;
        }
        written
    }

    /// Persisted feeds, oldest first.
    pub fn feed_history(&self, store: &dyn StoragePort) -> heapless::Vec<FeedRecord, FEED_LOG_SLOTS> {
        self.feed_log.read_all(store)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn status(&self) -> &FeederStatus {
        &self.status
    }

    pub fn schedules(&self) -> &ScheduleBook {
        &self.book
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn settings(&self) -> &FeederSettings {
        &self.settings
    }

    pub fn config(&self) -> &FeederConfig {
        &self.config
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.unread_count()
    }

    /// Next meal strictly after `now`.
    pub fn next_feed(&self, now: NaiveDateTime) -> Option<Occurrence> {
        next_occurrence(self.book.as_slice(), now)
    }

    /// Selector for the manual feed control, at its configured default.
    pub fn manual_selector(&self) -> PortionSelector {
        PortionSelector::new(self.config.manual_portion, self.config.default_manual_grams)
    }

    pub fn dashboard(&self, now: NaiveDateTime) -> DashboardView {
        let next = self.next_feed(now);
        DashboardView {
            feeder_name: self.settings.feeder_name.clone(),
            status: self.status,
            next_meal: format::next_meal_label(next.as_ref(), now),
            last_fed: format::last_fed_label(self.status.last_fed, now),
            active_schedules: self.book.active_count(),
            unread_notifications: self.notifications.unread_count(),
        }
    }

    // ── Settings dirty-flag management ────────────────────────

    fn mark_settings_dirty(&mut self, now: NaiveDateTime) {
        if !self.settings_dirty {
            self.settings_dirty = true;
            self.dirty_since = Some(now);
        }
    }

    /// Save once the settings have been dirty for the auto-save delay, or
    /// immediately after an explicit save request.  Returns `true` if saved.
    pub fn auto_save_if_needed(&mut self, port: &impl SettingsPort, now: NaiveDateTime) -> bool {
        if !self.settings_dirty {
            return false;
        }
        let delay = TimeDelta::seconds(i64::from(self.config.settings_autosave_secs));
        let waited = self.dirty_since.is_some_and(|since| now - since >= delay);
        if !self.save_requested && !waited {
            return false;
        }
        match port.save(&self.settings) {
            Ok(()) => {
                self.clear_dirty();
                info!("Settings auto-saved");
                true
            }
            Err(e) => {
                warn!("Settings auto-save failed: {}", e);
                false
            }
        }
    }

    /// Force-save if dirty (call before shutdown).
    pub fn force_save_if_dirty(&mut self, port: &impl SettingsPort) {
        if !self.settings_dirty {
            return;
        }
        match port.save(&self.settings) {
            Ok(()) => {
                self.clear_dirty();
                info!("Settings force-saved before shutdown");
            }
            Err(e) => {
                warn!("Settings force-save failed: {}", e);
            }
        }
    }

    pub fn is_settings_dirty(&self) -> bool {
        self.settings_dirty
    }

    fn clear_dirty(&mut self) {
        self.settings_dirty = false;
        self.save_requested = false;
        self.dirty_since = None;
    }
}

fn command_label(cmd: &AppCommand) -> &'static str {
    match cmd {
        AppCommand::FeedNow { .. } => "FeedNow",
        AppCommand::ManualFeed { .. } => "ManualFeed",
        AppCommand::ScheduledFeed(_) => "ScheduledFeed",
        AppCommand::AddSchedule(_) => "AddSchedule",
        AppCommand::UpdateSchedule { .. } => "UpdateSchedule",
        AppCommand::DeleteSchedule(_) => "DeleteSchedule",
        AppCommand::ToggleSchedule(_) => "ToggleSchedule",
        AppCommand::MarkNotificationRead(_) => "MarkNotificationRead",
        AppCommand::DeleteNotification(_) => "DeleteNotification",
        AppCommand::ClearNotifications => "ClearNotifications",
        AppCommand::UpdateSettings(_) => "UpdateSettings",
        AppCommand::SaveSettings => "SaveSettings",
    }
}

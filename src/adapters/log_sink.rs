//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (stderr via `env_logger` in the host binary).
//! A UI push adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::history::FeedTrigger;

/// Adapter that logs every [`AppEvent`] as one line.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

fn trigger_label(trigger: &FeedTrigger) -> String {
    match trigger {
        FeedTrigger::Manual => "manual".to_string(),
        FeedTrigger::Scheduled(id) => format!("schedule {id}"),
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { schedules, active } => {
                info!("START | schedules={} active={}", schedules, active);
            }
            AppEvent::Dispensed { grams, trigger } => {
                info!("FEED | {}g | {}", grams, trigger_label(trigger));
            }
            AppEvent::DispenseFailed { trigger, error } => {
                warn!("FEED | failed: {} | {}", error, trigger_label(trigger));
            }
            AppEvent::ScheduleChanged { id, change } => {
                info!("SCHED | {} {:?}", id, change);
            }
            AppEvent::NotificationPosted { id, kind } => {
                info!("NOTIFY | {} {:?}", id, kind);
            }
            AppEvent::SettingsUpdated => {
                info!("SETTINGS | updated");
            }
            AppEvent::StatusChanged(s) => {
                info!(
                    "STATUS | {} | power={} | food={}",
                    s.connection_label(),
                    s.power.label(),
                    s.food_level.label()
                );
            }
            AppEvent::Dashboard(d) => {
                info!(
                    "DASH | {} | {} | next meal {} | last fed {} | {} active schedules | {} unread",
                    d.feeder_name,
                    d.status.connection_label(),
                    d.next_meal,
                    d.last_fed,
                    d.active_schedules,
                    d.unread_notifications,
                );
            }
        }
    }
}

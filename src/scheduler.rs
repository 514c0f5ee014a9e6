//! Automatic feed scheduler.
//!
//! Wakes on every main-loop poll, re-derives the most recent due meal and
//! notifies a [`SchedulerDelegate`] when one should fire.  The delegate
//! (main loop) turns that into a dispense command.
//!
//! ```text
//! ┌────────────┐  poll   ┌───────────────┐ on_feed_due ┌──────────────┐
//! │ Main loop  │───────▶│ FeedScheduler │────────────▶│  Delegate    │
//! │ (interval) │        │ next_occurrence│             │ (queue cmd)  │
//! └────────────┘        └───────────────┘             └──────┬───────┘
//!                                                            ▼
//!                                              FeederService.handle_command()
//! ```
//!
//! A meal is due when, looking back `lookback` from `now`, the next
//! occurrence is already in the past but by less than `grace`.  Two
//! guards stop double feeding: the feeder must not have dispensed within
//! `debounce` of `now`, and a given (schedule, instant) fires at most once.

use chrono::{NaiveDateTime, TimeDelta};
use log::{debug, info};

use crate::app::ports::SchedulerDelegate;
use crate::config::FeederConfig;
use crate::schedule::{Occurrence, Schedule, next_occurrence};

/// Polling evaluator for scheduled feeds.
pub struct FeedScheduler {
    lookback: TimeDelta,
    grace: TimeDelta,
    debounce: TimeDelta,
    /// Global enable flag.
    enabled: bool,
    /// Most recent occurrence handed to the delegate.
    last_fired: Option<Occurrence>,
}

impl FeedScheduler {
    pub fn new(config: &FeederConfig) -> Self {
        Self {
            lookback: TimeDelta::seconds(i64::from(config.auto_feed_lookback_secs)),
            grace: TimeDelta::seconds(i64::from(config.auto_feed_grace_secs)),
            debounce: TimeDelta::seconds(i64::from(config.feed_debounce_secs)),
            enabled: true,
            last_fired: None,
        }
    }

    /// Enable or disable automatic feeding.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            info!(
                "FeedScheduler: automatic feeding {}",
                if enabled { "resumed" } else { "paused" }
            );
        }
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn last_fired(&self) -> Option<&Occurrence> {
        self.last_fired.as_ref()
    }

    /// Evaluate the schedules once.  Call on every poll.
    ///
    /// * `now`: device-local time of this poll.
    /// * `schedules`: current schedule list (fresh each call; edits are
    ///   only seen through new invocations).
    /// * `last_fed`: when the feeder last dispensed, manual or scheduled.
    /// * `delegate`: receives the due occurrence.
    ///
    /// Returns `true` if the delegate was invoked.
    pub fn tick(
        &mut self,
        now: NaiveDateTime,
        schedules: &[Schedule],
        last_fed: Option<NaiveDateTime>,
        delegate: &mut dyn SchedulerDelegate,
    ) -> bool {
        if !self.enabled {
            return false;
        }

        let Some(due) = self.due(now, schedules, last_fed) else {
            return false;
        };

        info!(
            "FeedScheduler: schedule {} due at {} ({}g)",
            due.schedule,
            due.at.format("%H:%M"),
            due.quantity
        );
        delegate.on_feed_due(&due);
        self.last_fired = Some(due);
        true
    }

    fn due(
        &self,
        now: NaiveDateTime,
        schedules: &[Schedule],
        last_fed: Option<NaiveDateTime>,
    ) -> Option<Occurrence> {
        let since = now.checked_sub_signed(self.lookback)?;
        let candidate = next_occurrence(schedules, since)?;

        if now <= candidate.at {
            return None;
        }
        if now - candidate.at >= self.grace {
            debug!(
                "FeedScheduler: {} missed its window at {}",
                candidate.schedule, candidate.at
            );
            return None;
        }
        if let Some(fed) = last_fed {
            if now - fed <= self.debounce {
                debug!("FeedScheduler: fed at {}, inside debounce window", fed);
                return None;
            }
        }
        if self.last_fired.as_ref() == Some(&candidate) {
            return None;
        }
        Some(candidate)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════

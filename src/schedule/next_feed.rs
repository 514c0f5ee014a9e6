//! Next scheduled feed computation.
//!
//! Given the schedule list and a reference instant, find the single next
//! automatic meal.  Pure: no I/O, no mutation, no retained state, so it
//! can be re-run on every poll or every edit.
//!
//! The search walks calendar days `today ..= today + 7`.  Eight days is
//! enough because any enabled schedule with at least one day recurs
//! within a week.  The first day that yields a candidate strictly after
//! `now` wins; later days can only be later.

use chrono::{Datelike, Days, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{Schedule, ScheduleId};

/// Days ahead of today searched for a candidate (inclusive).
pub const SEARCH_DAYS: u64 = 7;

/// One concrete future automatic feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Occurrence {
    /// Local date and time of the meal.
    pub at: NaiveDateTime,
    /// Grams to dispense.
    pub quantity: u16,
    /// The schedule that produced this occurrence.
    pub schedule: ScheduleId,
}

/// Earliest enabled occurrence strictly after `now`, or `None`.
///
/// When several schedules share the minimal instant, the first one in
/// slice order is returned.
pub fn next_occurrence(schedules: &[Schedule], now: NaiveDateTime) -> Option<Occurrence> {
    if !schedules.iter().any(|s| s.enabled) {
        return None;
    }

    let today = now.date();
    for offset in 0..=SEARCH_DAYS {
        let date = today.checked_add_days(Days::new(offset))?;
        let weekday = date.weekday();

        let best = schedules
            .iter()
            .filter(|s| s.enabled && s.runs_on(weekday))
            .map(|s| Occurrence {
                at: date.and_time(s.time.as_naive()),
                quantity: s.quantity,
                schedule: s.id,
            })
            .filter(|o| o.at > now)
            .min_by_key(|o| o.at);

        if best.is_some() {
            return best;
        }
    }
    None
}

//! Feeding schedules: the recurring rules the auto-feed loop follows.
//!
//! ```text
//!   ScheduleDraft ──▶ ScheduleBook (CRUD, validation, ids)
//!                          │
//!                          ▼  &[Schedule]
//!                   next_feed::next_occurrence(rules, now) ──▶ Occurrence
//! ```

pub mod book;
pub mod days;
pub mod next_feed;
pub mod time_of_day;

use core::fmt;

use serde::{Deserialize, Serialize};

pub use book::ScheduleBook;
pub use days::DaySet;
pub use next_feed::{Occurrence, next_occurrence};
pub use time_of_day::{ParseTimeError, TimeOfDay};

/// Stable identity of a schedule within its book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleId(pub u32);

impl fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How often a schedule repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recurrence {
    /// Every day; the day set is ignored.
    Daily,
    /// Only on the days in the schedule's day set.
    SpecificDays,
}

/// A recurring feeding rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    /// Local wall-clock time of the meal.
    pub time: TimeOfDay,
    /// Grams to dispense.
    pub quantity: u16,
    pub recurrence: Recurrence,
    /// Meaningful only for [`Recurrence::SpecificDays`].
    pub days: DaySet,
    /// Disabled schedules never fire.
    pub enabled: bool,
}

impl Schedule {
    /// Whether this schedule applies on `day` (ignores `enabled`).
    pub fn runs_on(&self, day: chrono::Weekday) -> bool {
        match self.recurrence {
            Recurrence::Daily => true,
            Recurrence::SpecificDays => self.days.contains(day),
        }
    }

    pub fn frequency_label(&self) -> String {
        frequency_label(self.recurrence, self.days)
    }
}

/// Form payload for creating or editing a schedule (no id, no enabled flag).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDraft {
    pub time: TimeOfDay,
    pub quantity: u16,
    pub recurrence: Recurrence,
    pub days: DaySet,
}

impl ScheduleDraft {
    pub fn daily(time: TimeOfDay, quantity: u16) -> Self {
        Self {
            time,
            quantity,
            recurrence: Recurrence::Daily,
            days: DaySet::EMPTY,
        }
    }

    pub fn on_days(time: TimeOfDay, quantity: u16, days: DaySet) -> Self {
        Self {
            time,
            quantity,
            recurrence: Recurrence::SpecificDays,
            days,
        }
    }

    pub fn frequency_label(&self) -> String {
        frequency_label(self.recurrence, self.days)
    }
}

impl Default for ScheduleDraft {
    fn default() -> Self {
        Self::daily(TimeOfDay::new(8, 0).unwrap_or_default(), 50)
    }
}

fn frequency_label(recurrence: Recurrence, days: DaySet) -> String {
    match recurrence {
        Recurrence::Daily => "Daily".to_string(),
        Recurrence::SpecificDays if days.is_empty() => "No days selected".to_string(),
        Recurrence::SpecificDays => days.to_string(),
    }
}

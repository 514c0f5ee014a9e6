//! Weekday sets for specific-days schedules.
//!
//! Stored as a bitmask: bit 0 = Monday … bit 6 = Sunday.

use core::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

const ALL_BITS: u8 = 0b0111_1111;

/// Monday-first order used for iteration and display.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// A set of weekdays.  Only the low seven bits are ever set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct DaySet(u8);

impl From<u8> for DaySet {
    fn from(bits: u8) -> Self {
        Self(bits & ALL_BITS)
    }
}

impl From<DaySet> for u8 {
    fn from(set: DaySet) -> Self {
        set.0
    }
}

impl DaySet {
    pub const EMPTY: Self = Self(0);
    pub const EVERY_DAY: Self = Self(ALL_BITS);

    fn mask(day: Weekday) -> u8 {
        1 << day.num_days_from_monday()
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & Self::mask(day) != 0
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= Self::mask(day);
    }

    pub fn remove(&mut self, day: Weekday) {
        self.0 &= !Self::mask(day);
    }

    /// Flip membership of `day`.  Returns `true` if it is now selected.
    pub fn toggle(&mut self, day: Weekday) -> bool {
        self.0 ^= Self::mask(day);
        self.contains(day)
    }

    pub fn is_empty(&self) -> bool {
        self.0 & ALL_BITS == 0
    }

    pub fn len(&self) -> usize {
        (self.0 & ALL_BITS).count_ones() as usize
    }

    /// Selected days, Monday first.
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        WEEK.into_iter().filter(|d| self.contains(*d))
    }
}

impl FromIterator<Weekday> for DaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl fmt::Display for DaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, day) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{day}")?;
        }
        Ok(())
    }
}

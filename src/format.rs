//! Human-readable time and meal labels for the dashboard.

use chrono::{NaiveDateTime, TimeDelta};

use crate::schedule::Occurrence;

const MINUTES_IN_DAY: i64 = 1_440;
const MINUTES_IN_MONTH: i64 = 43_200;
const MINUTES_IN_TWO_MONTHS: i64 = 86_400;

/// Approximate distance between `then` and `now`, with direction:
/// `"in 3 hours"` for the future, `"5 minutes ago"` for the past.
pub fn distance_to_now(then: NaiveDateTime, now: NaiveDateTime) -> String {
    let delta = then - now;
    let words = distance_words(delta.abs());
    if delta > TimeDelta::zero() {
        format!("in {words}")
    } else {
        format!("{words} ago")
    }
}

fn distance_words(delta: TimeDelta) -> String {
    let seconds = delta.num_seconds();
    let minutes = (seconds + 30) / 60;

    if minutes < 1 {
        return "less than a minute".to_string();
    }
    if minutes < 2 {
        return "1 minute".to_string();
    }
    if minutes < 45 {
        return format!("{minutes} minutes");
    }
    if minutes < 90 {
        return "about 1 hour".to_string();
    }
    if minutes < MINUTES_IN_DAY {
        let hours = (minutes + 30) / 60;
        return format!("about {hours} hours");
    }
    if minutes < 2_520 {
        return "1 day".to_string();
    }
    if minutes < MINUTES_IN_MONTH {
        let days = (minutes + MINUTES_IN_DAY / 2) / MINUTES_IN_DAY;
        return format!("{days} days");
    }
    if minutes < MINUTES_IN_TWO_MONTHS {
        let months = (minutes + MINUTES_IN_MONTH / 2) / MINUTES_IN_MONTH;
        return plural("about", months, "month");
    }

    let months = minutes / MINUTES_IN_MONTH;
    if months < 12 {
        return format!("{months} months");
    }
    let years = months / 12;
    match months % 12 {
        0..=2 => plural("about", years, "year"),
        3..=8 => plural("over", years, "year"),
        _ => plural("almost", years + 1, "year"),
    }
}

fn plural(prefix: &str, n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{prefix} 1 {unit}")
    } else {
        format!("{prefix} {n} {unit}s")
    }
}

/// Timestamp text for the notification list: relative under a day,
/// weekday and time under a week, calendar date beyond that.  Timestamps
/// ahead of `now` (clock skew) always count as recent.
pub fn notification_timestamp(ts: NaiveDateTime, now: NaiveDateTime) -> String {
    let age = now - ts;
    if age < TimeDelta::days(1) {
        distance_to_now(ts, now)
    } else if age < TimeDelta::days(7) {
        ts.format("%a at %-I:%M %p").to_string()
    } else {
        ts.format("%b %-d, %Y").to_string()
    }
}

/// Dashboard "next meal" line.
pub fn next_meal_label(next: Option<&Occurrence>, now: NaiveDateTime) -> String {
    match next {
        Some(occ) => format!("{} ({}g)", distance_to_now(occ.at, now), occ.quantity),
        None => "None Scheduled".to_string(),
    }
}

/// Dashboard "last fed" line.
pub fn last_fed_label(last_fed: Option<NaiveDateTime>, now: NaiveDateTime) -> String {
    match last_fed {
        Some(at) => distance_to_now(at, now),
        None => "Never".to_string(),
    }
}

/// 12-hour clock time, e.g. `"6:00 PM"`.
pub fn clock_time(at: NaiveDateTime) -> String {
    at.format("%-I:%M %p").to_string()
}

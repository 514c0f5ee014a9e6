//! Fuzz target: `TimeOfDay` parser
//!
//! Feeds arbitrary text to `TimeOfDay::from_str` and verifies:
//! - No panics under arbitrary input
//! - Anything accepted is in range and re-parses from its own `Display`
//!
//! cargo fuzz run fuzz_time_of_day

#![no_main]

use libfuzzer_sys::fuzz_target;
use pawfeeder::schedule::TimeOfDay;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let Ok(time) = text.parse::<TimeOfDay>() else {
        return;
    };

    assert!(time.hour() < 24, "hour {} out of range", time.hour());
    assert!(time.minute() < 60, "minute {} out of range", time.minute());

    let shown = time.to_string();
    assert_eq!(shown.len(), 5, "display '{shown}' is not HH:MM");
    assert_eq!(shown.parse::<TimeOfDay>().ok(), Some(time));
});

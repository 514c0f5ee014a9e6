//! Fuzz target: `FeedLog` ring buffer
//!
//! Drives arbitrary `write_entry` / `read_all` / `clear` sequences over the
//! in-memory store, with some slots overwritten by raw fuzz bytes, and
//! verifies:
//! - No panics, including on corrupted slots
//! - `read_all` never returns more than `FEED_LOG_SLOTS` records
//! - `read_all` is sorted oldest first
//!
//! cargo fuzz run fuzz_feed_log

#![no_main]

use chrono::{NaiveDate, TimeDelta};
use libfuzzer_sys::fuzz_target;
use pawfeeder::adapters::store::MemoryStore;
use pawfeeder::app::ports::StoragePort;
use pawfeeder::history::{FEED_LOG_SLOTS, FeedLog, FeedRecord, FeedTrigger};
use pawfeeder::schedule::ScheduleId;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    let Some(base) = NaiveDate::from_ymd_opt(2024, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
    else {
        return;
    };

    let mut store = MemoryStore::new();
    let mut log = FeedLog::new();
    log.init(&store);

    for (i, chunk) in data.chunks(4).enumerate() {
        match chunk[0] % 4 {
            // Raw bytes straight into a slot.
            0 => {
                let slot = format!("f{}", chunk.get(1).copied().unwrap_or(0) as usize % FEED_LOG_SLOTS);
                let _ = store.write("feedlog", &slot, &chunk[1..]);
            }
            // Garbage index.
            1 => {
                let _ = store.write("feedlog", "feed_idx", chunk);
                log.init(&store);
            }
            _ => {
                let grams = u16::from(chunk.get(1).copied().unwrap_or(10));
                let trigger = match chunk.get(2) {
                    Some(id) if id % 2 == 0 => FeedTrigger::Scheduled(ScheduleId(u32::from(*id))),
                    _ => FeedTrigger::Manual,
                };
                let record = FeedRecord {
                    at: base + TimeDelta::minutes(i as i64),
                    grams,
                    trigger,
                };
                let _ = log.write_entry(&mut store, &record);
            }
        }
    }

    let records = log.read_all(&store);
    assert!(records.len() <= FEED_LOG_SLOTS);
    assert!(records.windows(2).all(|w| w[0].at <= w[1].at));

    log.clear(&mut store);
    assert!(log.read_all(&store).is_empty());
    assert_eq!(log.count(&store), 0);
});

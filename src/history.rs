//! Persistent feed history.
//!
//! Keeps the last 8 dispenses in a storage-backed ring buffer under the
//! "feedlog" namespace.  Each slot holds one postcard-encoded
//! [`FeedRecord`]; a separate index key remembers the next slot to write,
//! so history survives restarts.

use chrono::NaiveDateTime;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::app::ports::{StorageError, StoragePort};
use crate::schedule::ScheduleId;

pub const FEED_LOG_SLOTS: usize = 8;
const FEED_LOG_NAMESPACE: &str = "feedlog";
const FEED_INDEX_KEY: &str = "feed_idx";

/// What caused a dispense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedTrigger {
    /// "Feed now" from the dashboard or the manual feed control.
    Manual,
    /// The auto-feed loop, on behalf of this schedule.
    Scheduled(ScheduleId),
}

/// One completed dispense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedRecord {
    pub at: NaiveDateTime,
    pub grams: u16,
    pub trigger: FeedTrigger,
}

/// Storage-backed ring buffer of [`FeedRecord`]s.
#[derive(Debug, Default)]
pub struct FeedLog {
    write_index: usize,
}

impl FeedLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the write index from storage, or default to 0.
    pub fn init(&mut self, store: &dyn StoragePort) {
        let mut buf = [0u8; 4];
        if let Ok(4) = store.read(FEED_LOG_NAMESPACE, FEED_INDEX_KEY, &mut buf) {
            self.write_index = u32::from_le_bytes(buf) as usize % FEED_LOG_SLOTS;
        }
    }

    /// Write a record to the next slot, overwriting the oldest when full.
    ///
    /// The index is committed before the slot, so an `Err` never leaves
    /// the record stored: retrying it cannot produce a duplicate.
    pub fn write_entry(
        &mut self,
        store: &mut dyn StoragePort,
        record: &FeedRecord,
    ) -> Result<(), StorageError> {
        let bytes = postcard::to_allocvec(record).map_err(|_| StorageError::IoError)?;
        let slot = self.write_index;
        let next = (slot + 1) % FEED_LOG_SLOTS;

        store.write(FEED_LOG_NAMESPACE, FEED_INDEX_KEY, &(next as u32).to_le_bytes())?;
        self.write_index = next;
        store.write(FEED_LOG_NAMESPACE, &Self::slot_key(slot), &bytes)
    }

    /// All stored records, oldest first.  Undecodable slots are skipped.
    pub fn read_all(&self, store: &dyn StoragePort) -> heapless::Vec<FeedRecord, FEED_LOG_SLOTS> {
        let mut records: heapless::Vec<FeedRecord, FEED_LOG_SLOTS> = heapless::Vec::new();
        for i in 0..FEED_LOG_SLOTS {
            let mut buf = [0u8; 64];
            let Ok(len) = store.read(FEED_LOG_NAMESPACE, &Self::slot_key(i), &mut buf) else {
                continue;
            };
            match postcard::from_bytes::<FeedRecord>(&buf[..len]) {
                Ok(record) => {
                    let _ = records.push(record);
                }
                Err(_) => warn!("FeedLog: slot {} is corrupted, skipping", i),
            }
        }
        records.sort_unstable_by_key(|r| r.at);
        records
    }

    /// Most recent record, if any.
    pub fn latest(&self, store: &dyn StoragePort) -> Option<FeedRecord> {
        self.read_all(store).last().copied()
    }

    /// Erase every record and reset the index.
    pub fn clear(&mut self, store: &mut dyn StoragePort) {
        for i in 0..FEED_LOG_SLOTS {
            let _ = store.delete(FEED_LOG_NAMESPACE, &Self::slot_key(i));
        }
        let _ = store.delete(FEED_LOG_NAMESPACE, FEED_INDEX_KEY);
        self.write_index = 0;
    }

    pub fn count(&self, store: &dyn StoragePort) -> usize {
        (0..FEED_LOG_SLOTS)
            .filter(|i| store.exists(FEED_LOG_NAMESPACE, &Self::slot_key(*i)))
            .count()
    }

    fn slot_key(index: usize) -> heapless::String<16> {
        let mut s = heapless::String::new();
        let _ = core::fmt::Write::write_fmt(&mut s, format_args!("f{}", index));
        s
    }
}

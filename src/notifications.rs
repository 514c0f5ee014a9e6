//! In-app notification list.
//!
//! A bounded ring: when full, posting a new notification evicts the
//! oldest one.  Ids are never reused within a run.

use core::fmt;
use std::collections::VecDeque;

use chrono::NaiveDateTime;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(pub u32);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Severity, which also picks the presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    pub timestamp: NaiveDateTime,
    pub read: bool,
}

/// Which system notifications the user wants posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPrefs {
    /// Confirm each completed scheduled feed.
    pub feed_confirm: bool,
    /// Dispenser jams.
    pub feeder_jam: bool,
    /// Hopper running low or empty.
    pub low_food: bool,
    /// Feeder went offline.
    pub connection_lost: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            feed_confirm: true,
            feeder_jam: true,
            low_food: true,
            connection_lost: false,
        }
    }
}

/// Owns every notification shown to the user.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    entries: VecDeque<Notification>,
    capacity: usize,
    next_id: u32,
}

impl NotificationCenter {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_id: 1,
        }
    }

    /// Add an unread notification.  Evicts the oldest when full.
    pub fn post(
        &mut self,
        kind: NotificationKind,
        message: impl Into<String>,
        now: NaiveDateTime,
    ) -> NotificationId {
        if self.entries.len() >= self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                debug!("Notifications: evicted {} to make room", evicted.id);
            }
        }
        let id = NotificationId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push_back(Notification {
            id,
            kind,
            message: message.into(),
            timestamp: now,
            read: false,
        });
        id
    }

    pub fn mark_read(&mut self, id: NotificationId) -> Result<()> {
        let n = self
            .entries
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(Error::NotificationNotFound(id))?;
        n.read = true;
        Ok(())
    }

    pub fn delete(&mut self, id: NotificationId) -> Result<Notification> {
        let pos = self
            .entries
            .iter()
            .position(|n| n.id == id)
            .ok_or(Error::NotificationNotFound(id))?;
        self.entries
            .remove(pos)
            .ok_or(Error::NotificationNotFound(id))
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|n| !n.read).count()
    }

    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.entries.iter().find(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All notifications, most recent timestamp first.
    pub fn newest_first(&self) -> Vec<&Notification> {
        let mut list: Vec<&Notification> = self.entries.iter().collect();
        list.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        list
    }
}

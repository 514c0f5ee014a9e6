//! Outbound application events.
//!
//! The [`FeederService`](super::service::FeederService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log them, push them to a UI, etc.

use crate::app::ports::DispenseError;
use crate::history::FeedTrigger;
use crate::notifications::{NotificationId, NotificationKind};
use crate::schedule::ScheduleId;
use crate::status::FeederStatus;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service has started.
    Started { schedules: usize, active: usize },

    /// Food left the hopper.
    Dispensed { grams: u16, trigger: FeedTrigger },

    /// The dispenser refused or failed.
    DispenseFailed {
        trigger: FeedTrigger,
        error: DispenseError,
    },

    ScheduleChanged {
        id: ScheduleId,
        change: ScheduleChange,
    },

    NotificationPosted {
        id: NotificationId,
        kind: NotificationKind,
    },

    SettingsUpdated,

    /// Connection, power or food level moved since the last poll.
    StatusChanged(FeederStatus),

    /// Periodic dashboard snapshot.
    Dashboard(DashboardView),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleChange {
    Added,
    Updated,
    Removed,
    Enabled,
    Disabled,
}

/// What the dashboard page renders, with labels already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub feeder_name: String,
    pub status: FeederStatus,
    /// e.g. `"in about 9 hours (60g)"` or `"None Scheduled"`.
    pub next_meal: String,
    /// e.g. `"about 1 hour ago"` or `"Never"`.
    pub last_fed: String,
    pub active_schedules: usize,
    pub unread_notifications: usize,
}

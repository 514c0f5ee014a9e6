//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (dashboard,
//! schedule editor, settings form, auto-feed scheduler) that the
//! [`FeederService`](super::service::FeederService) interprets and acts upon.

use crate::notifications::NotificationId;
use crate::schedule::{Occurrence, ScheduleDraft, ScheduleId};
use crate::settings::FeederSettings;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Dashboard "feed now": dispense within the schedule portion limits.
    FeedNow { grams: u16 },

    /// Manual feed control: dispense within the manual portion limits.
    ManualFeed { grams: u16 },

    /// Queued by the scheduler when a meal comes due.
    ScheduledFeed(Occurrence),

    AddSchedule(ScheduleDraft),

    UpdateSchedule { id: ScheduleId, draft: ScheduleDraft },

    DeleteSchedule(ScheduleId),

    /// Flip a schedule between enabled and disabled.
    ToggleSchedule(ScheduleId),

    MarkNotificationRead(NotificationId),

    DeleteNotification(NotificationId),

    ClearNotifications,

    /// Replace the user settings (validated, then auto-saved later).
    UpdateSettings(FeederSettings),

    /// Persist the current settings on the next auto-save check.
    SaveSettings,
}

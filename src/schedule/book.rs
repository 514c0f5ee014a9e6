//! Schedule table with validation and id allocation.

use log::info;

use crate::error::{Error, Result, ValidationError};
use crate::portion::PortionLimits;

use super::{DaySet, Recurrence, Schedule, ScheduleDraft, ScheduleId, TimeOfDay};

/// Maximum number of schedules (stack-allocated).
pub const MAX_SCHEDULES: usize = 16;

/// Owned, bounded list of feeding schedules.
#[derive(Debug, Clone)]
pub struct ScheduleBook {
    schedules: heapless::Vec<Schedule, MAX_SCHEDULES>,
    limits: PortionLimits,
}

/// Check a draft before it is allowed into the book.
pub fn validate_draft(draft: &ScheduleDraft, limits: &PortionLimits) -> Result<()> {
    limits.check(draft.quantity)?;
    if draft.recurrence == Recurrence::SpecificDays && draft.days.is_empty() {
        return Err(ValidationError::NoDaysSelected.into());
    }
    Ok(())
}

impl ScheduleBook {
    pub fn new(limits: PortionLimits) -> Self {
        Self {
            schedules: heapless::Vec::new(),
            limits,
        }
    }

    /// Two daily meals plus a disabled weekend lunch.
    pub fn with_defaults(limits: PortionLimits) -> Self {
        let mut book = Self::new(limits);
        let seed = [
            (8, 50, Recurrence::Daily, DaySet::EMPTY, true),
            (18, 60, Recurrence::Daily, DaySet::EMPTY, true),
            (
                12,
                40,
                Recurrence::SpecificDays,
                [chrono::Weekday::Sat, chrono::Weekday::Sun].into_iter().collect(),
                false,
            ),
        ];
        for (i, (hour, quantity, recurrence, days, enabled)) in seed.into_iter().enumerate() {
            let Some(time) = TimeOfDay::new(hour, 0) else { continue };
            let _ = book.schedules.push(Schedule {
                id: ScheduleId(i as u32 + 1),
                time,
                quantity,
                recurrence,
                days,
                enabled,
            });
        }
        book
    }

    pub fn limits(&self) -> PortionLimits {
        self.limits
    }

    /// Validate and append a new, enabled schedule.
    pub fn add(&mut self, draft: ScheduleDraft) -> Result<ScheduleId> {
        validate_draft(&draft, &self.limits)?;
        if self.schedules.is_full() {
            return Err(Error::ScheduleBookFull);
        }
        let id = self.next_id();
        let schedule = Schedule {
            id,
            time: draft.time,
            quantity: draft.quantity,
            recurrence: draft.recurrence,
            days: normalised_days(&draft),
            enabled: true,
        };
        info!(
            "ScheduleBook: added {} at {} ({}g, {})",
            id,
            schedule.time,
            schedule.quantity,
            schedule.frequency_label()
        );
        self.schedules
            .push(schedule)
            .map_err(|_| Error::ScheduleBookFull)?;
        Ok(id)
    }

    /// Replace the editable fields of `id`; keeps its id and enabled flag.
    pub fn update(&mut self, id: ScheduleId, draft: ScheduleDraft) -> Result<&Schedule> {
        validate_draft(&draft, &self.limits)?;
        let days = normalised_days(&draft);
        let schedule = self.get_mut(id)?;
        schedule.time = draft.time;
        schedule.quantity = draft.quantity;
        schedule.recurrence = draft.recurrence;
        schedule.days = days;
        info!(
            "ScheduleBook: updated {} to {} ({}g)",
            id, schedule.time, schedule.quantity
        );
        Ok(&*schedule)
    }

    /// Remove `id`, returning the removed schedule.
    pub fn remove(&mut self, id: ScheduleId) -> Result<Schedule> {
        let pos = self
            .schedules
            .iter()
            .position(|s| s.id == id)
            .ok_or(Error::ScheduleNotFound(id))?;
        let removed = self.schedules.remove(pos);
        info!("ScheduleBook: removed {} ({})", id, removed.time);
        Ok(removed)
    }

    /// Flip the enabled flag.  Returns the new value.
    pub fn toggle(&mut self, id: ScheduleId) -> Result<bool> {
        let schedule = self.get_mut(id)?;
        schedule.enabled = !schedule.enabled;
        info!(
            "ScheduleBook: {} {}",
            id,
            if schedule.enabled { "enabled" } else { "disabled" }
        );
        Ok(schedule.enabled)
    }

    pub fn get(&self, id: ScheduleId) -> Option<&Schedule> {
        self.schedules.iter().find(|s| s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Schedule> {
        self.schedules.iter()
    }

    pub fn as_slice(&self) -> &[Schedule] {
        &self.schedules
    }

    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }

    /// Number of enabled schedules.
    pub fn active_count(&self) -> usize {
        self.schedules.iter().filter(|s| s.enabled).count()
    }

    fn get_mut(&mut self, id: ScheduleId) -> Result<&mut Schedule> {
        self.schedules
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(Error::ScheduleNotFound(id))
    }

    fn next_id(&self) -> ScheduleId {
        ScheduleId(self.schedules.iter().map(|s| s.id.0).max().map_or(1, |m| m + 1))
    }
}

/// Daily schedules never carry a day set.
fn normalised_days(draft: &ScheduleDraft) -> DaySet {
    match draft.recurrence {
        Recurrence::Daily => DaySet::EMPTY,
        Recurrence::SpecificDays => draft.days,
    }
}

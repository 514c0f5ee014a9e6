//! Portion sizes: allowed gram ranges and the stepped manual selector.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Inclusive gram range plus the step used by selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortionLimits {
    pub min: u16,
    pub max: u16,
    pub step: u16,
}

impl PortionLimits {
    pub const fn new(min: u16, max: u16, step: u16) -> Self {
        Self { min, max, step }
    }

    pub fn contains(&self, grams: u16) -> bool {
        (self.min..=self.max).contains(&grams)
    }

    /// Accept `grams` if within range.
    pub fn check(&self, grams: u16) -> Result<u16, ValidationError> {
        if self.contains(grams) {
            Ok(grams)
        } else {
            Err(ValidationError::QuantityOutOfRange {
                grams,
                min: self.min,
                max: self.max,
            })
        }
    }

    pub fn clamp(&self, grams: u16) -> u16 {
        grams.clamp(self.min, self.max)
    }
}

/// Stepped, clamped amount picker backing the manual feed control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortionSelector {
    limits: PortionLimits,
    value: u16,
}

impl PortionSelector {
    pub fn new(limits: PortionLimits, initial: u16) -> Self {
        Self {
            limits,
            value: limits.clamp(initial),
        }
    }

    pub fn value(&self) -> u16 {
        self.value
    }

    pub fn limits(&self) -> PortionLimits {
        self.limits
    }

    pub fn set(&mut self, grams: u16) {
        self.value = self.limits.clamp(grams);
    }

    /// Apply free-text input.  Empty text resets to the minimum; anything
    /// non-numeric leaves the value untouched.
    pub fn set_from_text(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            self.value = self.limits.min;
            return;
        }
        if let Ok(v) = text.parse::<i64>() {
            let v = v.clamp(0, i64::from(u16::MAX)) as u16;
            self.set(v);
        }
    }

    pub fn increment(&mut self) {
        self.set(self.value.saturating_add(self.limits.step));
    }

    pub fn decrement(&mut self) {
        self.set(self.value.saturating_sub(self.limits.step));
    }

    pub fn can_increment(&self) -> bool {
        self.value < self.limits.max
    }

    pub fn can_decrement(&self) -> bool {
        self.value > self.limits.min
    }
}

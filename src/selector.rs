use chrono::NaiveDate;
use tracing::debug;

use crate::date::{self, Clock};
use crate::error::{AvailabilityError, Result};

/// The currently selected calendar date. Dates before today cannot be selected.
#[derive(Debug, Clone)]
pub struct DateSelector {
    selected: NaiveDate,
    clock: Clock,
}

impl DateSelector {
    /// Start on today according to the local clock.
    pub fn new() -> Self {
        Self::with_clock(date::today)
    }

    /// Start on the day reported by `clock`, and judge past dates against it.
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            selected: clock(),
            clock,
        }
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    /// The earliest selectable date.
    pub fn min_date(&self) -> NaiveDate {
        (self.clock)()
    }

    pub fn is_selectable(&self, date: NaiveDate) -> bool {
        date >= self.min_date()
    }

    /// Replace the selection. Returns whether the selection changed.
    pub fn select(&mut self, date: NaiveDate) -> Result<bool> {
        let today = self.min_date();
        if date < today {
            debug!(%date, %today, "rejected past date");
            return Err(AvailabilityError::PastDate { date, today });
        }
        if date == self.selected {
            return Ok(false);
        }
        self.selected = date;
        Ok(true)
    }
}

impl Default for DateSelector {
    fn default() -> Self {
        Self::new()
    }
}

use chrono::{Local, NaiveDate};

use crate::error::Result;

/// Date format used in the `date` query parameter, e.g. `19/10/2026`.
pub const REQUEST_DATE_FORMAT: &str = "%d/%m/%Y";
pub(crate) const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const LONG_DATE_FORMAT: &str = "%A %d/%m/%Y";

/// Source of the current calendar day.
pub type Clock = fn() -> NaiveDate;

/// Today according to the local clock.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Format a date as `DD/MM/YYYY`.
pub fn format_request_date(date: NaiveDate) -> String {
    date.format(REQUEST_DATE_FORMAT).to_string()
}

/// Parse a `DD/MM/YYYY` date.
pub fn parse_request_date(s: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(s.trim(), REQUEST_DATE_FORMAT)?)
}

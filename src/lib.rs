//! Badminton court availability for a selected date.
//!
//! [`Bookings`] is the availability component: a [`DateSelector`] that
//! refuses past dates, a [`SlotSource`] fetched on every date change and an
//! [`AvailabilityView`] rendering either a spinner or the courts grid.
//! [`AvailabilityClient`] reads a bookings endpoint over HTTP;
//! [`clubwise::ClubwiseSource`] scrapes the booking system directly and
//! [`server`] exposes any source as that endpoint.

pub use bookings::{Bookings, LoadOutcome};
pub use client::{AvailabilityClient, SlotSource};
pub use config::{Config, ServerConfig};
pub use date::{format_request_date, parse_request_date, today, Clock, REQUEST_DATE_FORMAT};
pub use error::{AvailabilityError, Result};
pub use model::*;
pub use selector::DateSelector;
pub use view::{AvailabilityTable, AvailabilityView, TableRow};

mod bookings;
mod client;
pub mod clubwise;
pub mod config;
mod date;
mod error;
mod model;
mod selector;
pub mod server;
mod view;

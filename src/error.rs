use std::path::PathBuf;

use ::scraper::error::SelectorErrorKind;
use chrono::NaiveDate;

/// All errors that can occur while fetching, scraping or serving availability.
#[derive(thiserror::Error, Debug)]
pub enum AvailabilityError {
    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read the response body.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// The response body was not the expected JSON shape.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },

    /// A configured URL could not be parsed.
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A configured listen address could not be parsed.
    #[error("invalid listen address {addr}: {source}")]
    InvalidAddr {
        addr: String,
        source: std::net::AddrParseError,
    },

    /// The date lies before the earliest selectable day.
    #[error("{date} is in the past (today is {today})")]
    PastDate { date: NaiveDate, today: NaiveDate },

    /// Failed to parse a date.
    #[error("failed to parse date: {0}")]
    DateParse(#[from] chrono::ParseError),

    /// A CSS selector string could not be parsed.
    #[error("invalid CSS selector: {0}")]
    Selector(String),

    /// An expected element (HTML node or JSON field) was not found.
    #[error("expected element not found: {context}")]
    ElementNotFound { context: &'static str },

    /// A court grid row has no matching time label.
    #[error("court grid row {row} has no time label ({labels} labels found)")]
    MissingTimeLabel { row: usize, labels: usize },

    /// The booking system rejected the captured session.
    #[error("session rejected with status {status}, capture a new session")]
    SessionExpired { status: reqwest::StatusCode },

    /// A cached session or payload file could not be read.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A cached session or payload file is not valid JSON of the expected shape.
    #[error("malformed {path}: {source}")]
    MalformedFile {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl<'a> From<SelectorErrorKind<'a>> for AvailabilityError {
    fn from(err: SelectorErrorKind<'a>) -> Self {
        AvailabilityError::Selector(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AvailabilityError>;

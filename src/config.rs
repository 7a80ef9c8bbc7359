use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::NaiveDate;
use reqwest::Url;

use crate::date::format_request_date;
use crate::error::{AvailabilityError, Result};

/// Environment variable holding the availability endpoint.
pub const BASE_URL_ENV: &str = "COURT_AVAILABILITY_URL";
/// Endpoint served by [`crate::server`] on its default address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api/bookings";

pub const SERVER_ADDR_ENV: &str = "COURT_AVAILABILITY_ADDR";
pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:5000";
pub const CACHE_DIR_ENV: &str = "CLUBWISE_CACHE_DIR";
pub const CLUBWISE_URL_ENV: &str = "CLUBWISE_URL";
pub const DEFAULT_CLUBWISE_URL: &str =
    "https://indma01.clubwise.com/upsugymandsportscentre/WebServiceDispatcher.wso/CallAction/JSON";

/// Where [`crate::AvailabilityClient`] fetches availability from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: Url,
}

impl Config {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: parse_url(base_url)?,
        })
    }

    /// Read the endpoint from `COURT_AVAILABILITY_URL`, falling back to
    /// [`DEFAULT_BASE_URL`].
    pub fn from_env() -> Result<Self> {
        Self::new(&env_or(BASE_URL_ENV, DEFAULT_BASE_URL))
    }

    /// The request URL for `date`, e.g. `<base>?date=19/10/2026`.
    ///
    /// The slashes are sent literally; existing query pairs are kept.
    pub fn request_url(&self, date: NaiveDate) -> Url {
        let mut url = self.base_url.clone();
        let pair = format!("date={}", format_request_date(date));
        let query = match url.query() {
            Some(query) if !query.is_empty() => format!("{query}&{pair}"),
            _ => pair,
        };
        url.set_query(Some(&query));
        url
    }
}

/// Settings for the bookings endpoint backed by ClubWise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Directory holding `state.json`, `date_payload.json` and `show_payload.json`.
    pub cache_dir: PathBuf,
    pub clubwise_url: Url,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let addr = env_or(SERVER_ADDR_ENV, DEFAULT_SERVER_ADDR);
        let addr = addr
            .parse::<SocketAddr>()
            .map_err(|source| AvailabilityError::InvalidAddr {
                addr: addr.clone(),
                source,
            })?;
        Ok(Self {
            addr,
            cache_dir: PathBuf::from(env_or(CACHE_DIR_ENV, ".")),
            clubwise_url: parse_url(&env_or(CLUBWISE_URL_ENV, DEFAULT_CLUBWISE_URL))?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

pub(crate) fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| AvailabilityError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

use std::future::Future;

use chrono::NaiveDate;
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::{AvailabilityError, Result};
use crate::model::SlotList;

/// Anything that can produce the slots for a date.
pub trait SlotSource {
    fn fetch(&self, date: NaiveDate) -> impl Future<Output = Result<SlotList>> + Send;
}

/// Fetches availability from a bookings endpoint over HTTP.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> court_availability::Result<()> {
/// use court_availability::{AvailabilityClient, Config};
///
/// let client = AvailabilityClient::new(Config::from_env()?);
/// let slots = client.fetch(court_availability::today()).await?;
/// println!("Found {} slots", slots.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AvailabilityClient {
    http: reqwest::Client,
    config: Config,
}

impl AvailabilityClient {
    /// Create a new client with default HTTP settings.
    pub fn new(config: Config) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create a new client using the provided [`reqwest::Client`].
    ///
    /// Use this when you need to configure timeouts, proxies, headers, etc.
    pub fn with_client(client: reqwest::Client, config: Config) -> Self {
        Self {
            http: client,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch the slots for `date` with a single GET request.
    #[instrument(skip(self), fields(date = %date))]
    pub async fn fetch(&self, date: NaiveDate) -> Result<SlotList> {
        let url = self.config.request_url(date);
        let slots: SlotList = get_json(&self.http, url).await?;
        debug!(count = slots.len(), "parsed availability");
        Ok(slots)
    }
}

impl SlotSource for AvailabilityClient {
    async fn fetch(&self, date: NaiveDate) -> Result<SlotList> {
        AvailabilityClient::fetch(self, date).await
    }
}

/// GET a URL and decode the response body as JSON.
pub(crate) async fn get_json<T: DeserializeOwned>(client: &reqwest::Client, url: Url) -> Result<T> {
    debug!(%url, "fetching");

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| AvailabilityError::Http {
            url: url.to_string(),
            source: e,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(AvailabilityError::UnexpectedStatus {
            url: url.to_string(),
            status,
        });
    }

    decode_json(response, &url).await
}

pub(crate) async fn decode_json<T: DeserializeOwned>(
    response: reqwest::Response,
    url: &Url,
) -> Result<T> {
    let body = response
        .bytes()
        .await
        .map_err(|e| AvailabilityError::ResponseBody {
            url: url.to_string(),
            source: e,
        })?;

    serde_json::from_slice(&body).map_err(|e| AvailabilityError::Decode {
        url: url.to_string(),
        source: e,
    })
}

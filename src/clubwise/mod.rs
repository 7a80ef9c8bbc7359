//! Court availability scraped from the ClubWise booking system.
//!
//! ClubWise renders its multi-court booking grid as HTML fragments inside
//! JSON action responses. A browser session is captured once (cookies plus
//! the `mChangeDate` and `OnShow` action payloads); [`ClubwiseSource`] then
//! replays those payloads for any date and scrapes the grid.

mod grid;
mod payload;
mod session;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

pub use grid::ActionResponse;
pub use payload::set_payload_date;
pub use session::{StorageState, StoredCookie};

use crate::client::{decode_json, SlotSource};
use crate::error::{AvailabilityError, Result};
use crate::model::SlotList;

pub const STATE_FILE: &str = "state.json";
pub const DATE_PAYLOAD_FILE: &str = "date_payload.json";
pub const SHOW_PAYLOAD_FILE: &str = "show_payload.json";

/// Replays captured ClubWise actions to read the court grid for a date.
#[derive(Debug, Clone)]
pub struct ClubwiseSource {
    http: reqwest::Client,
    endpoint: Url,
    date_payload: Value,
    show_payload: Value,
}

impl ClubwiseSource {
    /// `http` must carry the session cookies of the captured payloads.
    pub fn new(
        http: reqwest::Client,
        endpoint: Url,
        date_payload: Value,
        show_payload: Value,
    ) -> Self {
        Self {
            http,
            endpoint,
            date_payload,
            show_payload,
        }
    }

    /// Load the session and payloads saved in `dir`.
    pub fn from_cache_dir(dir: &Path, endpoint: Url) -> Result<Self> {
        let state: StorageState = read_json(&dir.join(STATE_FILE))?;
        let date_payload: Value = read_json(&dir.join(DATE_PAYLOAD_FILE))?;
        let show_payload: Value = read_json(&dir.join(SHOW_PAYLOAD_FILE))?;

        let http = reqwest::Client::builder()
            .cookie_provider(Arc::new(state.cookie_jar()))
            .build()
            .map_err(|e| AvailabilityError::Http {
                url: endpoint.to_string(),
                source: e,
            })?;

        Ok(Self::new(http, endpoint, date_payload, show_payload))
    }

    /// Move the grid to `date`, then read it back.
    #[instrument(skip(self), fields(date = %date))]
    pub async fn fetch(&self, date: NaiveDate) -> Result<SlotList> {
        let change_date = set_payload_date(&self.date_payload, date)?;
        let response = self.post(&change_date).await?;
        if response.status() != StatusCode::OK {
            return Err(AvailabilityError::SessionExpired {
                status: response.status(),
            });
        }

        let show = set_payload_date(&self.show_payload, date)?;
        let response = self.post(&show).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AvailabilityError::UnexpectedStatus {
                url: self.endpoint.to_string(),
                status,
            });
        }

        let body: ActionResponse = decode_json(response, &self.endpoint).await?;
        let slots = body.slots()?;
        debug!(count = slots.len(), "parsed court grid");
        Ok(slots)
    }

    async fn post(&self, payload: &Value) -> Result<reqwest::Response> {
        debug!(url = %self.endpoint, "posting action");
        self.http
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await
            .map_err(|e| AvailabilityError::Http {
                url: self.endpoint.to_string(),
                source: e,
            })
    }
}

impl SlotSource for ClubwiseSource {
    async fn fetch(&self, date: NaiveDate) -> Result<SlotList> {
        ClubwiseSource::fetch(self, date).await
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| AvailabilityError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| AvailabilityError::MalformedFile {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::path::PathBuf;
    use std::sync::Mutex;

    use axum::extract::State;
    use axum::http::header::COOKIE;
    use axum::http::HeaderMap;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    use super::grid::tests::{response_json, GRID_HTML, HOURS_HTML};
    use super::*;
    use crate::model::Slot;

    /// Bodies and `Cookie` headers of every action posted to the fake server.
    #[derive(Debug, Default)]
    struct Recorded {
        bodies: Vec<Value>,
        cookies: Vec<Option<String>>,
    }

    type Seen = Arc<Mutex<Recorded>>;

    fn payload(action: &str) -> Value {
        json!({
            "ActionRequest": {
                "Header": {
                    "aSyncProps": [{
                        "sO": "oMulticourtGrid.oMCG",
                        "aP": [{ "sN": "pdCurrentDate", "sV": "01/09/2025" }]
                    }]
                },
                "aActions": [{ "sAction": action }]
            }
        })
    }

    async fn spawn_clubwise(change_date_status: StatusCode) -> (Url, Seen) {
        let seen: Seen = Arc::default();
        let app = Router::new()
            .route(
                "/CallAction/JSON",
                post(
                    move |State(seen): State<Seen>,
                          headers: HeaderMap,
                          Json(body): Json<Value>| async move {
                        let action = body["ActionRequest"]["aActions"][0]["sAction"]
                            .as_str()
                            .unwrap_or_default()
                            .to_string();
                        let cookie = headers
                            .get(COOKIE)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        let mut seen = seen.lock().unwrap();
                        seen.bodies.push(body);
                        seen.cookies.push(cookie);
                        if action == "mChangeDate" {
                            (change_date_status, Json(json!({})))
                        } else {
                            (StatusCode::OK, Json(response_json(HOURS_HTML, GRID_HTML)))
                        }
                    },
                ),
            )
            .with_state(seen.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        let url = Url::parse(&format!("http://{addr}/CallAction/JSON")).unwrap();
        (url, seen)
    }

    fn source(endpoint: Url) -> ClubwiseSource {
        ClubwiseSource::new(
            reqwest::Client::new(),
            endpoint,
            payload("mChangeDate"),
            payload("OnShow"),
        )
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 22).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_changes_date_then_reads_grid() {
        let (url, seen) = spawn_clubwise(StatusCode::OK).await;

        let slots = source(url).fetch(date()).await.unwrap();

        assert_eq!(
            slots,
            vec![
                Slot::new("09:00", vec![true, false, true]),
                Slot::new("10:00", vec![false, false, true]),
            ]
        );
        let seen = &seen.lock().unwrap().bodies;
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0]["ActionRequest"]["aActions"][0]["sAction"], "mChangeDate");
        assert_eq!(seen[1]["ActionRequest"]["aActions"][0]["sAction"], "OnShow");
        for body in seen.iter() {
            assert_eq!(
                body["ActionRequest"]["Header"]["aSyncProps"][0]["aP"][0]["sV"],
                "22/10/2026"
            );
        }
    }

    #[tokio::test]
    async fn test_rejected_session() {
        let (url, seen) = spawn_clubwise(StatusCode::UNAUTHORIZED).await;

        let err = source(url).fetch(date()).await.unwrap_err();

        assert!(matches!(
            err,
            AvailabilityError::SessionExpired { status } if status == StatusCode::UNAUTHORIZED
        ));
        assert_eq!(seen.lock().unwrap().bodies.len(), 1);
    }

    fn cache_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "court-availability-{name}-{}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_cache(dir: &Path, state: &str) {
        fs::write(dir.join(STATE_FILE), state).unwrap();
        fs::write(dir.join(DATE_PAYLOAD_FILE), payload("mChangeDate").to_string()).unwrap();
        fs::write(dir.join(SHOW_PAYLOAD_FILE), payload("OnShow").to_string()).unwrap();
    }

    #[tokio::test]
    async fn test_from_cache_dir() {
        let (url, seen) = spawn_clubwise(StatusCode::OK).await;
        let dir = cache_dir("complete");
        write_cache(
            &dir,
            r#"{"cookies":[{"name":"sid","value":"1","domain":"indma01.clubwise.com","path":"/"}]}"#,
        );

        let source = ClubwiseSource::from_cache_dir(&dir, url).unwrap();
        let slots = source.fetch(date()).await.unwrap();

        assert_eq!(slots.len(), 2);
        assert_eq!(seen.lock().unwrap().cookies, vec![None, None]);
        fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_from_cache_dir_sends_session_cookie() {
        let (url, seen) = spawn_clubwise(StatusCode::OK).await;
        let dir = cache_dir("cookie");
        write_cache(
            &dir,
            r#"{"cookies":[{"name":"sid","value":"abc","domain":"127.0.0.1","path":"/"}]}"#,
        );

        let source = ClubwiseSource::from_cache_dir(&dir, url).unwrap();
        source.fetch(date()).await.unwrap();

        let cookies = seen.lock().unwrap().cookies.clone();
        assert_eq!(cookies.len(), 2);
        for cookie in cookies {
            assert_eq!(cookie.as_deref(), Some("sid=abc"));
        }
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_from_cache_dir_missing_files() {
        let dir = cache_dir("missing");
        let url = Url::parse("http://127.0.0.1:1/CallAction/JSON").unwrap();

        let err = ClubwiseSource::from_cache_dir(&dir, url.clone()).unwrap_err();
        assert!(matches!(err, AvailabilityError::ReadFile { .. }));

        fs::write(dir.join(STATE_FILE), "not json").unwrap();
        let err = ClubwiseSource::from_cache_dir(&dir, url).unwrap_err();
        assert!(matches!(err, AvailabilityError::MalformedFile { .. }));
        fs::remove_dir_all(dir).unwrap();
    }
}

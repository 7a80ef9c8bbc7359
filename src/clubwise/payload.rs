use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{NoExpand, Regex};
use serde_json::Value;

use crate::date::{format_request_date, ISO_DATE_FORMAT, LONG_DATE_FORMAT};
use crate::error::{AvailabilityError, Result};

const GRID_OBJECT: &str = "oMulticourtGrid.oMCG";
const CURRENT_DATE_PROP: &str = "pdCurrentDate";
const HTML_PROP: &str = "psHtml";

const LONG_DATE_PATTERN: &str =
    r"(Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday) \d{2}/\d{2}/\d{4}";
const DATE_PATTERN: &str = r"\d{2}/\d{2}/\d{4}";
const ISO_DATE_PATTERN: &str = r"\d{4}-\d{2}-\d{2}";

static LONG_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(LONG_DATE_PATTERN).expect("valid long date pattern"));
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DATE_PATTERN).expect("valid date pattern"));
static ISO_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ISO_DATE_PATTERN).expect("valid ISO date pattern"));

/// Copy a captured action payload, moved to `date`.
///
/// The grid's `pdCurrentDate` is set to `DD/MM/YYYY` and every date inside
/// `psHtml` fragments is rewritten in its own format.
pub fn set_payload_date(payload: &Value, date: NaiveDate) -> Result<Value> {
    let mut data = payload.clone();
    let rewrite = DateRewrite::new(date);

    let sync_props = data
        .pointer_mut("/ActionRequest/Header/aSyncProps")
        .and_then(Value::as_array_mut)
        .ok_or(AvailabilityError::ElementNotFound {
            context: "ActionRequest.Header.aSyncProps",
        })?;

    for sync in sync_props.iter_mut() {
        let is_grid = sync.get("sO").and_then(Value::as_str) == Some(GRID_OBJECT);
        let Some(props) = sync.get_mut("aP").and_then(Value::as_array_mut) else {
            continue;
        };
        for prop in props.iter_mut() {
            let name = prop.get("sN").and_then(Value::as_str).map(str::to_owned);
            match name.as_deref() {
                Some(CURRENT_DATE_PROP) if is_grid => {
                    prop["sV"] = Value::String(rewrite.date.clone());
                }
                Some(HTML_PROP) => {
                    if let Some(html) = prop.get("sV").and_then(Value::as_str) {
                        let html = rewrite.apply(html);
                        prop["sV"] = Value::String(html);
                    }
                }
                _ => {}
            }
        }
    }

    Ok(data)
}

struct DateRewrite {
    date: String,
    iso: String,
    long: String,
}

impl DateRewrite {
    fn new(date: NaiveDate) -> Self {
        Self {
            date: format_request_date(date),
            iso: date.format(ISO_DATE_FORMAT).to_string(),
            long: date.format(LONG_DATE_FORMAT).to_string(),
        }
    }

    fn apply(&self, html: &str) -> String {
        let html = LONG_DATE_RE.replace_all(html, NoExpand(&self.long));
        let html = DATE_RE.replace_all(&html, NoExpand(&self.date));
        ISO_DATE_RE
            .replace_all(&html, NoExpand(&self.iso))
            .into_owned()
    }
}

use itertools::Itertools;
use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AvailabilityError, Result};
use crate::model::{Slot, SlotList};

const HOURS_OBJECT_SUFFIX: &str = "oHoursLabelHTML";
const GRID_OBJECT_SUFFIX: &str = "oMulticourtGridHTML";
const BOOKED_CLASS: &str = "courtBooked";

/// Response to a ClubWise `CallAction/JSON` request.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionResponse {
    #[serde(rename = "Header")]
    header: ResponseHeader,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseHeader {
    #[serde(rename = "aSyncProps", default)]
    sync_props: Vec<SyncObject>,
}

#[derive(Debug, Clone, Deserialize)]
struct SyncObject {
    #[serde(rename = "sO", default)]
    object: String,
    #[serde(rename = "aP", default)]
    props: Vec<SyncProp>,
}

#[derive(Debug, Clone, Deserialize)]
struct SyncProp {
    #[serde(rename = "sV", default)]
    value: Value,
}

impl ActionResponse {
    /// Scrape the court grid into slots.
    ///
    /// Row `i` of the grid is labelled with time `i` of the hours column.
    /// A response without grid HTML has no slots.
    pub fn slots(&self) -> Result<SlotList> {
        let times = self
            .html(HOURS_OBJECT_SUFFIX)
            .map(parse_time_labels)
            .transpose()?
            .unwrap_or_default();
        let rows = self
            .html(GRID_OBJECT_SUFFIX)
            .map(parse_court_rows)
            .transpose()?
            .unwrap_or_default();

        rows.into_iter()
            .enumerate()
            .map(|(row, free)| {
                times
                    .get(row)
                    .map(|time| Slot::new(time.clone(), free))
                    .ok_or(AvailabilityError::MissingTimeLabel {
                        row,
                        labels: times.len(),
                    })
            })
            .collect()
    }

    /// HTML of the last sync object whose name ends with `suffix`.
    fn html(&self, suffix: &str) -> Option<&str> {
        self.header
            .sync_props
            .iter()
            .rev()
            .find(|sync| sync.object.ends_with(suffix))
            .and_then(|sync| sync.props.first())
            .and_then(|prop| prop.value.as_str())
    }
}

pub(crate) fn parse_time_labels(html: &str) -> Result<Vec<String>> {
    let fragment = Html::parse_fragment(html);
    let label_selector = Selector::parse(".courtTime div")?;
    Ok(fragment
        .select(&label_selector)
        .map(|label| label.text().collect::<String>().trim().to_string())
        .collect_vec())
}

pub(crate) fn parse_court_rows(html: &str) -> Result<Vec<Vec<bool>>> {
    let fragment = Html::parse_fragment(html);
    let row_selector = Selector::parse(".courtGridRow")?;
    let cell_selector = Selector::parse(".courtGridCell")?;
    Ok(fragment
        .select(&row_selector)
        .map(|row| {
            row.select(&cell_selector)
                .map(|cell| !cell.value().classes().any(|c| c == BOOKED_CLASS))
                .collect_vec()
        })
        .collect_vec())
}

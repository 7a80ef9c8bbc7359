use std::fmt::{self, Display, Formatter, Write as _};

use itertools::Itertools;
use tracing::warn;

use crate::model::{CourtStatus, Slot};

const SPINNER: &str = "Loading availability...";
const TIME_HEADER: &str = "Time";

/// What the availability component shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityView {
    /// A fetch is in flight; any previous table is hidden.
    Loading,
    /// Nothing to show: no spinner, no table, no message.
    Empty,
    Table(AvailabilityTable),
}

impl AvailabilityView {
    pub fn new(loading: bool, slots: &[Slot]) -> Self {
        if loading {
            AvailabilityView::Loading
        } else if slots.is_empty() {
            AvailabilityView::Empty
        } else {
            AvailabilityView::Table(AvailabilityTable::new(slots))
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AvailabilityView::Loading)
    }

    pub fn table(&self) -> Option<&AvailabilityTable> {
        match self {
            AvailabilityView::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Render as an HTML fragment. Chips carry `chip-success`/`chip-error`.
    pub fn to_html(&self) -> String {
        match self {
            AvailabilityView::Loading => {
                r#"<div class="spinner" role="progressbar"></div>"#.to_string()
            }
            AvailabilityView::Empty => String::new(),
            AvailabilityView::Table(table) => table.to_html(),
        }
    }
}

impl Display for AvailabilityView {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AvailabilityView::Loading => f.write_str(SPINNER),
            AvailabilityView::Empty => Ok(()),
            AvailabilityView::Table(table) => Display::fmt(table, f),
        }
    }
}

/// Time slots × courts grid.
///
/// The court count comes from the first slot. Rows with fewer courts get
/// empty cells and extra courts are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityTable {
    courts: usize,
    rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub time: String,
    /// One cell per court column; `None` when the slot has no entry for that court.
    pub cells: Vec<Option<CourtStatus>>,
}

impl AvailabilityTable {
    pub fn new(slots: &[Slot]) -> Self {
        let courts = slots.first().map(Slot::court_count).unwrap_or_default();
        let rows = slots
            .iter()
            .map(|slot| {
                if slot.court_count() != courts {
                    warn!(
                        time = %slot.time,
                        found = slot.court_count(),
                        expected = courts,
                        "slot court count differs from first slot"
                    );
                }
                TableRow {
                    time: slot.time.clone(),
                    cells: (0..courts)
                        .map(|i| slot.free.get(i).copied().map(CourtStatus::from_free))
                        .collect(),
                }
            })
            .collect();
        Self { courts, rows }
    }

    pub fn court_count(&self) -> usize {
        self.courts
    }

    /// `Time`, then `Court 1` .. `Court N`.
    pub fn headers(&self) -> Vec<String> {
        std::iter::once(TIME_HEADER.to_string())
            .chain((1..=self.courts).map(|n| format!("Court {n}")))
            .collect()
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    fn to_html(&self) -> String {
        let mut html = String::from("<table>\n<thead><tr>");
        for header in self.headers() {
            let _ = write!(html, "<th><b>{}</b></th>", escape_html(&header));
        }
        html.push_str("</tr></thead>\n<tbody>\n");
        for row in &self.rows {
            let _ = write!(html, "<tr><td>{}</td>", escape_html(&row.time));
            for cell in &row.cells {
                match cell {
                    Some(status) => {
                        let _ = write!(
                            html,
                            r#"<td align="center"><span class="chip chip-{}">{}</span></td>"#,
                            status.color(),
                            status
                        );
                    }
                    None => html.push_str("<td></td>"),
                }
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>\n</table>");
        html
    }
}

impl Display for AvailabilityTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let headers = self.headers();
        let chip_width = "[Booked]".len();
        let time_width = self
            .rows
            .iter()
            .map(|row| row.time.chars().count())
            .chain(std::iter::once(TIME_HEADER.len()))
            .max()
            .unwrap_or_default();

        let header_line = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                if i == 0 {
                    format!("{h:<time_width$}")
                } else {
                    format!("{h:^width$}", width = chip_width.max(h.len()))
                }
            })
            .join(" | ");
        writeln!(f, "{}", header_line.trim_end())?;

        for (i, row) in self.rows.iter().enumerate() {
            let cells = row
                .cells
                .iter()
                .zip(headers.iter().skip(1))
                .map(|(cell, h)| {
                    let chip = cell.map(|s| format!("[{s}]")).unwrap_or_default();
                    format!("{chip:^width$}", width = chip_width.max(h.len()))
                })
                .join(" | ");
            let line = format!("{:<time_width$} | {cells}", row.time);
            if i + 1 == self.rows.len() {
                write!(f, "{}", line.trim_end())?;
            } else {
                writeln!(f, "{}", line.trim_end())?;
            }
        }
        Ok(())
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

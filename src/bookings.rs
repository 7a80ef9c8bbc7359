use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use crate::client::SlotSource;
use crate::error::Result;
use crate::model::SlotList;
use crate::selector::DateSelector;
use crate::view::AvailabilityView;

/// Result of a load that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response replaced the displayed slots.
    Applied { date: NaiveDate, slots: usize },
    /// A newer load started before this one finished; the response was discarded.
    Stale,
    /// The date was already selected; nothing was fetched.
    Unchanged,
}

/// The availability component: a date selector, the slots for the selected
/// date, and a loading flag.
///
/// Loads may overlap. Each load takes a request token and only the most
/// recently started one may replace the slots or clear the loading flag.
pub struct Bookings<S> {
    source: S,
    state: Mutex<State>,
}

#[derive(Debug)]
struct State {
    selector: DateSelector,
    slots: SlotList,
    loading: bool,
    latest: u64,
    mounted: bool,
}

impl<S: SlotSource> Bookings<S> {
    /// Start on today with no slots. Call [`Bookings::mount`] to load them.
    pub fn new(source: S) -> Self {
        Self::with_selector(source, DateSelector::new())
    }

    pub fn with_selector(source: S, selector: DateSelector) -> Self {
        Self {
            source,
            state: Mutex::new(State {
                selector,
                slots: SlotList::new(),
                loading: false,
                latest: 0,
                mounted: false,
            }),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.state().selector.selected()
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    pub fn slots(&self) -> SlotList {
        self.state().slots.clone()
    }

    pub fn view(&self) -> AvailabilityView {
        let state = self.state();
        AvailabilityView::new(state.loading, &state.slots)
    }

    /// Initial load for the date the selector starts on.
    pub async fn mount(&self) -> Result<LoadOutcome> {
        self.load().await
    }

    /// Select `date` and load its slots.
    ///
    /// Past dates are rejected without fetching and leave the selection as is.
    /// Re-selecting the current date only fetches if nothing was loaded yet.
    #[instrument(skip(self))]
    pub async fn select_date(&self, date: NaiveDate) -> Result<LoadOutcome> {
        let (changed, mounted) = {
            let mut state = self.state();
            (state.selector.select(date)?, state.mounted)
        };
        if !changed && mounted {
            return Ok(LoadOutcome::Unchanged);
        }
        self.load().await
    }

    /// Fetch the slots for the selected date.
    ///
    /// The loading flag is cleared however the load ends, including when the
    /// returned future is dropped. On failure the previous slots stay in place.
    pub async fn load(&self) -> Result<LoadOutcome> {
        let (token, date) = {
            let mut state = self.state();
            state.latest += 1;
            state.loading = true;
            state.mounted = true;
            (state.latest, state.selector.selected())
        };
        debug!(token, %date, "loading availability");

        let mut guard = LoadGuard {
            state: &self.state,
            token,
            done: false,
        };
        let result = self.source.fetch(date).await;
        guard.done = true;

        let mut state = lock(&self.state);
        if state.latest != token {
            match &result {
                Ok(slots) => warn!(token, %date, count = slots.len(), "discarding stale response"),
                Err(err) => warn!(token, %date, %err, "discarding stale failure"),
            }
            return Ok(LoadOutcome::Stale);
        }

        state.loading = false;
        let slots = result?;
        info!(%date, count = slots.len(), "availability loaded");
        let count = slots.len();
        state.slots = slots;
        Ok(LoadOutcome::Applied { date, slots: count })
    }

    fn state(&self) -> MutexGuard<'_, State> {
        lock(&self.state)
    }
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears the loading flag if a load is dropped before its fetch completes.
struct LoadGuard<'a> {
    state: &'a Mutex<State>,
    token: u64,
    done: bool,
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        let mut state = lock(self.state);
        if state.latest == self.token {
            debug!(token = self.token, "load cancelled");
            state.loading = false;
        }
    }
}

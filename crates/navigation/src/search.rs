//! Search control state machine.
//!
//! ```text
//! Idle -> Focused -> (Filtering <-> Focused) -> Resolved -> Idle
//! Focused | Filtering -> Idle      (blur timeout)
//! ```
//!
//! `Resolved` is the transient confirm action, never a stored phase.

use catalog::{CampusId, Catalog};
use runtime::timer::{DebounceTimer, TimerToken};
use session::{EngineFactory, FlyTo, MapSession};
use tracing::{debug, warn};

use crate::error::NavigationError;
use crate::selection::{ActiveSelection, SelectionSource};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    /// Input focused with empty text: every campus is listed.
    Focused,
    /// Input focused with text: the filtered subsequence is listed.
    Filtering,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub candidates: Vec<CampusId>,
    pub phase: SearchPhase,
}

impl SearchState {
    pub fn is_open(&self) -> bool {
        self.phase != SearchPhase::Idle
    }
}

/// What happened when a blur timer came due.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BlurOutcome {
    /// The candidate list closed.
    Closed,
    /// Focus had moved inside the search control; the list stays open.
    Suppressed,
    /// The firing was superseded or cancelled (e.g. by a selection).
    Stale,
}

/// Dataset subsequence whose names contain `query`, compared
/// case-insensitively. An empty query matches everything.
pub fn filter_candidates(catalog: &Catalog, query: &str) -> Vec<CampusId> {
    let needle = query.to_lowercase();
    catalog
        .iter()
        .filter(|(_, rec)| rec.name.to_lowercase().contains(&needle))
        .map(|(id, _)| id)
        .collect()
}

#[derive(Debug, Clone)]
pub struct SearchController {
    state: SearchState,
    blur_timer: DebounceTimer,
}

impl SearchController {
    pub fn new(blur_close_delay_ms: f64) -> Self {
        Self {
            state: SearchState::default(),
            blur_timer: DebounceTimer::new(blur_close_delay_ms),
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn query(&self) -> &str {
        &self.state.query
    }

    pub fn candidates(&self) -> &[CampusId] {
        &self.state.candidates
    }

    pub fn phase(&self) -> SearchPhase {
        self.state.phase
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn blur_pending(&self) -> bool {
        self.blur_timer.is_pending()
    }

    pub fn blur_delay_ms(&self) -> f64 {
        self.blur_timer.delay_ms()
    }

    /// Stores `text` and recomputes candidates synchronously.
    ///
    /// Typing happens in a focused input, so this also opens the list.
    pub fn on_query_change(&mut self, catalog: &Catalog, text: &str) {
        self.state.query = text.to_string();
        self.state.candidates = filter_candidates(catalog, text);
        self.state.phase = phase_for(text);
        self.blur_timer.cancel();
        debug!(query = text, candidates = self.state.candidates.len(), "query changed");
    }

    /// Opens the list for the current text (every campus when empty).
    pub fn on_focus(&mut self, catalog: &Catalog) {
        self.blur_timer.cancel();
        self.state.candidates = filter_candidates(catalog, &self.state.query);
        self.state.phase = phase_for(&self.state.query);
    }

    /// Schedules the debounced close. The returned token must be passed to
    /// [`SearchController::on_blur_elapsed`] when the delay runs out.
    pub fn on_blur(&mut self, now_ms: f64) -> TimerToken {
        self.blur_timer.schedule(now_ms)
    }

    /// Applies a due blur timer.
    ///
    /// `focus_within` is sampled at fire time: whether focus now rests on an
    /// element inside the search control.
    pub fn on_blur_elapsed(&mut self, token: TimerToken, focus_within: bool) -> BlurOutcome {
        if !self.blur_timer.fire(token) {
            return BlurOutcome::Stale;
        }
        if focus_within {
            return BlurOutcome::Suppressed;
        }
        self.close();
        BlurOutcome::Closed
    }

    /// Drives the blur timer from an explicit clock.
    pub fn poll(&mut self, now_ms: f64, focus_within: bool) -> Option<BlurOutcome> {
        let token = self.blur_timer.expired(now_ms)?;
        Some(self.on_blur_elapsed(token, focus_within))
    }

    /// Resolves to `id`: fills the input with its name, closes the list,
    /// flies the camera there and makes it the active campus.
    ///
    /// Returns the issued camera command (`None` while the map is not up).
    pub fn confirm_selection<F: EngineFactory>(
        &mut self,
        catalog: &Catalog,
        id: CampusId,
        session: &mut MapSession<F>,
        selection: &mut ActiveSelection,
    ) -> Result<Option<FlyTo>, NavigationError> {
        let rec = catalog
            .get(id)
            .ok_or_else(|| NavigationError::UnknownCampus(format!("#{}", id.index())))?;

        self.state.query = rec.name.clone();
        self.blur_timer.cancel();
        self.close();

        let cmd = session.fly_to(rec.position(), None);
        selection.set(id, SelectionSource::Search);
        debug!(campus = rec.name.as_str(), "selection confirmed");
        Ok(cmd)
    }

    /// Confirms the campus whose name equals the current query exactly.
    ///
    /// Without an exact match nothing changes and
    /// [`NavigationError::InvalidSearch`] is returned.
    pub fn submit_query<F: EngineFactory>(
        &mut self,
        catalog: &Catalog,
        session: &mut MapSession<F>,
        selection: &mut ActiveSelection,
    ) -> Result<CampusId, NavigationError> {
        let Some(id) = catalog.find_by_name(&self.state.query) else {
            warn!(query = self.state.query.as_str(), "invalid search");
            return Err(NavigationError::InvalidSearch {
                query: self.state.query.clone(),
            });
        };
        self.confirm_selection(catalog, id, session, selection)?;
        Ok(id)
    }

    fn close(&mut self) {
        self.state.candidates.clear();
        self.state.phase = SearchPhase::Idle;
    }
}

fn phase_for(text: &str) -> SearchPhase {
    if text.is_empty() {
        SearchPhase::Focused
    } else {
        SearchPhase::Filtering
    }
}

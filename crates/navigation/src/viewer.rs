//! The viewer aggregate: one catalog, one map session, and the UI state that
//! hangs off them. Hosts translate input events into calls on
//! [`CampusViewer`] and render from its accessors.

use std::collections::BTreeMap;

use catalog::{CampusId, Catalog};
use foundation::math::LngLat;
use layers::{MarkerHandle, MarkerSpec, PopupSpec};
use runtime::event_bus::{Event, EventBus};
use runtime::timer::TimerToken;
use session::{EngineFactory, FlyTo, MapSession, MountPoint, ViewerConfig};
use tracing::{debug, info, warn};

use crate::detail::{DetailPanel, DetailView};
use crate::error::NavigationError;
use crate::label::CampusLabel;
use crate::notice::{Notice, NoticeBoard};
use crate::proximity::nearest_campus;
use crate::search::{BlurOutcome, SearchController};
use crate::selection::{ActiveSelection, SelectionSource};

/// Result of a style-loaded signal.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StyleLoad {
    /// Supplementary layers attached by this load.
    pub layers_added: usize,
    /// Set on the first load after initialization: the host should call
    /// [`CampusViewer::resize`] after this many milliseconds.
    pub resize_after_ms: Option<f64>,
}

pub struct CampusViewer<F: EngineFactory> {
    catalog: Catalog,
    session: MapSession<F>,
    search: SearchController,
    selection: ActiveSelection,
    detail: DetailPanel,
    notices: NoticeBoard,
    markers: BTreeMap<MarkerHandle, CampusId>,
    events: EventBus,
}

impl<F: EngineFactory> CampusViewer<F> {
    pub fn new(catalog: Catalog, factory: F, config: ViewerConfig) -> Self {
        let search = SearchController::new(config.blur_close_delay_ms);
        let detail = DetailPanel::new(config.placeholder_image_url.clone());
        Self {
            catalog,
            session: MapSession::new(factory, config),
            search,
            selection: ActiveSelection::new(),
            detail,
            notices: NoticeBoard::new(),
            markers: BTreeMap::new(),
            events: EventBus::new(),
        }
    }

    /// Starts the map in the configured container and drops one marker per
    /// campus. Restarting tears the previous map down first.
    pub fn start(&mut self) -> Result<(), NavigationError> {
        let cfg = self.session.config();
        let mount = MountPoint::new(cfg.container_id.clone());
        let (center, zoom) = (cfg.initial_center, cfg.initial_zoom);
        self.markers.clear();

        if let Err(e) = self.session.initialize(mount, center, zoom) {
            self.events.emit("session", format!("start failed: {e}"));
            return Err(e.into());
        }
        self.events.emit("session", format!("started at {center} zoom {zoom}"));

        let color = self.session.config().marker_color;
        for (id, rec) in self.catalog.iter() {
            let spec = MarkerSpec::new(rec.position(), rec.name.clone()).with_color(color);
            match self.session.add_marker(&spec) {
                Ok(handle) => {
                    self.markers.insert(handle, id);
                }
                Err(e) => warn!(campus = rec.name.as_str(), error = %e, "marker not added"),
            }
        }
        info!(markers = self.markers.len(), "campus markers placed");
        Ok(())
    }

    pub fn on_style_loaded(&mut self) -> Result<StyleLoad, NavigationError> {
        let layers_added = self.session.on_style_loaded()?;
        let loads = self.session.style_loads();
        if loads > 0 {
            self.events
                .emit("style", format!("load #{loads}, {layers_added} layer(s) added"));
        }
        let resize_after_ms = (loads == 1).then(|| self.session.config().resize_delay_ms);
        Ok(StyleLoad {
            layers_added,
            resize_after_ms,
        })
    }

    pub fn resize(&mut self) {
        self.session.resize();
    }

    pub fn on_query_change(&mut self, text: &str) {
        self.search.on_query_change(&self.catalog, text);
        self.events.emit(
            "query",
            format!("{text:?} -> {} candidate(s)", self.search.candidates().len()),
        );
    }

    pub fn on_focus(&mut self) {
        self.search.on_focus(&self.catalog);
        self.events.emit(
            "focus",
            format!("{} candidate(s)", self.search.candidates().len()),
        );
    }

    pub fn on_blur(&mut self, now_ms: f64) -> TimerToken {
        let token = self.search.on_blur(now_ms);
        debug!(token = token.id(), now_ms, "blur close scheduled");
        token
    }

    pub fn on_blur_elapsed(&mut self, token: TimerToken, focus_within: bool) -> BlurOutcome {
        let outcome = self.search.on_blur_elapsed(token, focus_within);
        self.record_blur(outcome);
        outcome
    }

    /// Fires the blur timer if it is due at `now_ms`.
    pub fn poll_timers(&mut self, now_ms: f64, focus_within: bool) -> Option<BlurOutcome> {
        let outcome = self.search.poll(now_ms, focus_within)?;
        self.record_blur(outcome);
        Some(outcome)
    }

    fn record_blur(&mut self, outcome: BlurOutcome) {
        match outcome {
            BlurOutcome::Closed => self.events.emit("blur", "candidate list closed"),
            BlurOutcome::Suppressed => self.events.emit("blur", "close suppressed: focus within"),
            BlurOutcome::Stale => debug!("stale blur timer ignored"),
        }
    }

    pub fn confirm_selection(&mut self, id: CampusId) -> Result<Option<FlyTo>, NavigationError> {
        let cmd = self.search.confirm_selection(
            &self.catalog,
            id,
            &mut self.session,
            &mut self.selection,
        )?;
        self.emit_selected();
        Ok(cmd)
    }

    /// Confirms a candidate by its displayed name.
    pub fn confirm_by_name(&mut self, name: &str) -> Result<CampusId, NavigationError> {
        let id = self
            .catalog
            .find_by_name(name)
            .ok_or_else(|| NavigationError::UnknownCampus(name.to_string()))?;
        self.confirm_selection(id)?;
        Ok(id)
    }

    /// Submits the current query. A miss raises the invalid-search notice.
    pub fn submit_query(&mut self) -> Result<CampusId, NavigationError> {
        match self
            .search
            .submit_query(&self.catalog, &mut self.session, &mut self.selection)
        {
            Ok(id) => {
                self.emit_selected();
                Ok(id)
            }
            Err(NavigationError::InvalidSearch { query }) => {
                self.events.emit("invalid-search", format!("{query:?}"));
                self.notices.raise(Notice::InvalidSearch {
                    query: query.clone(),
                });
                Err(NavigationError::InvalidSearch { query })
            }
            Err(e) => Err(e),
        }
    }

    /// Re-evaluates the nearest campus after the camera settles.
    ///
    /// Returns `None` when the map is not running or the catalog is empty.
    pub fn on_move_end(&mut self) -> Option<CampusId> {
        let center = self.session.center()?;
        self.on_move_end_at(center)
    }

    /// Makes the campus nearest to `center` active, whatever was selected
    /// before.
    pub fn on_move_end_at(&mut self, center: LngLat) -> Option<CampusId> {
        let id = nearest_campus(&self.catalog, center)?;
        let changed = self.selection.set(id, SelectionSource::Proximity);
        if let Some(rec) = self.catalog.get(id) {
            if changed {
                info!(campus = rec.name.as_str(), "nearest campus changed");
            }
            self.events.emit("nearest", format!("{center} -> {}", rec.name));
        }
        Some(id)
    }

    pub fn on_marker_click(&mut self, handle: MarkerHandle) -> Result<CampusId, NavigationError> {
        let id = *self
            .markers
            .get(&handle)
            .ok_or_else(|| NavigationError::UnknownCampus(format!("marker #{}", handle.0)))?;
        self.detail.show_detail(id);
        self.selection.set(id, SelectionSource::Marker);
        if let Some(rec) = self.catalog.get(id) {
            self.events.emit("marker", rec.name.clone());
        }
        Ok(id)
    }

    /// Marker handle placed for `id`, if the map is running.
    pub fn marker_for(&self, id: CampusId) -> Option<MarkerHandle> {
        self.markers
            .iter()
            .find_map(|(h, c)| (*c == id).then_some(*h))
    }

    /// Opens the detail panel for the active campus. No-op without one.
    pub fn open_active_detail(&mut self) -> Option<CampusId> {
        let id = self.selection.selected()?;
        self.detail.show_detail(id);
        if let Some(rec) = self.catalog.get(id) {
            self.events.emit("detail", format!("opened {}", rec.name));
        }
        Some(id)
    }

    pub fn dismiss_detail(&mut self) {
        if self.detail.is_visible() {
            self.detail.dismiss();
            self.events.emit("detail", "dismissed");
        }
    }

    pub fn on_image_error(&mut self) {
        self.detail.on_image_load_failure();
    }

    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        self.notices.dismiss()
    }

    /// Shows the credit popup where the map was clicked.
    pub fn on_map_click(&mut self, at: LngLat) -> Result<(), NavigationError> {
        let popup = PopupSpec::credit(at, self.session.config().credit.clone());
        self.session.show_popup(&popup)?;
        self.events.emit("popup", format!("credit at {at}"));
        Ok(())
    }

    fn emit_selected(&mut self) {
        if let Some(name) = self.selection.selected_name(&self.catalog) {
            self.events.emit("select", name.to_string());
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn session(&self) -> &MapSession<F> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut MapSession<F> {
        &mut self.session
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn selection(&self) -> &ActiveSelection {
        &self.selection
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.selection.selected_name(&self.catalog)
    }

    pub fn detail(&self) -> &DetailPanel {
        &self.detail
    }

    /// The detail panel's content while it is visible.
    pub fn detail_view(&self) -> Option<DetailView> {
        if !self.detail.is_visible() {
            return None;
        }
        self.detail.view(&self.catalog)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notices.current()
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn label(&self) -> CampusLabel {
        CampusLabel::from_selection(&self.selection, &self.catalog)
    }

    /// Retained trail, oldest first. The bus is bounded so a long-lived
    /// host that never drains keeps at most `DEFAULT_EVENT_CAPACITY` events.
    pub fn events(&self) -> impl ExactSizeIterator<Item = &Event> + DoubleEndedIterator + '_ {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    /// Tears the map down. UI state is kept.
    pub fn shutdown(&mut self) -> bool {
        self.markers.clear();
        let torn_down = self.session.shutdown();
        if torn_down {
            self.events.emit("session", "shut down");
        }
        torn_down
    }
}

#[cfg(test)]
mod tests {
    use super::CampusViewer;
    use crate::error::NavigationError;
    use crate::notice::Notice;
    use crate::search::BlurOutcome;
    use crate::selection::SelectionSource;
    use catalog::{CampusRecord, Catalog};
    use foundation::math::LngLat;
    use layers::MarkerHandle;
    use pretty_assertions::assert_eq;
    use session::{CallLog, EngineCall, FlyTo, RecordingFactory, ViewerConfig};

    fn ab() -> Catalog {
        Catalog::from_records(vec![
            CampusRecord::new("A", 0.0, 0.0).with_image_url("a.jpg"),
            CampusRecord::new("B", 1.0, 1.0),
        ])
        .unwrap()
    }

    fn viewer() -> (CampusViewer<RecordingFactory>, CallLog) {
        let factory = RecordingFactory::new();
        let log = factory.log();
        let mut v = CampusViewer::new(ab(), factory, ViewerConfig::default());
        v.start().unwrap();
        (v, log)
    }

    #[test]
    fn start_places_one_marker_per_campus() {
        let (v, log) = viewer();
        let markers = log.count(|c| matches!(c, EngineCall::AddMarker { .. }));
        assert_eq!(markers, 2);
        let b = v.catalog().find_by_name("B").unwrap();
        assert_eq!(v.marker_for(b), Some(MarkerHandle(1)));
    }

    #[test]
    fn start_failure_leaves_state_untouched() {
        let mut factory = RecordingFactory::new();
        factory.fail_next("no webgl");
        let mut v = CampusViewer::new(ab(), factory, ViewerConfig::default());
        let err = v.start().unwrap_err();
        assert!(matches!(err, NavigationError::Session(_)));
        assert!(!v.session().is_initialized());
        assert_eq!(v.selected_name(), None);
        assert_eq!(v.search().query(), "");
    }

    #[test]
    fn style_load_requests_a_single_resize() {
        let (mut v, log) = viewer();
        let first = v.on_style_loaded().unwrap();
        assert_eq!(first.layers_added, 1);
        assert_eq!(first.resize_after_ms, Some(100.0));

        let again = v.on_style_loaded().unwrap();
        assert_eq!(again.layers_added, 0);
        assert_eq!(again.resize_after_ms, None);

        v.resize();
        assert_eq!(log.count(|c| matches!(c, EngineCall::Resize)), 1);
    }

    #[test]
    fn two_campus_scenario() {
        let (mut v, log) = viewer();
        log.clear();

        v.on_query_change("a");
        let names: Vec<&str> = v
            .search()
            .candidates()
            .iter()
            .map(|id| v.catalog().get(*id).unwrap().name.as_str())
            .collect();
        assert_eq!(names, vec!["A"]);

        v.on_move_end_at(LngLat::new(0.9, 0.9));
        assert_eq!(v.selected_name(), Some("B"));

        v.on_query_change("Z");
        let before = v.search().state().clone();
        let err = v.submit_query().unwrap_err();
        assert!(matches!(err, NavigationError::InvalidSearch { .. }));
        assert_eq!(v.selected_name(), Some("B"));
        assert_eq!(v.search().state(), &before);
        assert_eq!(
            v.notice(),
            Some(&Notice::InvalidSearch {
                query: "Z".to_string()
            })
        );
        assert!(log.fly_tos().is_empty());
    }

    #[test]
    fn invalid_search_is_signalled_once_per_submit() {
        let (mut v, _log) = viewer();
        v.on_query_change("nope");
        for _ in 0..3 {
            assert!(v.submit_query().is_err());
        }
        assert_eq!(v.notices().raised(), 3);
        let trail = v.events().filter(|e| e.kind == "invalid-search").count();
        assert_eq!(trail, 3);
        assert!(v.dismiss_notice().is_some());
        assert_eq!(v.notice(), None);
    }

    #[test]
    fn selection_click_wins_over_pending_blur() {
        let (mut v, _log) = viewer();
        v.on_focus();
        assert!(v.search().is_open());

        let tok = v.on_blur(1_000.0);
        v.confirm_by_name("B").unwrap();
        assert!(!v.search().is_open());
        assert_eq!(v.selected_name(), Some("B"));

        assert_eq!(v.on_blur_elapsed(tok, false), BlurOutcome::Stale);
        assert_eq!(v.poll_timers(5_000.0, false), None);
        assert_eq!(v.selected_name(), Some("B"));
    }

    #[test]
    fn blur_without_click_closes_list() {
        let (mut v, _log) = viewer();
        v.on_focus();
        v.on_blur(0.0);
        assert_eq!(v.poll_timers(99.0, false), None);
        assert_eq!(v.poll_timers(100.0, false), Some(BlurOutcome::Closed));
        assert!(v.search().candidates().is_empty());
    }

    #[test]
    fn focus_leaving_candidate_closes_after_suppressed_blur() {
        let (mut v, _log) = viewer();
        v.on_focus();
        let first = v.on_blur(0.0);
        // Focus moved onto a candidate inside the search root.
        assert_eq!(v.on_blur_elapsed(first, true), BlurOutcome::Suppressed);
        assert!(v.search().is_open());

        // Focus then leaves the candidate for somewhere outside the root.
        let second = v.on_blur(500.0);
        assert_eq!(v.on_blur_elapsed(second, false), BlurOutcome::Closed);
        assert!(!v.search().is_open());
        assert_eq!(v.events().filter(|e| e.kind == "blur").count(), 2);
    }

    #[test]
    fn long_session_keeps_event_trail_bounded() {
        let (mut v, _log) = viewer();
        for i in 0..5_000 {
            let x = f64::from(i % 2);
            v.on_move_end_at(LngLat::new(x, x));
            v.on_query_change(if i % 2 == 0 { "a" } else { "b" });
        }
        assert_eq!(v.events().len(), runtime::event_bus::DEFAULT_EVENT_CAPACITY);
        let newest = v.events().next_back().map(|e| e.seq);
        let oldest = v.events().next().map(|e| e.seq);
        assert_eq!(
            newest.zip(oldest).map(|(n, o)| n - o + 1),
            Some(runtime::event_bus::DEFAULT_EVENT_CAPACITY as u64)
        );
        assert_eq!(v.drain_events().len(), runtime::event_bus::DEFAULT_EVENT_CAPACITY);
        assert_eq!(v.events().len(), 0);
    }

    #[test]
    fn move_end_reads_engine_center() {
        let (mut v, _log) = viewer();
        v.session_mut()
            .engine_mut()
            .unwrap()
            .set_center(LngLat::new(0.1, -0.2));
        let a = v.on_move_end().unwrap();
        assert_eq!(v.catalog().get(a).unwrap().name, "A");
        assert_eq!(v.selection().source(), Some(SelectionSource::Proximity));
        assert_eq!(v.label().text, "Nearest: A");
    }

    #[test]
    fn proximity_overrides_search_selection() {
        let (mut v, _log) = viewer();
        v.confirm_by_name("B").unwrap();
        // The fly-to moved the recorded camera onto B.
        assert_eq!(v.on_move_end().map(|id| id.index()), Some(1));
        v.on_move_end_at(LngLat::new(0.0, 0.0));
        assert_eq!(v.selected_name(), Some("A"));
    }

    #[test]
    fn marker_click_opens_detail_without_flying() {
        let (mut v, log) = viewer();
        log.clear();
        let id = v.on_marker_click(MarkerHandle(0)).unwrap();
        assert_eq!(v.catalog().get(id).unwrap().name, "A");
        assert_eq!(v.selection().source(), Some(SelectionSource::Marker));
        assert_eq!(v.detail_view().unwrap().name, "A");
        assert!(log.fly_tos().is_empty());

        v.on_image_error();
        assert!(v.detail_view().unwrap().image.is_placeholder());

        v.dismiss_detail();
        assert_eq!(v.detail_view(), None);

        let err = v.on_marker_click(MarkerHandle(9)).unwrap_err();
        assert!(matches!(err, NavigationError::UnknownCampus(_)));
    }

    #[test]
    fn open_active_detail_needs_a_selection() {
        let (mut v, _log) = viewer();
        assert_eq!(v.open_active_detail(), None);
        assert!(!v.label().can_open_detail);

        v.on_move_end_at(LngLat::new(1.0, 1.0));
        v.open_active_detail().unwrap();
        assert_eq!(v.detail_view().unwrap().name, "B");
    }

    #[test]
    fn map_click_opens_credit_popup() {
        let (mut v, log) = viewer();
        v.on_map_click(LngLat::new(0.5, 0.5)).unwrap();
        assert_eq!(
            log.count(|c| *c == EngineCall::ShowPopup(LngLat::new(0.5, 0.5))),
            1
        );
    }

    #[test]
    fn confirm_twice_flies_twice() {
        let (mut v, log) = viewer();
        log.clear();
        v.confirm_by_name("A").unwrap();
        v.confirm_by_name("A").unwrap();
        let fly = FlyTo::new(LngLat::new(0.0, 0.0), 17.0);
        assert_eq!(log.fly_tos(), vec![fly, fly]);
        assert_eq!(v.selection().revision(), 2);
    }

    #[test]
    fn restart_and_shutdown_tear_down_engine() {
        let (mut v, log) = viewer();
        v.start().unwrap();
        assert_eq!(log.count(|c| *c == EngineCall::Teardown), 1);
        assert!(v.shutdown());
        assert!(!v.shutdown());
        assert_eq!(log.count(|c| *c == EngineCall::Teardown), 2);
        assert_eq!(v.marker_for(v.catalog().find_by_name("A").unwrap()), None);
    }
}

//! Browser host for the campus viewer.
//!
//! The page loads Mapbox GL JS, provides the UI containers listed in
//! [`dom`], and calls [`start_viewer`] with a JSON [`ViewerConfig`].
//! All viewer state lives in one thread-local slot; every DOM or map event
//! borrows it for the duration of a single handler and then re-renders.

use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};

use catalog::Catalog;
use foundation::math::LngLat;
use gloo_net::http::Request;
use layers::MarkerHandle;
use navigation::{CampusViewer, DetailView};
use serde::Serialize;
use session::{ControlSlot, ViewerConfig};
use tracing::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

mod dom;
mod logging;
mod mapbox;

use dom::CampusLabelControl;
use mapbox::MapboxFactory;

static INITIALIZED: AtomicBool = AtomicBool::new(false);
static DOM_WIRED: AtomicBool = AtomicBool::new(false);

/// Signals forwarded from the map engine.
#[derive(Debug, Clone, Copy)]
pub(crate) enum MapEvent {
    StyleLoaded,
    MoveEnd,
    Click(Option<LngLat>),
    MarkerClick(MarkerHandle),
}

// Field order is drop order: the label unmounts before the map goes away.
struct HostState {
    label: Option<ControlSlot<CampusLabelControl>>,
    viewer: CampusViewer<MapboxFactory>,
}

thread_local! {
    static STATE: RefCell<Option<HostState>> = const { RefCell::new(None) };
}

/// Everything the DOM renders, also exposed to page scripts as JSON.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiSnapshot {
    pub query: String,
    pub open: bool,
    pub candidates: Vec<String>,
    pub selected: Option<String>,
    pub label: String,
    pub can_open_detail: bool,
    pub detail: Option<DetailView>,
    pub notice: Option<String>,
}

impl HostState {
    fn snapshot(&self) -> UiSnapshot {
        let v = &self.viewer;
        let label = v.label();
        UiSnapshot {
            query: v.search().query().to_string(),
            open: v.search().is_open(),
            candidates: v
                .search()
                .candidates()
                .iter()
                .filter_map(|id| v.catalog().get(*id))
                .map(|r| r.name.clone())
                .collect(),
            selected: v.selected_name().map(str::to_string),
            label: label.text,
            can_open_detail: label.can_open_detail,
            detail: v.detail_view(),
            notice: v.notice().map(|n| n.message()),
        }
    }

    fn handle_map_event(&mut self, event: MapEvent) {
        match event {
            MapEvent::StyleLoaded => match self.viewer.on_style_loaded() {
                Ok(load) => {
                    if let Some(ms) = load.resize_after_ms {
                        defer(ms, || with_host(|h| h.viewer.resize()));
                    }
                }
                Err(e) => warn!(error = %e, "style load handling failed"),
            },
            MapEvent::MoveEnd => {
                self.viewer.on_move_end();
            }
            MapEvent::Click(Some(at)) => {
                if let Err(e) = self.viewer.on_map_click(at) {
                    warn!(error = %e, "credit popup failed");
                }
            }
            MapEvent::Click(None) => {}
            MapEvent::MarkerClick(handle) => {
                if let Err(e) = self.viewer.on_marker_click(handle) {
                    warn!(error = %e, "marker click ignored");
                }
            }
        }
    }
}

/// Runs `f` on the live host state; returns `R::default()` when the viewer
/// is not running or the state is already borrowed.
fn with_host<F, R>(f: F) -> R
where
    F: FnOnce(&mut HostState) -> R,
    R: Default,
{
    STATE
        .try_with(|cell| match cell.try_borrow_mut() {
            Ok(mut slot) => slot.as_mut().map(f).unwrap_or_default(),
            Err(_) => {
                warn!("viewer state busy; event dropped");
                R::default()
            }
        })
        .unwrap_or_default()
}

fn state_busy() -> bool {
    STATE
        .try_with(|cell| cell.try_borrow_mut().is_err())
        .unwrap_or(false)
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Runs `f` after `delay_ms` on the browser event loop.
fn defer(delay_ms: f64, f: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let cb = Closure::once_into_js(f);
    if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        cb.unchecked_ref(),
        delay_ms.max(0.0).round() as i32,
    ) {
        warn!(error = ?e, "setTimeout failed");
    }
}

fn render() {
    let snapshot = with_host(|h| {
        for event in h.viewer.drain_events() {
            debug!(seq = event.seq, kind = event.kind, "{}", event.message);
        }
        let ui = h.snapshot();
        if let Some(slot) = &h.label {
            if let Some(el) = slot.handle() {
                slot.control().update(el, &h.viewer.label());
            }
        }
        Some(ui)
    });
    if let Some(ui) = snapshot {
        if let Err(e) = dom::render(&ui) {
            warn!(error = ?e, "render failed");
        }
    }
}

pub(crate) fn dispatch_map_event(event: MapEvent) {
    // Engine calls made while handling an event may fire further events
    // synchronously; those wait for the current handler to finish.
    if state_busy() {
        defer(0.0, move || dispatch_map_event(event));
        return;
    }
    with_host(|h| h.handle_map_event(event));
    render();
}

pub(crate) fn ui_query(text: &str) {
    with_host(|h| h.viewer.on_query_change(text));
    render();
}

pub(crate) fn ui_focus() {
    with_host(|h| h.viewer.on_focus());
    render();
}

pub(crate) fn ui_blur() {
    let Some((token, delay)) = with_host(|h| {
        let token = h.viewer.on_blur(now_ms());
        Some((token, h.viewer.search().blur_delay_ms()))
    }) else {
        return;
    };
    defer(delay, move || {
        let focus_within = dom::focus_within_search();
        with_host(|h| {
            h.viewer.on_blur_elapsed(token, focus_within);
        });
        render();
    });
}

pub(crate) fn ui_submit() {
    if let Some(Err(e)) = with_host(|h| Some(h.viewer.submit_query())) {
        info!(error = %e, "search submit rejected");
    }
    render();
}

pub(crate) fn ui_select(name: &str) {
    if let Some(Err(e)) = with_host(|h| Some(h.viewer.confirm_by_name(name))) {
        warn!(error = %e, "candidate selection failed");
    }
    render();
}

pub(crate) fn ui_open_active_detail() {
    with_host(|h| h.viewer.open_active_detail());
    render();
}

pub(crate) fn ui_dismiss_detail() {
    with_host(|h| h.viewer.dismiss_detail());
    render();
}

pub(crate) fn ui_image_error() {
    with_host(|h| h.viewer.on_image_error());
    render();
}

pub(crate) fn ui_dismiss_notice() {
    with_host(|h| h.viewer.dismiss_notice());
    render();
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    console_error_panic_hook::set_once();
    logging::init();
    Ok(())
}

/// Boots the viewer from a JSON [`ViewerConfig`] (every field optional).
///
/// Uses the bundled campus list unless `datasetUrl` is set, in which case
/// the list is fetched first and the viewer starts when it arrives.
#[wasm_bindgen]
pub fn start_viewer(config_json: &str) -> Result<(), JsValue> {
    let raw = if config_json.trim().is_empty() {
        "{}"
    } else {
        config_json
    };
    let config = ViewerConfig::from_json_str(raw).map_err(js_error)?;

    match config.dataset_url.clone() {
        Some(url) => {
            spawn_local(async move {
                let booted = match fetch_catalog(&url).await {
                    Ok(catalog) => boot(catalog, config),
                    Err(e) => Err(e),
                };
                if let Err(e) = booted {
                    warn!(url = url.as_str(), error = ?e, "viewer failed to start");
                }
            });
            Ok(())
        }
        None => boot(Catalog::bundled().map_err(js_error)?, config),
    }
}

/// Tears the map down and clears the UI state.
#[wasm_bindgen]
pub fn stop_viewer() {
    let prev = STATE.with(|cell| cell.borrow_mut().take());
    if prev.is_some() {
        info!("viewer stopped");
    }
    drop(prev);
}

/// Current UI state as JSON, or `null` when the viewer is not running.
#[wasm_bindgen]
pub fn ui_snapshot_json() -> Result<String, JsValue> {
    let snapshot = with_host(|h| Some(h.snapshot()));
    serde_json::to_string(&snapshot).map_err(js_error)
}

fn boot(catalog: Catalog, config: ViewerConfig) -> Result<(), JsValue> {
    stop_viewer();

    let container_id = config.container_id.clone();
    let mut viewer = CampusViewer::new(catalog, MapboxFactory, config);
    viewer.start().map_err(js_error)?;

    let container = dom::document()?.get_element_by_id(&container_id);
    let label = match container {
        Some(host) => match ControlSlot::mount(CampusLabelControl::default(), &host) {
            Ok(slot) => Some(slot),
            Err(e) => {
                warn!(error = %e, "campus label not mounted");
                None
            }
        },
        None => None,
    };

    if !DOM_WIRED.swap(true, Ordering::SeqCst) {
        if let Err(e) = dom::wire() {
            DOM_WIRED.store(false, Ordering::SeqCst);
            warn!(error = ?e, "search UI not wired");
        }
    }

    info!(campuses = viewer.catalog().len(), "campus viewer started");
    STATE.with(|cell| *cell.borrow_mut() = Some(HostState { viewer, label }));
    render();
    Ok(())
}

async fn fetch_catalog(url: &str) -> Result<Catalog, JsValue> {
    let resp = Request::get(url).send().await.map_err(js_error)?;
    let text = resp.text().await.map_err(js_error)?;
    Catalog::from_json_str(&text).map_err(js_error)
}

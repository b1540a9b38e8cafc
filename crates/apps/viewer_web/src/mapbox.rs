//! Mapbox GL JS bindings and the [`MapEngine`] implementation on top of them.
//!
//! Only the handful of calls the viewer needs are bound. Options cross the
//! boundary as JSON built by the `layers`/`session` specs.

use foundation::math::LngLat;
use layers::{ControlSpec, LayerId, MarkerHandle, MarkerSpec, PopupSpec, StyleLayer};
use session::{EngineError, EngineFactory, FlyTo, MapEngine, MapOptions, MountPoint};
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::MapEvent;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = mapboxgl)]
    pub type Map;

    #[wasm_bindgen(catch, constructor, js_namespace = mapboxgl)]
    fn new(options: &JsValue) -> Result<Map, JsValue>;

    #[wasm_bindgen(catch, method, js_name = addLayer)]
    fn add_layer(this: &Map, layer: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = getLayer)]
    fn get_layer(this: &Map, id: &str) -> JsValue;

    #[wasm_bindgen(catch, method, js_name = addControl)]
    fn add_control(this: &Map, control: &JsValue, position: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = flyTo)]
    fn fly_to(this: &Map, options: &JsValue);

    #[wasm_bindgen(method, js_name = getCenter)]
    fn get_center(this: &Map) -> MapLngLat;

    #[wasm_bindgen(method)]
    fn resize(this: &Map);

    #[wasm_bindgen(method)]
    fn remove(this: &Map);

    #[wasm_bindgen(method)]
    fn on(this: &Map, event: &str, listener: &Closure<dyn FnMut(JsValue)>);

    #[wasm_bindgen(js_namespace = mapboxgl, js_name = LngLat)]
    pub type MapLngLat;

    #[wasm_bindgen(method, getter)]
    fn lng(this: &MapLngLat) -> f64;

    #[wasm_bindgen(method, getter)]
    fn lat(this: &MapLngLat) -> f64;

    #[wasm_bindgen(js_namespace = mapboxgl)]
    type Marker;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl)]
    fn new(options: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = setLngLat)]
    fn set_lng_lat(this: &Marker, lng_lat: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &Marker, map: &Map) -> Marker;

    #[wasm_bindgen(method, js_name = getElement)]
    fn get_element(this: &Marker) -> web_sys::HtmlElement;

    #[wasm_bindgen(method, js_name = remove)]
    fn remove_marker(this: &Marker);

    #[wasm_bindgen(js_namespace = mapboxgl)]
    type Popup;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl)]
    fn new(options: &JsValue) -> Popup;

    #[wasm_bindgen(method, js_name = setLngLat)]
    fn set_lng_lat(this: &Popup, lng_lat: &JsValue) -> Popup;

    #[wasm_bindgen(method, js_name = setHTML)]
    fn set_html(this: &Popup, html: &str) -> Popup;

    #[wasm_bindgen(method, js_name = setMaxWidth)]
    fn set_max_width(this: &Popup, width: &str) -> Popup;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &Popup, map: &Map) -> Popup;

    #[wasm_bindgen(method, js_name = remove)]
    fn remove_popup(this: &Popup);

    #[wasm_bindgen(js_namespace = mapboxgl)]
    type AttributionControl;
    #[wasm_bindgen(constructor, js_namespace = mapboxgl)]
    fn new(options: &JsValue) -> AttributionControl;

    #[wasm_bindgen(js_namespace = mapboxgl)]
    type NavigationControl;
    #[wasm_bindgen(constructor, js_namespace = mapboxgl)]
    fn new() -> NavigationControl;

    #[wasm_bindgen(js_namespace = mapboxgl)]
    type FullscreenControl;
    #[wasm_bindgen(constructor, js_namespace = mapboxgl)]
    fn new() -> FullscreenControl;

    #[wasm_bindgen(js_namespace = mapboxgl)]
    type GeolocateControl;
    #[wasm_bindgen(constructor, js_namespace = mapboxgl)]
    fn new(options: &JsValue) -> GeolocateControl;

    #[wasm_bindgen(js_namespace = mapboxgl)]
    type ScaleControl;
    #[wasm_bindgen(constructor, js_namespace = mapboxgl)]
    fn new(options: &JsValue) -> ScaleControl;
}

/// `serde_json::Value` to a plain JS object.
pub fn to_js(value: &serde_json::Value) -> Result<JsValue, JsValue> {
    js_sys::JSON::parse(&value.to_string())
}

fn js_err(e: JsValue) -> String {
    e.as_string()
        .or_else(|| {
            js_sys::JSON::stringify(&e)
                .ok()
                .and_then(|s| s.as_string())
        })
        .unwrap_or_else(|| "unknown JS error".to_string())
}

fn lng_lat_js(p: LngLat) -> JsValue {
    let arr = js_sys::Array::new();
    arr.push(&JsValue::from_f64(p.lng));
    arr.push(&JsValue::from_f64(p.lat));
    arr.into()
}

fn rejected(what: impl Into<String>, e: JsValue) -> EngineError {
    EngineError::Rejected {
        what: what.into(),
        reason: js_err(e),
    }
}

type Listener = Closure<dyn FnMut(JsValue)>;

/// One live `mapboxgl.Map` plus everything attached to it.
pub struct MapboxEngine {
    map: Map,
    markers: Vec<Marker>,
    popup: Option<Popup>,
    // Dropped only after `map.remove()` so JS never calls a freed closure.
    listeners: Vec<Listener>,
}

impl MapboxEngine {
    fn listen(&mut self, event: &'static str, dispatch: impl Fn(JsValue) -> MapEvent + 'static) {
        let cb: Listener = Closure::new(move |ev: JsValue| crate::dispatch_map_event(dispatch(ev)));
        self.map.on(event, &cb);
        self.listeners.push(cb);
    }
}

impl MapEngine for MapboxEngine {
    fn add_layer(&mut self, layer: &dyn StyleLayer) -> Result<(), EngineError> {
        let id = layer.id();
        let spec = to_js(&layer.to_style_json()).map_err(|e| rejected(format!("layer {id}"), e))?;
        self.map
            .add_layer(&spec)
            .map_err(|e| rejected(format!("layer {id}"), e))
    }

    fn has_layer(&self, id: &LayerId) -> bool {
        let layer = self.map.get_layer(id.as_str());
        !(layer.is_undefined() || layer.is_null())
    }

    fn add_control(&mut self, control: &ControlSpec) -> Result<(), EngineError> {
        let options =
            to_js(&control.options_json()).map_err(|e| rejected(control.kind(), e))?;
        let ctl: JsValue = match control {
            ControlSpec::Attribution { .. } => AttributionControl::new(&options).into(),
            ControlSpec::Navigation { .. } => NavigationControl::new().into(),
            ControlSpec::Fullscreen { .. } => FullscreenControl::new().into(),
            ControlSpec::Geolocate { .. } => GeolocateControl::new(&options).into(),
            ControlSpec::Scale { .. } => ScaleControl::new(&options).into(),
        };
        self.map
            .add_control(&ctl, control.position().as_str())
            .map_err(|e| rejected(control.kind(), e))
    }

    fn add_marker(&mut self, marker: &MarkerSpec) -> Result<MarkerHandle, EngineError> {
        let options = to_js(&marker.options_json())
            .map_err(|e| rejected(format!("marker {}", marker.title), e))?;
        let handle = MarkerHandle(self.markers.len() as u32);
        let m = Marker::new(&options);
        m.set_lng_lat(&lng_lat_js(marker.position)).add_to(&self.map);

        let el = m.get_element();
        el.set_title(&marker.title);
        let cb: Listener = Closure::new(move |ev: JsValue| {
            // Keep the click from reaching the map's credit popup handler.
            if let Some(ev) = ev.dyn_ref::<web_sys::Event>() {
                ev.stop_propagation();
            }
            crate::dispatch_map_event(MapEvent::MarkerClick(handle));
        });
        el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .map_err(|e| rejected(format!("marker {}", marker.title), e))?;
        self.listeners.push(cb);
        self.markers.push(m);
        Ok(handle)
    }

    fn fly_to(&mut self, command: &FlyTo) {
        match to_js(&command.to_json()) {
            Ok(options) => self.map.fly_to(&options),
            Err(e) => warn!(error = js_err(e), "flyTo options rejected"),
        }
    }

    fn center(&self) -> LngLat {
        let c = self.map.get_center();
        LngLat::new(c.lng(), c.lat())
    }

    fn resize(&mut self) {
        self.map.resize();
    }

    fn show_popup(&mut self, popup: &PopupSpec) -> Result<(), EngineError> {
        let options = to_js(&popup.options_json()).map_err(|e| rejected("popup", e))?;
        if let Some(prev) = self.popup.take() {
            prev.remove_popup();
        }
        let p = Popup::new(&options);
        p.set_lng_lat(&lng_lat_js(popup.position))
            .set_html(&popup.html())
            .set_max_width(&popup.max_width)
            .add_to(&self.map);
        self.popup = Some(p);
        Ok(())
    }

    fn teardown(&mut self) {
        if let Some(p) = self.popup.take() {
            p.remove_popup();
        }
        for m in self.markers.drain(..) {
            m.remove_marker();
        }
        self.map.remove();
        self.listeners.clear();
        debug!("mapbox map removed");
    }
}

/// Builds [`MapboxEngine`]s inside DOM containers looked up by id.
#[derive(Debug, Default)]
pub struct MapboxFactory;

impl EngineFactory for MapboxFactory {
    type Engine = MapboxEngine;

    fn create(
        &mut self,
        mount: &MountPoint,
        options: &MapOptions,
    ) -> Result<MapboxEngine, EngineError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| EngineError::Init("no document".to_string()))?;
        if document.get_element_by_id(mount.as_str()).is_none() {
            return Err(EngineError::MountPointMissing(mount.0.clone()));
        }

        let mapboxgl = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("mapboxgl"))
            .map_err(|e| EngineError::Init(js_err(e)))?;
        if mapboxgl.is_undefined() {
            return Err(EngineError::Init("mapboxgl is not loaded".to_string()));
        }
        js_sys::Reflect::set(
            &mapboxgl,
            &JsValue::from_str("accessToken"),
            &JsValue::from_str(&options.access_token),
        )
        .map_err(|e| EngineError::Init(js_err(e)))?;

        let mut json = options.to_json();
        json["container"] = serde_json::Value::String(mount.0.clone());
        let js_options = to_js(&json).map_err(|e| EngineError::Init(js_err(e)))?;
        let map = Map::new(&js_options).map_err(|e| EngineError::Init(js_err(e)))?;

        let mut engine = MapboxEngine {
            map,
            markers: Vec::new(),
            popup: None,
            listeners: Vec::new(),
        };
        engine.listen("style.load", |_| MapEvent::StyleLoaded);
        engine.listen("moveend", |_| MapEvent::MoveEnd);
        engine.listen("click", |ev| {
            let at = js_sys::Reflect::get(&ev, &JsValue::from_str("lngLat"))
                .ok()
                .filter(|v| v.is_object())
                .map(|v| v.unchecked_into::<MapLngLat>())
                .map(|p| LngLat::new(p.lng(), p.lat()));
            MapEvent::Click(at)
        });
        Ok(engine)
    }
}

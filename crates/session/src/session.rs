use foundation::math::LngLat;
use layers::{
    BuildingExtrusion, ControlSpec, MarkerHandle, MarkerSpec, PopupSpec, StyleLayer,
    default_controls,
};
use tracing::{debug, info, warn};

use crate::camera::{FlyTo, effective_zoom};
use crate::config::ViewerConfig;
use crate::engine::{EngineError, EngineFactory, MapEngine, MapOptions, MountPoint};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("map session is not initialized")]
    NotInitialized,
    #[error("invalid viewer config: {0}")]
    Config(String),
}

/// Owner of the single map-engine instance.
///
/// Consumers receive `&mut MapSession` explicitly; nothing else holds the
/// engine. The engine is torn down on re-initialization, on
/// [`MapSession::shutdown`], and when the session is dropped.
pub struct MapSession<F: EngineFactory> {
    factory: F,
    engine: Option<F::Engine>,
    mount: Option<MountPoint>,
    config: ViewerConfig,
    supplementary: Vec<Box<dyn StyleLayer>>,
    controls: Vec<ControlSpec>,
    style_loads: u32,
}

impl<F: EngineFactory> MapSession<F> {
    pub fn new(factory: F, config: ViewerConfig) -> Self {
        let mut supplementary: Vec<Box<dyn StyleLayer>> = Vec::new();
        if config.building_extrusion {
            supplementary.push(Box::new(BuildingExtrusion::default()));
        }
        let controls = default_controls(&config.credit);
        Self {
            factory,
            engine: None,
            mount: None,
            config,
            supplementary,
            controls,
            style_loads: 0,
        }
    }

    /// Registers a layer to attach on every style load.
    pub fn add_supplementary_layer(&mut self, layer: Box<dyn StyleLayer>) {
        self.supplementary.push(layer);
    }

    /// Creates the engine bound to `mount`, tearing down any previous one.
    ///
    /// On failure the session is left uninitialized.
    pub fn initialize(
        &mut self,
        mount: MountPoint,
        center: LngLat,
        zoom: f64,
    ) -> Result<(), SessionError> {
        if self.shutdown() {
            info!("map session re-initialized; previous engine torn down");
        }

        let zoom = effective_zoom(Some(zoom), self.config.initial_zoom);
        let options = MapOptions::from_config(&self.config, center, zoom);
        let mut engine = self.factory.create(&mount, &options).map_err(|e| {
            warn!(mount = mount.as_str(), error = %e, "map engine failed to start");
            SessionError::from(e)
        })?;

        for control in &self.controls {
            if let Err(e) = engine.add_control(control) {
                warn!(control = control.kind(), error = %e, "control not installed");
            }
        }

        info!(mount = mount.as_str(), %center, zoom, "map session initialized");
        self.engine = Some(engine);
        self.mount = Some(mount);
        self.style_loads = 0;
        self.fly_to(center, Some(zoom));
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.is_some()
    }

    pub fn mount_point(&self) -> Option<&MountPoint> {
        self.mount.as_ref()
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Requests an animated camera move. No-op when uninitialized.
    ///
    /// Returns the command that was issued.
    pub fn fly_to(&mut self, center: LngLat, zoom: Option<f64>) -> Option<FlyTo> {
        let Some(engine) = self.engine.as_mut() else {
            debug!(%center, "fly_to ignored: session not initialized");
            return None;
        };
        let cmd = FlyTo::new(center, effective_zoom(zoom, self.config.fly_zoom));
        debug!(center = %cmd.center, zoom = cmd.zoom, "fly_to");
        engine.fly_to(&cmd);
        Some(cmd)
    }

    /// Attaches supplementary layers missing from the freshly loaded style.
    ///
    /// Safe to call any number of times; returns how many layers were added.
    pub fn on_style_loaded(&mut self) -> Result<usize, SessionError> {
        let Some(engine) = self.engine.as_mut() else {
            return Ok(0);
        };
        self.style_loads += 1;

        let mut added = 0;
        for layer in &self.supplementary {
            let id = layer.id();
            if engine.has_layer(&id) {
                continue;
            }
            engine.add_layer(layer.as_ref())?;
            added += 1;
        }
        info!(loads = self.style_loads, added, "map style loaded");
        Ok(added)
    }

    pub fn style_loads(&self) -> u32 {
        self.style_loads
    }

    pub fn resize(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.resize();
        }
    }

    pub fn center(&self) -> Option<LngLat> {
        self.engine.as_ref().map(MapEngine::center)
    }

    pub fn add_marker(&mut self, marker: &MarkerSpec) -> Result<MarkerHandle, SessionError> {
        let engine = self.engine.as_mut().ok_or(SessionError::NotInitialized)?;
        Ok(engine.add_marker(marker)?)
    }

    /// Opens a popup. No-op when uninitialized.
    pub fn show_popup(&mut self, popup: &PopupSpec) -> Result<(), SessionError> {
        match self.engine.as_mut() {
            Some(engine) => Ok(engine.show_popup(popup)?),
            None => Ok(()),
        }
    }

    pub fn engine(&self) -> Option<&F::Engine> {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> Option<&mut F::Engine> {
        self.engine.as_mut()
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    /// Tears down the engine. Returns `false` if there was none.
    pub fn shutdown(&mut self) -> bool {
        let Some(mut engine) = self.engine.take() else {
            return false;
        };
        engine.teardown();
        self.mount = None;
        info!("map session torn down");
        true
    }
}

impl<F: EngineFactory> Drop for MapSession<F> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::{MapSession, SessionError};
    use crate::camera::FlyTo;
    use crate::config::ViewerConfig;
    use crate::engine::{EngineError, MountPoint};
    use crate::recording::{EngineCall, RecordingFactory};
    use foundation::math::LngLat;
    use layers::{MarkerSpec, PopupSpec};
    use pretty_assertions::assert_eq;

    fn session() -> (MapSession<RecordingFactory>, crate::recording::CallLog) {
        let factory = RecordingFactory::new();
        let log = factory.log();
        (MapSession::new(factory, ViewerConfig::default()), log)
    }

    fn start(s: &mut MapSession<RecordingFactory>) {
        s.initialize(MountPoint::new("map"), LngLat::new(80.0457, 12.8231), 17.0)
            .unwrap();
    }

    #[test]
    fn initialize_installs_controls_then_flies_to_center() {
        let (mut s, log) = session();
        start(&mut s);
        assert!(s.is_initialized());
        assert_eq!(s.mount_point(), Some(&MountPoint::new("map")));
        assert_eq!(
            log.calls(),
            vec![
                EngineCall::Create {
                    mount: "map".to_string(),
                    center: LngLat::new(80.0457, 12.8231),
                    zoom: 17.0,
                },
                EngineCall::AddControl("attribution"),
                EngineCall::AddControl("navigation"),
                EngineCall::AddControl("fullscreen"),
                EngineCall::AddControl("geolocate"),
                EngineCall::AddControl("scale"),
                EngineCall::FlyTo(FlyTo::new(LngLat::new(80.0457, 12.8231), 17.0)),
            ]
        );
    }

    #[test]
    fn fly_to_is_noop_before_initialize() {
        let (mut s, log) = session();
        assert_eq!(s.fly_to(LngLat::new(1.0, 1.0), None), None);
        assert!(log.calls().is_empty());
        assert_eq!(s.center(), None);
    }

    #[test]
    fn fly_to_uses_default_zoom() {
        let (mut s, log) = session();
        start(&mut s);
        log.clear();
        let cmd = s.fly_to(LngLat::new(77.0151, 28.9931), None).unwrap();
        assert_eq!(cmd.zoom, 17.0);
        assert!(cmd.essential);
        assert_eq!(log.fly_tos(), vec![cmd]);
        assert_eq!(s.center(), Some(LngLat::new(77.0151, 28.9931)));

        let cmd = s.fly_to(LngLat::new(0.0, 0.0), Some(12.0)).unwrap();
        assert_eq!(cmd.zoom, 12.0);
    }

    #[test]
    fn reinitialize_tears_down_previous_engine_first() {
        let (mut s, log) = session();
        start(&mut s);
        log.clear();
        s.initialize(MountPoint::new("other"), LngLat::new(0.0, 0.0), 10.0)
            .unwrap();
        let calls = log.calls();
        assert_eq!(calls[0], EngineCall::Teardown);
        assert!(matches!(&calls[1], EngineCall::Create { mount, .. } if mount == "other"));
    }

    #[test]
    fn style_load_attaches_buildings_once_per_style() {
        let (mut s, log) = session();
        assert_eq!(s.on_style_loaded(), Ok(0));
        start(&mut s);

        assert_eq!(s.on_style_loaded(), Ok(1));
        assert_eq!(s.on_style_loaded(), Ok(0));
        assert_eq!(s.style_loads(), 2);

        s.engine_mut().unwrap().reload_style();
        assert_eq!(s.on_style_loaded(), Ok(1));
        assert_eq!(
            log.count(|c| matches!(c, EngineCall::AddLayer(id) if id == "3d-buildings")),
            2
        );
    }

    #[test]
    fn buildings_can_be_disabled() {
        let factory = RecordingFactory::new();
        let cfg = ViewerConfig {
            building_extrusion: false,
            ..ViewerConfig::default()
        };
        let mut s = MapSession::new(factory, cfg);
        start(&mut s);
        assert_eq!(s.on_style_loaded(), Ok(0));
    }

    #[test]
    fn init_failure_leaves_session_uninitialized() {
        let (mut s, log) = session();
        s.factory_mut().fail_next("webgl unavailable");
        let err = s
            .initialize(MountPoint::new("map"), LngLat::new(0.0, 0.0), 17.0)
            .unwrap_err();
        assert_eq!(
            err,
            SessionError::Engine(EngineError::Init("webgl unavailable".to_string()))
        );
        assert!(!s.is_initialized());
        assert!(log.calls().is_empty());
        assert_eq!(s.fly_to(LngLat::new(0.0, 0.0), None), None);
    }

    #[test]
    fn markers_require_engine_popups_do_not() {
        let (mut s, log) = session();
        let marker = MarkerSpec::new(LngLat::new(1.0, 2.0), "A");
        assert_eq!(s.add_marker(&marker), Err(SessionError::NotInitialized));
        let popup = PopupSpec::credit(LngLat::new(1.0, 2.0), "credit");
        assert_eq!(s.show_popup(&popup), Ok(()));

        start(&mut s);
        log.clear();
        assert!(s.add_marker(&marker).is_ok());
        assert_eq!(s.show_popup(&popup), Ok(()));
        assert_eq!(log.calls().len(), 2);
    }

    #[test]
    fn drop_and_shutdown_release_engine_exactly_once() {
        let (mut s, log) = session();
        start(&mut s);
        assert!(s.shutdown());
        assert!(!s.shutdown());
        drop(s);
        assert_eq!(log.count(|c| *c == EngineCall::Teardown), 1);

        let (mut s, log) = session();
        start(&mut s);
        drop(s);
        assert_eq!(log.count(|c| *c == EngineCall::Teardown), 1);
    }
}

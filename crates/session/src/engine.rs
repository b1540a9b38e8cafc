use foundation::math::LngLat;
use layers::{ControlSpec, LayerId, MarkerHandle, MarkerSpec, PopupSpec, StyleLayer};

use crate::camera::FlyTo;
use crate::config::ViewerConfig;

/// DOM id (or other host-specific key) the engine renders into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MountPoint(pub String);

impl MountPoint {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Construction options for one engine instance.
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub style_url: String,
    pub access_token: String,
    pub center: LngLat,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
    pub antialias: bool,
    /// The stock attribution control is replaced by a custom one.
    pub attribution_control: bool,
}

impl MapOptions {
    pub fn from_config(cfg: &ViewerConfig, center: LngLat, zoom: f64) -> Self {
        Self {
            style_url: cfg.style_url.clone(),
            access_token: cfg.access_token.clone(),
            center,
            zoom,
            pitch: cfg.pitch,
            bearing: cfg.bearing,
            antialias: true,
            attribution_control: false,
        }
    }

    /// Constructor options in Mapbox GL form, minus the container.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "style": self.style_url,
            "center": self.center.to_array(),
            "zoom": self.zoom,
            "pitch": self.pitch,
            "bearing": self.bearing,
            "antialias": self.antialias,
            "attributionControl": self.attribution_control,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("map engine failed to start: {0}")]
    Init(String),
    #[error("mount point {0:?} not found")]
    MountPointMissing(String),
    #[error("map engine rejected {what}: {reason}")]
    Rejected { what: String, reason: String },
}

/// Operations consumed from the external map engine.
///
/// Implementations must be cheap to call repeatedly; the session never awaits
/// anything they start (style loads, fly animations).
pub trait MapEngine {
    fn add_layer(&mut self, layer: &dyn StyleLayer) -> Result<(), EngineError>;

    /// Whether the current style already contains `id`.
    fn has_layer(&self, id: &LayerId) -> bool;

    fn add_control(&mut self, control: &ControlSpec) -> Result<(), EngineError>;

    fn add_marker(&mut self, marker: &MarkerSpec) -> Result<MarkerHandle, EngineError>;

    fn fly_to(&mut self, command: &FlyTo);

    fn center(&self) -> LngLat;

    fn resize(&mut self);

    fn show_popup(&mut self, popup: &PopupSpec) -> Result<(), EngineError>;

    /// Releases native resources. Called exactly once per instance.
    fn teardown(&mut self);
}

/// Builds engine instances for a session.
pub trait EngineFactory {
    type Engine: MapEngine;

    fn create(
        &mut self,
        mount: &MountPoint,
        options: &MapOptions,
    ) -> Result<Self::Engine, EngineError>;
}

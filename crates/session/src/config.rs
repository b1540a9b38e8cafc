use foundation::math::LngLat;
use layers::symbology::{HexColor, MARKER_COLOR};
use serde::{Deserialize, Serialize};

use crate::camera::DEFAULT_FLY_ZOOM;
use crate::session::SessionError;

/// Host-supplied viewer settings. Every field has a default so pages can
/// pass a partial JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerConfig {
    pub style_url: String,
    pub access_token: String,
    /// DOM id of the element the map mounts into.
    pub container_id: String,
    pub initial_center: LngLat,
    pub initial_zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
    pub fly_zoom: f64,
    /// Grace period between input blur and closing the candidate list.
    pub blur_close_delay_ms: f64,
    /// Delay between style load and the follow-up canvas resize.
    pub resize_delay_ms: f64,
    pub credit: String,
    pub marker_color: HexColor,
    pub building_extrusion: bool,
    pub placeholder_image_url: String,
    /// Fetch the campus list from here instead of the bundled copy.
    pub dataset_url: Option<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            style_url: "mapbox://styles/mapbox/streets-v12".to_string(),
            access_token: String::new(),
            container_id: "map".to_string(),
            initial_center: LngLat::new(80.0457, 12.8231),
            initial_zoom: 17.0,
            pitch: 60.0,
            bearing: -20.0,
            fly_zoom: DEFAULT_FLY_ZOOM,
            blur_close_delay_ms: 100.0,
            resize_delay_ms: 100.0,
            credit: "Campus Map Viewer | © 2025".to_string(),
            marker_color: MARKER_COLOR,
            building_extrusion: true,
            placeholder_image_url: "assets/campus-placeholder.svg".to_string(),
            dataset_url: None,
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, SessionError> {
        let cfg: ViewerConfig =
            serde_json::from_str(raw).map_err(|e| SessionError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        if !self.initial_center.is_valid() {
            return Err(SessionError::Config(format!(
                "initialCenter out of range: {}",
                self.initial_center
            )));
        }
        for (name, zoom) in [("initialZoom", self.initial_zoom), ("flyZoom", self.fly_zoom)] {
            if !(zoom.is_finite() && zoom > 0.0) {
                return Err(SessionError::Config(format!("{name} must be positive, got {zoom}")));
            }
        }
        if !(0.0..=85.0).contains(&self.pitch) {
            return Err(SessionError::Config(format!(
                "pitch must be within [0, 85], got {}",
                self.pitch
            )));
        }
        for (name, ms) in [
            ("blurCloseDelayMs", self.blur_close_delay_ms),
            ("resizeDelayMs", self.resize_delay_ms),
        ] {
            if !(ms.is_finite() && ms >= 0.0) {
                return Err(SessionError::Config(format!("{name} must be >= 0, got {ms}")));
            }
        }
        if self.container_id.trim().is_empty() {
            return Err(SessionError::Config("containerId must not be empty".to_string()));
        }
        Ok(())
    }
}

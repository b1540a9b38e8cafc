use foundation::math::LngLat;

use crate::symbology::{HexColor, MARKER_COLOR};

/// Opaque engine-side marker handle. Hosts hand these out from
/// `add_marker` and report them back on click.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerHandle(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub position: LngLat,
    pub color: HexColor,
    /// Accessible title / hover text.
    pub title: String,
    pub draggable: bool,
}

impl MarkerSpec {
    pub fn new(position: LngLat, title: impl Into<String>) -> Self {
        Self {
            position,
            color: MARKER_COLOR,
            title: title.into(),
            draggable: false,
        }
    }

    pub fn with_color(mut self, color: HexColor) -> Self {
        self.color = color;
        self
    }

    pub fn options_json(&self) -> serde_json::Value {
        serde_json::json!({
            "color": self.color.to_string(),
            "draggable": self.draggable,
        })
    }
}

use serde_json::json;

use crate::layer::{LayerId, StyleLayer};
use crate::symbology::{BUILDING_COLOR, HexColor};

/// 3D building footprints extruded from the basemap's vector tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingExtrusion {
    pub id: String,
    pub source: String,
    pub source_layer: String,
    /// Buildings are hidden below this zoom.
    pub min_zoom: f64,
    pub color: HexColor,
    /// Feature property holding the roof height (meters).
    pub height_property: String,
    /// Feature property holding the base height (meters).
    pub base_property: String,
    pub opacity: f64,
}

impl Default for BuildingExtrusion {
    fn default() -> Self {
        Self {
            id: "3d-buildings".to_string(),
            source: "composite".to_string(),
            source_layer: "building".to_string(),
            min_zoom: 15.0,
            color: BUILDING_COLOR,
            height_property: "height".to_string(),
            base_property: "min_height".to_string(),
            opacity: 0.8,
        }
    }
}

impl StyleLayer for BuildingExtrusion {
    fn id(&self) -> LayerId {
        LayerId(self.id.clone())
    }

    fn to_style_json(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "source": self.source,
            "source-layer": self.source_layer,
            "type": "fill-extrusion",
            "minzoom": self.min_zoom,
            "paint": {
                "fill-extrusion-color": self.color.to_string(),
                "fill-extrusion-height": ["get", self.height_property],
                "fill-extrusion-base": ["get", self.base_property],
                "fill-extrusion-opacity": self.opacity.clamp(0.0, 1.0),
            }
        })
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlPosition {
    TopLeft,
    #[default]
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ControlPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            ControlPosition::TopLeft => "top-left",
            ControlPosition::TopRight => "top-right",
            ControlPosition::BottomLeft => "bottom-left",
            ControlPosition::BottomRight => "bottom-right",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleUnit {
    #[default]
    Metric,
    Imperial,
    Nautical,
}

/// Built-in engine controls the viewer installs after initialization.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlSpec {
    Attribution {
        custom: String,
        position: ControlPosition,
    },
    Navigation {
        position: ControlPosition,
    },
    Fullscreen {
        position: ControlPosition,
    },
    Geolocate {
        high_accuracy: bool,
        track_user: bool,
        show_heading: bool,
        position: ControlPosition,
    },
    Scale {
        max_width_px: u32,
        unit: ScaleUnit,
        position: ControlPosition,
    },
}

impl ControlSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            ControlSpec::Attribution { .. } => "attribution",
            ControlSpec::Navigation { .. } => "navigation",
            ControlSpec::Fullscreen { .. } => "fullscreen",
            ControlSpec::Geolocate { .. } => "geolocate",
            ControlSpec::Scale { .. } => "scale",
        }
    }

    pub fn position(&self) -> ControlPosition {
        match self {
            ControlSpec::Attribution { position, .. }
            | ControlSpec::Navigation { position }
            | ControlSpec::Fullscreen { position }
            | ControlSpec::Geolocate { position, .. }
            | ControlSpec::Scale { position, .. } => *position,
        }
    }

    /// Constructor options in Mapbox GL form (`null` when the control takes none).
    pub fn options_json(&self) -> serde_json::Value {
        use serde_json::json;
        match self {
            ControlSpec::Attribution { custom, .. } => json!({ "customAttribution": custom }),
            ControlSpec::Navigation { .. } | ControlSpec::Fullscreen { .. } => {
                serde_json::Value::Null
            }
            ControlSpec::Geolocate {
                high_accuracy,
                track_user,
                show_heading,
                ..
            } => json!({
                "positionOptions": { "enableHighAccuracy": high_accuracy },
                "trackUserLocation": track_user,
                "showUserHeading": show_heading,
            }),
            ControlSpec::Scale {
                max_width_px, unit, ..
            } => json!({ "maxWidth": max_width_px, "unit": unit }),
        }
    }
}

/// The stock control set: credit line, zoom/rotate buttons, fullscreen,
/// geolocation and a metric scale bar.
pub fn default_controls(credit: &str) -> Vec<ControlSpec> {
    vec![
        ControlSpec::Attribution {
            custom: credit.to_string(),
            position: ControlPosition::BottomRight,
        },
        ControlSpec::Navigation {
            position: ControlPosition::BottomRight,
        },
        ControlSpec::Fullscreen {
            position: ControlPosition::BottomLeft,
        },
        ControlSpec::Geolocate {
            high_accuracy: true,
            track_user: true,
            show_heading: true,
            position: ControlPosition::BottomLeft,
        },
        ControlSpec::Scale {
            max_width_px: 80,
            unit: ScaleUnit::Metric,
            // Engine default corner.
            position: ControlPosition::TopRight,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::{ControlPosition, ControlSpec, default_controls};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn default_set_layout() {
        let controls = default_controls("credit");
        let summary: Vec<(&str, &str)> = controls
            .iter()
            .map(|c| (c.kind(), c.position().as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("attribution", "bottom-right"),
                ("navigation", "bottom-right"),
                ("fullscreen", "bottom-left"),
                ("geolocate", "bottom-left"),
                ("scale", "top-right"),
            ]
        );
    }

    #[test]
    fn options_are_engine_shaped() {
        let controls = default_controls("Map design | 2025");
        assert_eq!(
            controls[0].options_json(),
            json!({ "customAttribution": "Map design | 2025" })
        );
        assert_eq!(controls[1].options_json(), serde_json::Value::Null);
        assert_eq!(
            controls[3].options_json(),
            json!({
                "positionOptions": { "enableHighAccuracy": true },
                "trackUserLocation": true,
                "showUserHeading": true,
            })
        );
        assert_eq!(
            controls[4].options_json(),
            json!({ "maxWidth": 80, "unit": "metric" })
        );
    }

    #[test]
    fn position_serde_is_kebab_case() {
        let json = serde_json::to_string(&ControlPosition::BottomLeft).unwrap();
        assert_eq!(json, r#""bottom-left""#);
    }
}

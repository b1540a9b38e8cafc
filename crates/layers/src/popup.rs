use foundation::math::{LngLat, Vec2};
use serde_json::json;

/// Where the popup tip attaches relative to its coordinate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PopupAnchor {
    Top,
    TopLeft,
    TopRight,
    Bottom,
    BottomLeft,
    BottomRight,
    Left,
    Right,
}

impl PopupAnchor {
    pub const ALL: [PopupAnchor; 8] = [
        PopupAnchor::Top,
        PopupAnchor::TopLeft,
        PopupAnchor::TopRight,
        PopupAnchor::Bottom,
        PopupAnchor::BottomLeft,
        PopupAnchor::BottomRight,
        PopupAnchor::Left,
        PopupAnchor::Right,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PopupAnchor::Top => "top",
            PopupAnchor::TopLeft => "top-left",
            PopupAnchor::TopRight => "top-right",
            PopupAnchor::Bottom => "bottom",
            PopupAnchor::BottomLeft => "bottom-left",
            PopupAnchor::BottomRight => "bottom-right",
            PopupAnchor::Left => "left",
            PopupAnchor::Right => "right",
        }
    }
}

/// Pixel offsets per anchor so the popup clears a pin-shaped marker.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PopupOffsets {
    offsets: [Vec2; 8],
}

impl PopupOffsets {
    /// Offsets for a marker `height_px` tall whose round head has
    /// `radius_px`; diagonal anchors are pushed out by `linear_px`.
    pub fn for_marker(height_px: f64, radius_px: f64, linear_px: f64) -> Self {
        let above_head = height_px - radius_px;
        let offset = |anchor: PopupAnchor| match anchor {
            PopupAnchor::Top | PopupAnchor::TopLeft | PopupAnchor::TopRight => Vec2::new(0.0, 0.0),
            PopupAnchor::Bottom => Vec2::new(0.0, -height_px),
            PopupAnchor::BottomLeft => Vec2::new(linear_px, -(above_head + linear_px)),
            PopupAnchor::BottomRight => Vec2::new(-linear_px, -(above_head + linear_px)),
            PopupAnchor::Left => Vec2::new(radius_px, -above_head),
            PopupAnchor::Right => Vec2::new(-radius_px, -above_head),
        };
        Self {
            offsets: PopupAnchor::ALL.map(offset),
        }
    }

    pub fn get(&self, anchor: PopupAnchor) -> Vec2 {
        // `ALL` lists anchors in declaration order.
        self.offsets[anchor as usize]
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (anchor, v) in PopupAnchor::ALL.iter().zip(self.offsets.iter()) {
            map.insert(anchor.as_str().to_string(), json!(v.to_array()));
        }
        serde_json::Value::Object(map)
    }
}

impl Default for PopupOffsets {
    fn default() -> Self {
        Self::for_marker(50.0, 10.0, 25.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopupSpec {
    pub position: LngLat,
    pub heading: String,
    pub class_name: String,
    pub max_width: String,
    pub offsets: PopupOffsets,
}

impl PopupSpec {
    pub fn credit(position: LngLat, heading: impl Into<String>) -> Self {
        Self {
            position,
            heading: heading.into(),
            class_name: "glassmorphism-popup".to_string(),
            max_width: "300px".to_string(),
            offsets: PopupOffsets::default(),
        }
    }

    /// Popup body; the heading is escaped.
    pub fn html(&self) -> String {
        format!("<h4>{}</h4>", html_escape::encode_text(&self.heading))
    }

    pub fn options_json(&self) -> serde_json::Value {
        json!({
            "offset": self.offsets.to_json(),
            "className": self.class_name,
        })
    }
}

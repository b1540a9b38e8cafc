use foundation::math::LngLat;

/// Zoom used by fly-to when the caller does not pass one.
pub const DEFAULT_FLY_ZOOM: f64 = 17.0;

/// Animated camera transition request. Fire-and-forget: nothing observes
/// completion.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FlyTo {
    pub center: LngLat,
    pub zoom: f64,
    /// Essential animations run even when the user prefers reduced motion.
    pub essential: bool,
}

impl FlyTo {
    pub fn new(center: LngLat, zoom: f64) -> Self {
        Self {
            center,
            zoom,
            essential: true,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "center": self.center.to_array(),
            "zoom": self.zoom,
            "essential": self.essential,
        })
    }
}

/// Resolves an optional caller zoom against the session default.
///
/// Non-finite or non-positive zooms fall back to `default_zoom`.
pub fn effective_zoom(requested: Option<f64>, default_zoom: f64) -> f64 {
    match requested {
        Some(z) if z.is_finite() && z > 0.0 => z,
        _ => default_zoom,
    }
}

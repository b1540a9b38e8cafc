use serde::{Deserialize, Serialize};

/// A geographic position in degrees, longitude first (map-engine order).
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Finite and inside `[-180, 180] x [-90, 90]`.
    pub fn is_valid(&self) -> bool {
        self.lng.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lng)
            && (-90.0..=90.0).contains(&self.lat)
    }

    /// Squared distance treating `(lng, lat)` as planar coordinates.
    ///
    /// No geodesic correction is applied; ordering by this value is only
    /// meaningful at city/campus scales.
    pub fn planar_distance_sq(self, other: Self) -> f64 {
        let d = self.to_vec2() - other.to_vec2();
        d.length_sq()
    }

    pub fn planar_distance(self, other: Self) -> f64 {
        self.planar_distance_sq(other).sqrt()
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    fn to_vec2(self) -> super::Vec2 {
        super::Vec2::new(self.lng, self.lat)
    }
}

impl From<[f64; 2]> for LngLat {
    fn from(v: [f64; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl std::fmt::Display for LngLat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lng, self.lat)
    }
}

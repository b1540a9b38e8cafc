use crate::math::LngLat;

/// Axis-aligned geographic bounds in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LngLatBounds {
    pub min: LngLat,
    pub max: LngLat,
}

impl LngLatBounds {
    pub fn new(min: LngLat, max: LngLat) -> Self {
        LngLatBounds { min, max }
    }

    /// Smallest bounds containing every point, or `None` when empty.
    pub fn from_points(points: impl IntoIterator<Item = LngLat>) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let mut b = LngLatBounds::new(first, first);
        for p in it {
            b.extend(p);
        }
        Some(b)
    }

    pub fn extend(&mut self, p: LngLat) {
        self.min.lng = self.min.lng.min(p.lng);
        self.min.lat = self.min.lat.min(p.lat);
        self.max.lng = self.max.lng.max(p.lng);
        self.max.lat = self.max.lat.max(p.lat);
    }

    pub fn center(&self) -> LngLat {
        LngLat::new(
            (self.min.lng + self.max.lng) * 0.5,
            (self.min.lat + self.max.lat) * 0.5,
        )
    }
}

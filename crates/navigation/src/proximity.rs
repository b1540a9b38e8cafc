use catalog::{CampusId, Catalog};
use foundation::math::LngLat;
use foundation::math::precision::stable_total_cmp_f64;

/// Campus closest to `center`, treating `(lng, lat)` as planar coordinates.
///
/// Ordering contract:
/// - The smallest planar distance wins.
/// - Ties go to the record that comes first in dataset order.
///
/// Returns `None` only for an empty catalog.
pub fn nearest_campus(catalog: &Catalog, center: LngLat) -> Option<CampusId> {
    let mut best: Option<(f64, CampusId)> = None;
    for (id, rec) in catalog.iter() {
        let d = rec.position().planar_distance_sq(center);
        best = match best {
            Some((bd, _)) if !stable_total_cmp_f64(d, bd).is_lt() => best,
            _ => Some((d, id)),
        };
    }
    best.map(|(_, id)| id)
}

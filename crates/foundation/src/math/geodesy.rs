use super::LngLat;

/// WGS84 semi-major axis (meters).
pub const WGS84_A: f64 = 6_378_137.0;

/// Great-circle distance in meters on a sphere of radius `WGS84_A`.
///
/// Only used for human-facing readouts; selection logic stays planar.
pub fn great_circle_distance_m(a: LngLat, b: LngLat) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = lat2 - lat1;
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng * 0.5).sin().powi(2);
    2.0 * WGS84_A * h.sqrt().clamp(0.0, 1.0).asin()
}

//! Great-circle distance and pairwise threshold checks.

use crate::LatLon;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two coordinates given in degrees.
///
/// Standard haversine formula on a sphere of radius [`EARTH_RADIUS_M`].
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let sin_dphi = (delta_phi / 2.0).sin();
    let sin_dlambda = (delta_lambda / 2.0).sin();
    let a = sin_dphi * sin_dphi + phi1.cos() * phi2.cos() * sin_dlambda * sin_dlambda;
    // Rounding can push `a` a hair past 1 for near-antipodal pairs.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Haversine distance between any two coordinate-like values.
#[inline]
pub fn distance_between<A: LatLon, B: LatLon>(a: &A, b: &B) -> f64 {
    haversine_distance(a.lat(), a.lon(), b.lat(), b.lon())
}

/// Check that every pair of `points` is within `threshold` meters.
///
/// Pairs are visited in ascending index order: (0,1), (0,2), .., (1,2), ...
/// The scan stops at the first pair farther apart than `threshold`.
///
/// Returns `(all_within, observed_max)`. When `all_within` is true, `observed_max`
/// is the exact maximum pairwise distance. When it is false, `observed_max` is the
/// distance of the first violating pair, which is only a lower bound on the true
/// maximum. Fewer than two points trivially pass with a maximum of 0.
pub fn pairwise_within_threshold<P: LatLon>(points: &[P], threshold: f64) -> (bool, f64) {
    let mut max_distance = 0.0f64;

    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            let d = distance_between(a, b);
            if d > threshold {
                return (false, d);
            }
            max_distance = max_distance.max(d);
        }
    }

    (true, max_distance)
}

/// True maximum pairwise distance over `points` (no early exit).
///
/// Returns 0 for fewer than two points.
pub fn max_pairwise_distance<P: LatLon>(points: &[P]) -> f64 {
    let mut max_distance = 0.0f64;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            max_distance = max_distance.max(distance_between(a, b));
        }
    }
    max_distance
}

//! # Geographic Utilities
//!
//! Small geographic helpers used by the normalizer and the activity summary.
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`haversine_distance`] | Great-circle distance between two GPS points |
//! | [`polyline_length`] | Total length of a decoded path in meters |
//! | [`compute_bounds`] | Bounding box of a GPS track |
//!
//! All functions expect WGS84 coordinates in degrees. Elevation is ignored.

use geo::{Distance, Haversine, Point};

use crate::{Bounds, GeoPoint};

/// Great-circle distance between two GPS points in meters.
///
/// # Example
///
/// ```rust
/// use activity_geometry::{GeoPoint, geo_utils};
///
/// let london = GeoPoint::new(51.5074, -0.1278);
/// let paris = GeoPoint::new(48.8566, 2.3522);
///
/// let distance = geo_utils::haversine_distance(&london, &paris);
/// assert!((distance - 343_560.0).abs() < 1000.0);
/// ```
#[inline]
pub fn haversine_distance(p1: &GeoPoint, p2: &GeoPoint) -> f64 {
    let point1 = Point::new(p1.longitude, p1.latitude);
    let point2 = Point::new(p2.longitude, p2.latitude);
    Haversine::distance(point1, point2)
}

/// Total length of a path in meters. Empty or single-point paths return 0.0.
pub fn polyline_length(points: &[GeoPoint]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    points
        .windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}

/// Bounding box of a GPS track.
///
/// For empty input the bounds are inverted (MAX/MIN sentinels); use
/// [`Bounds::from_points`] when the input may be empty.
pub fn compute_bounds(points: &[GeoPoint]) -> Bounds {
    let mut min_lat = f64::MAX;
    let mut max_lat = f64::MIN;
    let mut min_lng = f64::MAX;
    let mut max_lng = f64::MIN;

    for p in points {
        min_lat = min_lat.min(p.latitude);
        max_lat = max_lat.max(p.latitude);
        min_lng = min_lng.min(p.longitude);
        max_lng = max_lng.max(p.longitude);
    }

    Bounds {
        min_lat,
        max_lat,
        min_lng,
        max_lng,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn test_haversine_distance_same_point() {
        let p = GeoPoint::new(38.5, -120.2);
        assert_eq!(haversine_distance(&p, &p), 0.0);
    }

    #[test]
    fn test_haversine_ignores_elevation() {
        let low = GeoPoint::new(38.5, -120.2);
        let high = low.with_elevation(3000.0);
        assert_eq!(haversine_distance(&low, &high), 0.0);
    }

    #[test]
    fn test_polyline_length_short_inputs() {
        assert_eq!(polyline_length(&[]), 0.0);
        assert_eq!(polyline_length(&[GeoPoint::new(38.5, -120.2)]), 0.0);
    }

    #[test]
    fn test_polyline_length_one_degree_latitude() {
        let track = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 0.0)];
        // One degree of latitude is ~111.2 km on the mean-radius sphere
        assert!(approx_eq(polyline_length(&track), 111_195.0, 100.0));
    }

    #[test]
    fn test_compute_bounds() {
        let track = vec![
            GeoPoint::new(38.5, -120.2),
            GeoPoint::new(40.7, -120.95),
            GeoPoint::new(43.252, -126.453),
        ];
        let bounds = compute_bounds(&track);
        assert_eq!(bounds.min_lat, 38.5);
        assert_eq!(bounds.max_lat, 43.252);
        assert_eq!(bounds.min_lng, -126.453);
        assert_eq!(bounds.max_lng, -120.2);
    }
}

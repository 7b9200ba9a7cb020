//! Geographic utilities: great-circle distance, track statistics and
//! small point helpers used by the editor.

use geo::{Distance, Haversine, Point};
use serde::{Deserialize, Serialize};

use crate::{Bounds, TrackPoint};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Sphere radius behind `geo::Haversine`, meters.
const GEO_HAVERSINE_RADIUS_M: f64 = 6_371_008.8;

/// Great-circle distance between two points in kilometres (Haversine).
///
/// Uses geo's haversine for the central angle, scaled to a 6371 km sphere.
/// Symmetric, and zero for identical points.
///
/// # Example
/// ```
/// use track_editor::{haversine_distance, TrackPoint};
/// let lausanne = TrackPoint::new(46.5197, 6.6323);
/// let geneva = TrackPoint::new(46.2044, 6.1432);
/// let km = haversine_distance(&lausanne, &geneva);
/// assert!(km > 50.0 && km < 52.0);
/// ```
#[inline]
pub fn haversine_distance(a: &TrackPoint, b: &TrackPoint) -> f64 {
    let point1 = Point::new(a.lng, a.lat);
    let point2 = Point::new(b.lng, b.lat);
    Haversine::distance(point1, point2) / GEO_HAVERSINE_RADIUS_M * EARTH_RADIUS_KM
}

/// Total length of a polyline in kilometres.
pub fn polyline_length(points: &[TrackPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}

/// Derived statistics of a track.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteStats {
    /// Sum of consecutive great-circle distances, kilometres
    pub distance_km: f64,
    /// Sum of positive elevation differences, meters
    pub elevation_gain_m: f64,
    /// Sum of negative elevation differences as a positive number, meters
    pub elevation_loss_m: f64,
    pub point_count: usize,
}

/// Compute distance and elevation totals for a track.
///
/// Missing elevation counts as 0 m for that point. Descents never subtract
/// from the gain. Tracks shorter than 2 points have zero totals.
pub fn route_stats(points: &[TrackPoint]) -> RouteStats {
    if points.len() < 2 {
        return RouteStats {
            point_count: points.len(),
            ..RouteStats::default()
        };
    }

    let mut gain = 0.0;
    let mut loss = 0.0;
    for w in points.windows(2) {
        let delta = w[1].elevation.unwrap_or(0.0) - w[0].elevation.unwrap_or(0.0);
        if delta > 0.0 {
            gain += delta;
        } else {
            loss -= delta;
        }
    }

    RouteStats {
        distance_km: polyline_length(points),
        elevation_gain_m: gain,
        elevation_loss_m: loss,
        point_count: points.len(),
    }
}

/// Arithmetic midpoint of two points.
///
/// Elevation is averaged when both ends carry one, otherwise taken from
/// whichever end has it.
pub fn midpoint(a: &TrackPoint, b: &TrackPoint) -> TrackPoint {
    let elevation = match (a.elevation, b.elevation) {
        (Some(ea), Some(eb)) => Some((ea + eb) / 2.0),
        (ea, eb) => ea.or(eb),
    };
    TrackPoint {
        lat: (a.lat + b.lat) / 2.0,
        lng: (a.lng + b.lng) / 2.0,
        elevation,
    }
}

/// Compute the bounds of a track, or a zero box at the origin when empty.
pub fn compute_bounds(points: &[TrackPoint]) -> Bounds {
    Bounds::from_points(points).unwrap_or(Bounds {
        min_lat: 0.0,
        max_lat: 0.0,
        min_lng: 0.0,
        max_lng: 0.0,
    })
}

/// Center of a track's bounding box.
pub fn compute_center(points: &[TrackPoint]) -> TrackPoint {
    compute_bounds(points).center()
}

/// Convert a distance in kilometres to approximate degrees of latitude.
pub fn km_to_degrees(km: f64) -> f64 {
    (km / EARTH_RADIUS_KM).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn test_haversine_identity_and_symmetry() {
        let a = TrackPoint::new(46.5197, 6.6323);
        let b = TrackPoint::new(45.8326, 6.8652);
        assert_eq!(haversine_distance(&a, &a), 0.0);
        assert_eq!(haversine_distance(&a, &b), haversine_distance(&b, &a));
    }

    #[test]
    fn test_haversine_one_degree_latitude() {
        let a = TrackPoint::new(0.0, 0.0);
        let b = TrackPoint::new(1.0, 0.0);
        // 2 * pi * 6371 / 360
        assert!(approx_eq(haversine_distance(&a, &b), 111.195, 0.001));
    }

    #[test]
    fn test_haversine_uses_6371_km_sphere() {
        // Quarter meridian on a 6371 km sphere, not geo's 6371.0088 km mean radius
        let equator = TrackPoint::new(0.0, 0.0);
        let pole = TrackPoint::new(90.0, 0.0);
        let expected = std::f64::consts::FRAC_PI_2 * 6371.0;
        assert!(approx_eq(haversine_distance(&equator, &pole), expected, 1e-6));
    }

    #[test]
    fn test_haversine_antipodal_is_finite() {
        let a = TrackPoint::new(0.0, 0.0);
        let b = TrackPoint::new(0.0, 180.0);
        let d = haversine_distance(&a, &b);
        assert!(approx_eq(d, std::f64::consts::PI * EARTH_RADIUS_KM, 1e-6));
    }

    #[test]
    fn test_route_stats_gain_ignores_descents() {
        let points = vec![
            TrackPoint::with_elevation(46.0, 7.0, 500.0),
            TrackPoint::with_elevation(46.001, 7.0, 600.0),
            TrackPoint::with_elevation(46.002, 7.0, 550.0),
            TrackPoint::with_elevation(46.003, 7.0, 700.0),
        ];
        let stats = route_stats(&points);
        assert!(approx_eq(stats.elevation_gain_m, 250.0, 1e-9));
        assert!(approx_eq(stats.elevation_loss_m, 50.0, 1e-9));
        assert!(approx_eq(stats.distance_km, 0.3336, 0.001));
        assert_eq!(stats.point_count, 4);
    }

    #[test]
    fn test_route_stats_missing_elevation_is_zero() {
        let points = vec![
            TrackPoint::new(46.0, 7.0),
            TrackPoint::with_elevation(46.001, 7.0, 120.0),
        ];
        assert!(approx_eq(route_stats(&points).elevation_gain_m, 120.0, 1e-9));
    }

    #[test]
    fn test_route_stats_degenerate() {
        assert_eq!(route_stats(&[]), RouteStats::default());
        let single = route_stats(&[TrackPoint::with_elevation(46.0, 7.0, 900.0)]);
        assert_eq!(single.distance_km, 0.0);
        assert_eq!(single.elevation_gain_m, 0.0);
        assert_eq!(single.point_count, 1);
    }

    #[test]
    fn test_midpoint() {
        let m = midpoint(
            &TrackPoint::with_elevation(46.0, 7.0, 100.0),
            &TrackPoint::with_elevation(46.2, 7.4, 300.0),
        );
        assert!(approx_eq(m.lat, 46.1, 1e-12));
        assert!(approx_eq(m.lng, 7.2, 1e-12));
        assert_eq!(m.elevation, Some(200.0));

        let m = midpoint(&TrackPoint::new(0.0, 0.0), &TrackPoint::with_elevation(0.0, 1.0, 50.0));
        assert_eq!(m.elevation, Some(50.0));
    }

    #[test]
    fn test_km_to_degrees() {
        assert!(approx_eq(km_to_degrees(111.195), 1.0, 1e-4));
    }
}

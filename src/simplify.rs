//! Douglas-Peucker reduction of a track.
//!
//! Points are projected onto a local equirectangular plane in kilometres,
//! anchored at the first point, so the tolerance shares its unit with
//! [`crate::haversine_distance`]. Elevation plays no part in the decision.

use geo::{Coord, LineString, SimplifyIdx};

use crate::geo_utils::EARTH_RADIUS_KM;
use crate::TrackPoint;

/// Project points onto a plane in kilometres around `origin`.
fn local_plane(points: &[TrackPoint], origin: &TrackPoint) -> LineString<f64> {
    let cos_lat = origin.lat.to_radians().cos();
    points
        .iter()
        .map(|p| Coord {
            x: (p.lng - origin.lng).to_radians() * cos_lat * EARTH_RADIUS_KM,
            y: (p.lat - origin.lat).to_radians() * EARTH_RADIUS_KM,
        })
        .collect()
}

/// Indices of the points kept by Douglas-Peucker at `tolerance_km`.
///
/// Always contains the first and last index of a non-empty track.
pub fn simplify_indices(track: &[TrackPoint], tolerance_km: f64) -> Vec<usize> {
    if track.len() < 3 {
        return (0..track.len()).collect();
    }

    let line = local_plane(track, &track[0]);
    line.simplify_idx(&tolerance_km)
}

/// Simplify a track with the Douglas-Peucker algorithm.
///
/// Keeps the endpoints, never grows the track and is idempotent at a fixed
/// tolerance. Kept points are returned unchanged, elevation included.
///
/// # Example
/// ```rust
/// use track_editor::{simplify, TrackPoint};
///
/// let track = vec![
///     TrackPoint::new(46.0, 7.0),
///     TrackPoint::new(46.0, 7.005),
///     TrackPoint::new(46.0, 7.01),
/// ];
/// // The middle point is collinear
/// assert_eq!(simplify(&track, 0.001).len(), 2);
/// ```
pub fn simplify(track: &[TrackPoint], tolerance_km: f64) -> Vec<TrackPoint> {
    simplify_indices(track, tolerance_km)
        .into_iter()
        .map(|i| track[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Offset in degrees of latitude for a distance in meters.
    fn meters_lat(m: f64) -> f64 {
        (m / 1000.0 / EARTH_RADIUS_KM).to_degrees()
    }

    fn zigzag(count: usize, amplitude_m: f64) -> Vec<TrackPoint> {
        (0..count)
            .map(|i| {
                let offset = if i % 2 == 0 { 0.0 } else { meters_lat(amplitude_m) };
                TrackPoint::new(46.0 + offset, 7.0 + i as f64 * 0.001)
            })
            .collect()
    }

    #[test]
    fn test_small_deviation_collapses() {
        let track = vec![
            TrackPoint::new(46.0, 7.0),
            TrackPoint::new(46.0 + meters_lat(0.5), 7.005),
            TrackPoint::new(46.0, 7.01),
        ];
        let simplified = simplify(&track, 0.010);
        assert_eq!(simplified, vec![track[0], track[2]]);
    }

    #[test]
    fn test_large_deviation_kept() {
        let track = vec![
            TrackPoint::new(46.0, 7.0),
            TrackPoint::new(46.0 + meters_lat(50.0), 7.005),
            TrackPoint::new(46.0, 7.01),
        ];
        assert_eq!(simplify(&track, 0.010).len(), 3);
    }

    #[test]
    fn test_endpoints_and_length() {
        let track = zigzag(40, 5.0);
        let simplified = simplify(&track, 0.010);
        assert_eq!(simplified.len(), 2);
        assert_eq!(simplified[0], track[0]);
        assert_eq!(simplified[1], track[39]);

        let kept = simplify(&track, 0.001);
        assert_eq!(kept.len(), track.len());
    }

    #[test]
    fn test_idempotent() {
        let track: Vec<TrackPoint> = (0..200)
            .map(|i| {
                let t = i as f64 * 0.05;
                TrackPoint::new(46.0 + t.sin() * 0.002, 7.0 + i as f64 * 0.0005)
            })
            .collect();
        let once = simplify(&track, 0.015);
        let twice = simplify(&once, 0.015);
        assert_eq!(once, twice);
        assert!(once.len() < track.len());
    }

    #[test]
    fn test_short_tracks_untouched() {
        assert!(simplify(&[], 1.0).is_empty());
        let two = vec![TrackPoint::new(46.0, 7.0), TrackPoint::new(46.1, 7.1)];
        assert_eq!(simplify(&two, 100.0), two);
    }

    #[test]
    fn test_elevation_carried_through() {
        let track = vec![
            TrackPoint::with_elevation(46.0, 7.0, 400.0),
            TrackPoint::with_elevation(46.0, 7.005, 900.0),
            TrackPoint::with_elevation(46.0, 7.01, 410.0),
        ];
        let simplified = simplify(&track, 0.001);
        assert_eq!(simplified[1].elevation, Some(410.0));
    }
}

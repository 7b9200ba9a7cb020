//! Tests for Douglas-Peucker simplification

use track_editor::geo_utils::{km_to_degrees, route_stats};
use track_editor::{simplify, TrackPoint};

/// A wandering hiking trail with switchbacks and GPS jitter.
fn trail(count: usize) -> Vec<TrackPoint> {
    (0..count)
        .map(|i| {
            let t = i as f64;
            let jitter = ((t * 12.9898).sin() * 43758.5453).fract() * 0.00003;
            TrackPoint::with_elevation(
                46.0 + t * 0.00002 + (t * 0.07).sin() * 0.0008 + jitter,
                7.0 + t * 0.00003 + (t * 0.03).cos() * 0.0005,
                800.0 + t * 0.5,
            )
        })
        .collect()
}

#[test]
fn test_tiny_middle_deviation_collapses() {
    // Middle point sits 0.5 m off the chord between the endpoints
    let a = TrackPoint::new(46.0, 7.0);
    let c = TrackPoint::new(46.001, 7.001);
    let mut b = TrackPoint::new(46.0005, 7.0005);
    b.lat += km_to_degrees(0.0005);

    let simplified = simplify(&[a, b, c], 0.010);
    assert_eq!(simplified, vec![a, c]);
}

#[test]
fn test_idempotent_at_fixed_tolerance() {
    let track = trail(1500);
    for tolerance in [0.002, 0.01, 0.05] {
        let once = simplify(&track, tolerance);
        let twice = simplify(&once, tolerance);
        assert_eq!(once, twice, "tolerance {}", tolerance);
    }
}

#[test]
fn test_output_is_ordered_subset() {
    let track = trail(800);
    let simplified = simplify(&track, 0.01);

    assert!(simplified.len() <= track.len());
    assert_eq!(simplified.first(), track.first());
    assert_eq!(simplified.last(), track.last());

    // Every kept point appears in the input, in order
    let mut cursor = 0;
    for p in &simplified {
        let found = track[cursor..].iter().position(|q| q == p);
        assert!(found.is_some());
        cursor += found.unwrap() + 1;
    }
}

#[test]
fn test_larger_tolerance_keeps_fewer_points() {
    let track = trail(800);
    let fine = simplify(&track, 0.002);
    let coarse = simplify(&track, 0.05);
    assert!(coarse.len() <= fine.len());
    // Shape is roughly preserved
    let original = route_stats(&track).distance_km;
    let reduced = route_stats(&coarse).distance_km;
    assert!(reduced <= original);
    assert!(reduced > original * 0.5);
}

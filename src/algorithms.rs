//! # Algorithm Toolbox
//!
//! Direct access to the pure track algorithms, for callers that want the
//! geometry without the editing state machine.
//!
//! ## Geographic Utilities
//!
//! - **Haversine Distance**: Great-circle distance between track points (km)
//! - **Route Stats**: Distance and elevation gain/loss
//! - **Bounds / Center / Midpoint**: Small helpers for camera fitting and insertion
//!
//! ## Reduction
//!
//! - **Downsample**: Stride sampling to a display budget
//! - **Douglas-Peucker**: Tolerance-based line simplification
//!
//! ## Hit-testing
//!
//! - **Nearest Segment / Point**: Pixel-tolerance lookups through a [`Projector`]
//!
//! # Example
//!
//! ```rust
//! use track_editor::algorithms::{haversine_distance, route_stats, TrackPoint};
//!
//! let start = TrackPoint::with_elevation(46.5197, 6.6323, 372.0);
//! let end = TrackPoint::with_elevation(46.5300, 6.6400, 520.0);
//! println!("{:.2} km", haversine_distance(&start, &end));
//!
//! let stats = route_stats(&[start, end]);
//! assert_eq!(stats.elevation_gain_m, 148.0);
//! ```

// =============================================================================
// Core Types (re-exported from lib)
// =============================================================================

pub use crate::{Bounds, DisplayPoint, DisplayProjection, RouteStats, TrackPoint, ViewPointPolicy};

// =============================================================================
// Geographic Utilities
// =============================================================================

pub use crate::geo_utils::{
    compute_bounds, compute_center, haversine_distance, km_to_degrees, midpoint,
    polyline_length, route_stats, EARTH_RADIUS_KM,
};

// =============================================================================
// Reduction
// =============================================================================

/// Stride-sample a track to a display budget, keeping both endpoints.
pub use crate::downsample::downsample;

/// Douglas-Peucker simplification with a tolerance in kilometres.
pub use crate::simplify::{simplify, simplify_indices};

/// Downsample a track using the budget a policy assigns to its length.
///
/// # Example
/// ```rust
/// use track_editor::algorithms::{downsample_adaptive, TrackPoint, ViewPointPolicy};
///
/// let track: Vec<TrackPoint> = (0..2000)
///     .map(|i| TrackPoint::new(46.0 + i as f64 * 0.0000225, 7.0))
///     .collect();
/// let projection = downsample_adaptive(&track, &ViewPointPolicy::default());
/// assert!(projection.len() <= 52);
/// ```
pub fn downsample_adaptive(track: &[TrackPoint], policy: &ViewPointPolicy) -> DisplayProjection {
    downsample(track, policy.max_points(track))
}

// =============================================================================
// Hit-testing
// =============================================================================

pub use crate::locator::{
    nearest_point, nearest_segment, point_segment_distance, screen_distance, MercatorProjector,
    Projector, ScreenPoint,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downsample_adaptive_uses_policy() {
        // ~0.5 km track, below the floor
        let short: Vec<TrackPoint> = (0..100)
            .map(|i| TrackPoint::new(46.0 + i as f64 * 0.00005, 7.0))
            .collect();
        // floor 30 -> step ceil(99 / 29) = 4 -> 25 strided points plus the last
        assert_eq!(downsample_adaptive(&short, &ViewPointPolicy::default()).len(), 26);

        let policy = ViewPointPolicy {
            floor: 200,
            ..ViewPointPolicy::default()
        };
        assert_eq!(downsample_adaptive(&short, &policy).len(), 100);
    }
}

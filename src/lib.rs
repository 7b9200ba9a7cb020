//! # Track Editor
//!
//! Geometry and interaction engine for editing GPS tracks on a map.
//!
//! This library provides:
//! - Great-circle distance and elevation statistics
//! - Adaptive downsampling of long tracks for rendering and hit-testing
//! - Douglas-Peucker simplification with a one-step simplify/restore toggle
//! - Linear undo/redo over full track snapshots
//! - Pixel-tolerance hit-testing of points and segments
//! - A drag/selection/edit-mode state machine that owns the canonical track
//!
//! Rendering, file parsing and persistence stay outside the crate. Callers hand
//! in a point sequence, drive the [`TrackEditor`] from pointer events and read
//! the canonical track back on save.
//!
//! ## Quick Start
//!
//! ```rust
//! use track_editor::{EditOutcome, TrackEditor, TrackPoint};
//!
//! let points = vec![
//!     TrackPoint::new(46.5200, 6.6300),
//!     TrackPoint::new(46.5210, 6.6320),
//!     TrackPoint::new(46.5230, 6.6330),
//! ];
//!
//! let mut editor = TrackEditor::new(points, true).unwrap();
//! assert_eq!(editor.select_point(1), EditOutcome::Applied);
//! assert_eq!(editor.delete_selected_point(), EditOutcome::Applied);
//! assert_eq!(editor.track().len(), 2);
//!
//! assert_eq!(editor.undo(), EditOutcome::Applied);
//! assert_eq!(editor.track().len(), 3);
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{Result, TrackEditError};

// Geographic utilities (distance, stats, bounds, midpoint)
pub mod geo_utils;
pub use geo_utils::{haversine_distance, route_stats, RouteStats};

// Display budget and stride sampling
pub mod downsample;
pub use downsample::{downsample, DisplayPoint, DisplayProjection, ViewPointPolicy};

// Douglas-Peucker reduction
pub mod simplify;
pub use simplify::simplify;

// Snapshot undo/redo, owned by the editor
mod history;

// Screen-space hit-testing
pub mod locator;
pub use locator::{nearest_point, nearest_segment, MercatorProjector, Projector, ScreenPoint};

// Pointer drag state
pub mod drag;
pub use drag::DragSession;

// Editor state machine
pub mod editor;
pub use editor::{
    DetailLevel, EditOutcome, EditorConfig, EditorState, Rejection, Selection, TrackEditor,
};

// Algorithm toolbox - standalone access to the pure functions
pub mod algorithms;

// ============================================================================
// Core Types
// ============================================================================

/// A geographic track point with optional elevation in meters.
///
/// Points are plain values. Editing never mutates a point in place; it
/// produces a new point or a new sequence.
///
/// # Example
/// ```
/// use track_editor::TrackPoint;
/// let summit = TrackPoint::with_elevation(45.8326, 6.8652, 4808.0);
/// assert_eq!(summit.elevation, Some(4808.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
}

impl TrackPoint {
    /// Create a point without elevation.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            elevation: None,
        }
    }

    /// Create a point with elevation.
    pub fn with_elevation(lat: f64, lng: f64, elevation: f64) -> Self {
        Self {
            lat,
            lng,
            elevation: Some(elevation),
        }
    }

    /// Same elevation, new position.
    pub fn moved_to(&self, position: &TrackPoint) -> Self {
        Self {
            lat: position.lat,
            lng: position.lng,
            elevation: self.elevation,
        }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && self.lat >= -90.0
            && self.lat <= 90.0
            && self.lng >= -180.0
            && self.lng <= 180.0
            && self.elevation.map_or(true, f64::is_finite)
    }
}

/// Bounding box for a track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Create bounds from track points. `None` for an empty track.
    pub fn from_points(points: &[TrackPoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut min_lat = f64::MAX;
        let mut max_lat = f64::MIN;
        let mut min_lng = f64::MAX;
        let mut max_lng = f64::MIN;

        for p in points {
            min_lat = min_lat.min(p.lat);
            max_lat = max_lat.max(p.lat);
            min_lng = min_lng.min(p.lng);
            max_lng = max_lng.max(p.lng);
        }

        Some(Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        })
    }

    /// Get the center point of the bounds.
    pub fn center(&self) -> TrackPoint {
        TrackPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }
}

// ============================================================================
// Ingestion
// ============================================================================

/// Validate a point sequence once at ingestion.
///
/// The editor trusts its canonical track afterwards and never re-checks
/// coordinates on individual operations.
pub fn validate_points(points: &[TrackPoint]) -> Result<()> {
    for (index, p) in points.iter().enumerate() {
        if !p.is_valid() {
            return Err(TrackEditError::InvalidCoordinates {
                index,
                message: format!(
                    "lat={}, lng={}, elevation={:?}",
                    p.lat, p.lng, p.elevation
                ),
            });
        }
    }
    Ok(())
}

/// Decode a `[{ "lat", "lng", "elevation"? }, ...]` array and validate it.
///
/// # Example
/// ```
/// use track_editor::parse_track_json;
/// let track = parse_track_json(r#"[{"lat": 46.5, "lng": 6.6, "elevation": 372.0}]"#).unwrap();
/// assert_eq!(track[0].elevation, Some(372.0));
/// ```
pub fn parse_track_json(json: &str) -> Result<Vec<TrackPoint>> {
    let points: Vec<TrackPoint> = serde_json::from_str(json)?;
    validate_points(&points)?;
    Ok(points)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_point_validation() {
        assert!(TrackPoint::new(46.52, 6.63).is_valid());
        assert!(!TrackPoint::new(91.0, 0.0).is_valid());
        assert!(!TrackPoint::new(0.0, 181.0).is_valid());
        assert!(!TrackPoint::new(f64::NAN, 0.0).is_valid());
        assert!(!TrackPoint::with_elevation(0.0, 0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_moved_to_keeps_elevation() {
        let p = TrackPoint::with_elevation(46.0, 7.0, 1200.0);
        let moved = p.moved_to(&TrackPoint::new(46.1, 7.1));
        assert_eq!(moved, TrackPoint::with_elevation(46.1, 7.1, 1200.0));
    }

    #[test]
    fn test_bounds_and_center() {
        let points = vec![TrackPoint::new(46.50, 6.60), TrackPoint::new(46.52, 6.64)];
        let bounds = Bounds::from_points(&points).unwrap();
        assert_eq!(bounds.min_lat, 46.50);
        assert_eq!(bounds.max_lng, 6.64);
        let center = bounds.center();
        assert!((center.lat - 46.51).abs() < 1e-9);
        assert!((center.lng - 6.62).abs() < 1e-9);
        assert!(Bounds::from_points(&[]).is_none());
    }

    #[test]
    fn test_parse_track_json() {
        let json = r#"[{"lat": 46.5, "lng": 6.6}, {"lat": 46.6, "lng": 6.7, "elevation": 500.0}]"#;
        let track = parse_track_json(json).unwrap();
        assert_eq!(track.len(), 2);
        assert_eq!(track[0].elevation, None);
        assert_eq!(track[1].elevation, Some(500.0));
    }

    #[test]
    fn test_parse_track_json_rejects_out_of_range() {
        let json = r#"[{"lat": 46.5, "lng": 6.6}, {"lat": 123.0, "lng": 6.7}]"#;
        let err = parse_track_json(json).unwrap_err();
        assert!(matches!(err, TrackEditError::InvalidCoordinates { index: 1, .. }));
    }

    #[test]
    fn test_serialize_omits_missing_elevation() {
        let json = serde_json::to_string(&TrackPoint::new(1.0, 2.0)).unwrap();
        assert_eq!(json, r#"{"lat":1.0,"lng":2.0}"#);
    }
}

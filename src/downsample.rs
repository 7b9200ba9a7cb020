//! Display projection of a track: a bounded subset of points used for
//! rendering and hit-testing, with back-references into the canonical track.
//!
//! The point budget scales with the track's real-world length so short
//! tracks keep every editable point while long tracks stay responsive.

use serde::{Deserialize, Serialize};

use crate::geo_utils::polyline_length;
use crate::TrackPoint;

/// Policy for the number of points shown on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewPointPolicy {
    /// Minimum budget, so short tracks remain editable.
    /// Default: 30
    pub floor: usize,
    /// Maximum budget, so long tracks stay interactive.
    /// Default: 500
    pub ceiling: usize,
    /// Budget per kilometre of track.
    /// Default: 10.0
    pub points_per_km: f64,
}

impl Default for ViewPointPolicy {
    fn default() -> Self {
        Self {
            floor: 30,
            ceiling: 500,
            points_per_km: 10.0,
        }
    }
}

impl ViewPointPolicy {
    /// Budget for a track of the given length in kilometres.
    pub fn max_points_for_distance(&self, distance_km: f64) -> usize {
        let wanted = (distance_km.max(0.0) * self.points_per_km).round() as usize;
        wanted.clamp(self.floor, self.ceiling.max(self.floor))
    }

    /// Budget for a full track.
    pub fn max_points(&self, track: &[TrackPoint]) -> usize {
        self.max_points_for_distance(polyline_length(track))
    }
}

/// A displayed point and its index in the canonical track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayPoint {
    pub point: TrackPoint,
    pub original_index: usize,
}

/// Reduced view of the canonical track.
///
/// `original_index` values are strictly increasing, and a non-empty
/// projection always starts at index 0 and ends at the canonical last index.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplayProjection {
    points: Vec<DisplayPoint>,
}

impl DisplayProjection {
    /// Every point of the track, unchanged.
    pub fn identity(track: &[TrackPoint]) -> Self {
        Self {
            points: track
                .iter()
                .enumerate()
                .map(|(original_index, &point)| DisplayPoint {
                    point,
                    original_index,
                })
                .collect(),
        }
    }

    pub fn points(&self) -> &[DisplayPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, display_index: usize) -> Option<&DisplayPoint> {
        self.points.get(display_index)
    }

    /// Canonical index behind a display index.
    pub fn original_index(&self, display_index: usize) -> Option<usize> {
        self.points.get(display_index).map(|p| p.original_index)
    }

    /// Display index showing a canonical index, if that point is displayed.
    pub fn display_index_of(&self, original_index: usize) -> Option<usize> {
        self.points
            .binary_search_by_key(&original_index, |p| p.original_index)
            .ok()
    }

    /// Positions only, in display order.
    pub fn track_points(&self) -> Vec<TrackPoint> {
        self.points.iter().map(|p| p.point).collect()
    }

    /// Move a displayed point without touching the canonical track.
    pub(crate) fn set_position(&mut self, display_index: usize, point: TrackPoint) {
        if let Some(p) = self.points.get_mut(display_index) {
            p.point = point;
        }
    }
}

/// Stride-sample a track down to at most `max_points` points.
///
/// Returns the identity projection when the track already fits. Otherwise
/// keeps every `ceil((len - 1) / (max_points - 1))`-th point plus the last
/// one. Sampled
/// points are exact members of the input, never interpolated.
///
/// # Example
/// ```
/// use track_editor::{downsample, TrackPoint};
/// let track: Vec<TrackPoint> = (0..1000)
///     .map(|i| TrackPoint::new(46.0 + i as f64 * 0.0001, 7.0))
///     .collect();
/// let projection = downsample(&track, 100);
/// assert_eq!(projection.original_index(0), Some(0));
/// assert_eq!(projection.points().last().unwrap().original_index, 999);
/// ```
pub fn downsample(track: &[TrackPoint], max_points: usize) -> DisplayProjection {
    let max_points = max_points.max(2);
    if track.len() <= max_points {
        return DisplayProjection::identity(track);
    }

    // max_points - 1 strided points from 0..last, then last itself
    let last = track.len() - 1;
    let step = last.div_ceil(max_points - 1);

    let mut points: Vec<DisplayPoint> = (0..last)
        .step_by(step)
        .take(max_points - 1)
        .map(|i| DisplayPoint {
            point: track[i],
            original_index: i,
        })
        .collect();
    points.push(DisplayPoint {
        point: track[last],
        original_index: last,
    });

    DisplayProjection { points }
}

//! Drag session: the short-lived state between pointer-down and pointer-up
//! on a track point.
//!
//! A press that never moves further than the pixel threshold is a click.
//! Once the threshold is crossed the session stays a drag until it ends.

use crate::locator::{screen_distance, Projector};
use crate::TrackPoint;

/// State of one press-and-move on a displayed point.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    /// Display index of the pressed point
    pub point_index: usize,
    /// Canonical index behind `point_index`
    pub canonical_index: usize,
    /// Pointer position at pointer-down
    pub origin: TrackPoint,
    pub has_passed_threshold: bool,
    /// Latest uncommitted position, set once the threshold is crossed
    pub provisional: Option<TrackPoint>,
}

impl DragSession {
    pub fn new(point_index: usize, canonical_index: usize, origin: TrackPoint) -> Self {
        Self {
            point_index,
            canonical_index,
            origin,
            has_passed_threshold: false,
            provisional: None,
        }
    }

    /// Feed a pointer move.
    ///
    /// Returns the provisional position once the pointer has moved more than
    /// `threshold_px` from the origin, `None` while it is still a click.
    pub fn update<P: Projector + ?Sized>(
        &mut self,
        position: TrackPoint,
        projector: &P,
        threshold_px: f64,
    ) -> Option<TrackPoint> {
        if !self.has_passed_threshold {
            let moved = screen_distance(
                projector.project(&self.origin),
                projector.project(&position),
            );
            if moved <= threshold_px {
                return None;
            }
            self.has_passed_threshold = true;
        }
        self.provisional = Some(position);
        self.provisional
    }

    pub fn is_drag(&self) -> bool {
        self.has_passed_threshold
    }
}

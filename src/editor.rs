//! # Track Editor
//!
//! Stateful editing engine that owns the canonical track.
//!
//! ## Architecture
//!
//! The editor keeps:
//! - The canonical (full resolution) track
//! - A snapshot history for undo/redo
//! - A display projection sized by the adaptive point budget
//! - The interaction state: viewing, idle (optionally with a selected
//!   point), dragging, or segment selected
//! - Cached statistics for the canonical track
//!
//! Every operation runs to completion synchronously. Operations that do not
//! apply in the current state return [`EditOutcome::Rejected`] and leave the
//! editor untouched. Any change to the canonical track clears the selection,
//! since display indices may have shifted.
//!
//! Selection and drag indices are *display* indices. They are mapped to
//! canonical indices through [`DisplayProjection::original_index`] at the
//! moment the canonical track is changed.

use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use crate::downsample::{downsample, DisplayProjection, ViewPointPolicy};
use crate::drag::DragSession;
use crate::geo_utils::{midpoint, route_stats, RouteStats};
use crate::history::History;
use crate::locator::{nearest_point, nearest_segment, Projector, ScreenPoint};
use crate::simplify::simplify;
use crate::{validate_points, Bounds, Result, TrackEditError, TrackPoint};

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the editor, supplied at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Display point budget policy.
    pub view_points: ViewPointPolicy,

    /// Pointer movement (pixels) before a press becomes a drag.
    /// Default: 5.0
    pub drag_threshold_px: f64,

    /// Maximum distance (pixels) for a click to select a segment.
    /// Default: 10.0
    pub segment_tolerance_px: f64,

    /// Maximum distance (pixels) for a press to hit a point.
    /// Default: 12.0
    pub point_tolerance_px: f64,

    /// Douglas-Peucker tolerance in kilometres.
    /// Default: 0.01 (10 meters)
    pub simplification_tolerance_km: f64,

    /// Maximum number of history snapshots. `None` keeps everything.
    /// Default: None
    pub history_limit: Option<usize>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            view_points: ViewPointPolicy::default(),
            drag_threshold_px: 5.0,
            segment_tolerance_px: 10.0,
            point_tolerance_px: 12.0,
            simplification_tolerance_km: 0.01,
            history_limit: None,
        }
    }
}

impl EditorConfig {
    /// Check that every threshold is usable.
    pub fn validate(&self) -> Result<()> {
        let policy = &self.view_points;
        if policy.floor < 2 {
            return Err(config_error(format!(
                "view point floor must be at least 2, got {}",
                policy.floor
            )));
        }
        if policy.ceiling < policy.floor {
            return Err(config_error(format!(
                "view point ceiling {} is below floor {}",
                policy.ceiling, policy.floor
            )));
        }
        if !(policy.points_per_km.is_finite() && policy.points_per_km > 0.0) {
            return Err(config_error(format!(
                "points_per_km must be positive, got {}",
                policy.points_per_km
            )));
        }
        if !(self.drag_threshold_px.is_finite() && self.drag_threshold_px >= 0.0) {
            return Err(config_error(format!(
                "drag_threshold_px must be non-negative, got {}",
                self.drag_threshold_px
            )));
        }
        for (name, value) in [
            ("segment_tolerance_px", self.segment_tolerance_px),
            ("point_tolerance_px", self.point_tolerance_px),
            ("simplification_tolerance_km", self.simplification_tolerance_km),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(config_error(format!("{} must be positive, got {}", name, value)));
            }
        }
        if self.history_limit == Some(0) {
            return Err(config_error("history_limit must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Load a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EditorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

fn config_error(message: String) -> TrackEditError {
    TrackEditError::ConfigError { message }
}

// ============================================================================
// State Types
// ============================================================================

/// Public view of the interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditorState {
    /// Read-only, edit mode off
    Viewing,
    EditingIdle,
    EditingDragging,
    EditingSegmentSelected,
}

/// Current selection, in display indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    None,
    Point(usize),
    /// Always `(a, a + 1)`
    Segment(usize, usize),
}

/// Whether the display projection is downsampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DetailLevel {
    #[default]
    Reduced,
    Full,
}

/// Why an operation left the editor untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    /// Edit mode is off
    ViewOnly,
    /// Operation does not apply in this state
    WrongState(EditorState),
    NothingSelected,
    /// A selection exists but the operation needs none
    SelectionActive,
    IndexOutOfRange { index: usize, len: usize },
    NothingToUndo,
    NothingToRedo,
    EmptyTrack,
    /// Caller-supplied position is not a valid coordinate
    InvalidPoint,
}

/// Result of an editor operation.
///
/// Rejections are routine UI races (a double click, redo at the end of
/// history), so they are reported rather than raised.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditOutcome {
    Applied,
    Rejected(Rejection),
}

impl EditOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, EditOutcome::Applied)
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            EditOutcome::Applied => None,
            EditOutcome::Rejected(r) => Some(*r),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Interaction {
    Viewing,
    Idle { selected: Option<usize> },
    Dragging(DragSession),
    SegmentSelected { a: usize, b: usize },
}

// ============================================================================
// Track Editor
// ============================================================================

/// The track editing engine.
///
/// Single writer: one user, one editing session. Not meant to be shared
/// across threads while mutating.
#[derive(Debug, Clone)]
pub struct TrackEditor {
    // Canonical state
    track: Vec<TrackPoint>,
    history: History,

    // Derived state
    display: DisplayProjection,
    stats: RouteStats,
    max_view_points: usize,
    detail: DetailLevel,

    interaction: Interaction,

    /// Track as it was before `toggle_simplify`, while simplified
    simplify_stash: Option<Vec<TrackPoint>>,
    saved_revision: u64,

    config: EditorConfig,
}

impl TrackEditor {
    /// Create an editor with default configuration.
    ///
    /// Starts in `EditingIdle` when `edit_mode` is set, `Viewing` otherwise.
    pub fn new(points: Vec<TrackPoint>, edit_mode: bool) -> Result<Self> {
        Self::with_config(points, EditorConfig::default(), edit_mode)
    }

    /// Create an editor with custom configuration.
    pub fn with_config(
        points: Vec<TrackPoint>,
        config: EditorConfig,
        edit_mode: bool,
    ) -> Result<Self> {
        config.validate()?;
        validate_points(&points)?;

        let max_view_points = config.view_points.max_points(&points);
        let history = History::with_limit(points.clone(), config.history_limit);
        let saved_revision = history.revision();

        let mut editor = Self {
            track: points,
            history,
            display: DisplayProjection::default(),
            stats: RouteStats::default(),
            max_view_points,
            detail: DetailLevel::default(),
            interaction: if edit_mode {
                Interaction::Idle { selected: None }
            } else {
                Interaction::Viewing
            },
            simplify_stash: None,
            saved_revision,
            config,
        };
        editor.refresh_derived();

        info!(
            "[TrackEditor] Loaded {} points ({:.2} km), view budget {}",
            editor.track.len(),
            editor.stats.distance_km,
            editor.max_view_points
        );
        Ok(editor)
    }

    /// Replace the track with a freshly supplied one.
    ///
    /// Resets history, selection, drag and the simplify toggle, and
    /// recomputes the view point budget. Edit mode is kept.
    pub fn load_track(&mut self, points: Vec<TrackPoint>) -> Result<()> {
        validate_points(&points)?;

        self.max_view_points = self.config.view_points.max_points(&points);
        self.history.reset(points.clone());
        self.saved_revision = self.history.revision();
        self.track = points;
        self.simplify_stash = None;
        self.interaction = match self.interaction {
            Interaction::Viewing => Interaction::Viewing,
            _ => Interaction::Idle { selected: None },
        };
        self.refresh_derived();

        info!(
            "[TrackEditor] Reloaded {} points ({:.2} km), view budget {}",
            self.track.len(),
            self.stats.distance_km,
            self.max_view_points
        );
        Ok(())
    }

    // ========================================================================
    // Read-only accessors
    // ========================================================================

    /// The canonical track.
    pub fn track(&self) -> &[TrackPoint] {
        &self.track
    }

    /// Hand the canonical track to the caller, consuming the editor.
    pub fn into_track(self) -> Vec<TrackPoint> {
        self.track
    }

    /// Canonical track as JSON for the save call.
    pub fn track_json(&self) -> String {
        serde_json::to_string(&self.track).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn display(&self) -> &DisplayProjection {
        &self.display
    }

    pub fn stats(&self) -> RouteStats {
        self.stats
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.track)
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn max_view_points(&self) -> usize {
        self.max_view_points
    }

    pub fn detail_level(&self) -> DetailLevel {
        self.detail
    }

    pub fn state(&self) -> EditorState {
        match self.interaction {
            Interaction::Viewing => EditorState::Viewing,
            Interaction::Idle { .. } => EditorState::EditingIdle,
            Interaction::Dragging(_) => EditorState::EditingDragging,
            Interaction::SegmentSelected { .. } => EditorState::EditingSegmentSelected,
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.interaction != Interaction::Viewing
    }

    pub fn selection(&self) -> Selection {
        match self.interaction {
            Interaction::Idle {
                selected: Some(index),
            } => Selection::Point(index),
            Interaction::SegmentSelected { a, b } => Selection::Segment(a, b),
            _ => Selection::None,
        }
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        match &self.interaction {
            Interaction::Dragging(session) => Some(session),
            _ => None,
        }
    }

    /// Number of history snapshots, the initial track included.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// True while a simplification can be restored by `toggle_simplify`.
    pub fn is_simplified(&self) -> bool {
        self.simplify_stash.is_some()
    }

    /// Remember the current snapshot as the persisted one.
    pub fn mark_saved(&mut self) {
        self.saved_revision = self.history.revision();
    }

    /// True when the canonical track differs from the last saved snapshot.
    pub fn has_unsaved_changes(&self) -> bool {
        self.history.revision() != self.saved_revision
    }

    // ========================================================================
    // Hit-testing
    // ========================================================================

    /// Display index of the point under `query`, within the point tolerance.
    pub fn point_at<P: Projector + ?Sized>(&self, query: ScreenPoint, projector: &P) -> Option<usize> {
        nearest_point(&self.display, query, projector, self.config.point_tolerance_px)
    }

    /// Display segment under `query`, within the segment tolerance.
    pub fn segment_at<P: Projector + ?Sized>(
        &self,
        query: ScreenPoint,
        projector: &P,
    ) -> Option<(usize, usize)> {
        nearest_segment(&self.display, query, projector, self.config.segment_tolerance_px)
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Select a displayed point.
    pub fn select_point(&mut self, index: usize) -> EditOutcome {
        let result = self.require_editing().and_then(|_| {
            self.require_display_index(index)?;
            self.interaction = Interaction::Idle {
                selected: Some(index),
            };
            Ok(())
        });
        finish("select_point", result)
    }

    /// Select the display segment `(a, b)`, where `b == a + 1`.
    pub fn select_segment(&mut self, a: usize, b: usize) -> EditOutcome {
        let result = self.require_editing().and_then(|_| {
            if a.checked_add(1) != Some(b) {
                return Err(Rejection::IndexOutOfRange {
                    index: b,
                    len: self.display.len(),
                });
            }
            self.require_display_index(b)?;
            self.interaction = Interaction::SegmentSelected { a, b };
            Ok(())
        });
        finish("select_segment", result)
    }

    /// Hit-test `query` and select the segment under it.
    pub fn select_segment_at<P: Projector + ?Sized>(
        &mut self,
        query: ScreenPoint,
        projector: &P,
    ) -> EditOutcome {
        let result = self.require_editing().and_then(|_| {
            let (a, b) = self
                .segment_at(query, projector)
                .ok_or(Rejection::NothingSelected)?;
            self.interaction = Interaction::SegmentSelected { a, b };
            Ok(())
        });
        finish("select_segment_at", result)
    }

    pub fn clear_selection(&mut self) -> EditOutcome {
        let result = self.require_editing().map(|_| {
            self.interaction = Interaction::Idle { selected: None };
        });
        finish("clear_selection", result)
    }

    // ========================================================================
    // Point editing
    // ========================================================================

    /// Insert the midpoint of the selected segment's canonical endpoints,
    /// right after the first endpoint, and select the new point.
    pub fn add_point_at_segment(&mut self) -> EditOutcome {
        let result = self.require_editing().and_then(|_| {
            let (a, b) = match self.interaction {
                Interaction::SegmentSelected { a, b } => (a, b),
                _ => return Err(Rejection::WrongState(self.state())),
            };
            let first = self.canonical_index(a)?;
            let second = self.canonical_index(b)?;

            let inserted_at = first + 1;
            let mut next = self.track.clone();
            next.insert(inserted_at, midpoint(&self.track[first], &self.track[second]));
            self.commit(next);

            // The new point's canonical index is known, so it can be selected
            // when the projection displays it.
            self.interaction = Interaction::Idle {
                selected: self.display.display_index_of(inserted_at),
            };
            debug!(
                "[TrackEditor] Inserted point at {} between {} and {}",
                inserted_at, first, second
            );
            Ok(())
        });
        finish("add_point_at_segment", result)
    }

    /// Append a point at the current view center.
    pub fn add_point_at_view_center(&mut self, center: TrackPoint) -> EditOutcome {
        let result = self.require_editing().and_then(|_| {
            match self.interaction {
                Interaction::Idle { selected: None } => {}
                Interaction::Idle { selected: Some(_) } => return Err(Rejection::SelectionActive),
                _ => return Err(Rejection::WrongState(self.state())),
            }
            if !center.is_valid() {
                return Err(Rejection::InvalidPoint);
            }

            let mut next = self.track.clone();
            next.push(center);
            self.commit(next);
            debug!("[TrackEditor] Appended point, {} total", self.track.len());
            Ok(())
        });
        finish("add_point_at_view_center", result)
    }

    /// Remove the selected point.
    pub fn delete_selected_point(&mut self) -> EditOutcome {
        let result = self.require_editing().and_then(|_| {
            let index = match self.interaction {
                Interaction::Idle {
                    selected: Some(index),
                } => index,
                _ => return Err(Rejection::NothingSelected),
            };
            let canonical = self.canonical_index(index)?;

            let mut next = self.track.clone();
            next.remove(canonical);
            self.commit(next);
            debug!("[TrackEditor] Deleted point {}", canonical);
            Ok(())
        });
        finish("delete_selected_point", result)
    }

    // ========================================================================
    // Dragging
    // ========================================================================

    /// Start pressing the displayed point `point_index`.
    pub fn begin_drag(&mut self, point_index: usize, origin: TrackPoint) -> EditOutcome {
        let result = self.require_editing().and_then(|_| {
            if !matches!(self.interaction, Interaction::Idle { .. }) {
                return Err(Rejection::WrongState(self.state()));
            }
            let canonical = self.canonical_index(point_index)?;
            self.interaction =
                Interaction::Dragging(DragSession::new(point_index, canonical, origin));
            Ok(())
        });
        finish("begin_drag", result)
    }

    /// Feed a pointer move during a drag.
    ///
    /// Only the display projection moves. The canonical track and history
    /// are untouched until [`TrackEditor::end_drag`].
    pub fn update_drag<P: Projector + ?Sized>(
        &mut self,
        position: TrackPoint,
        projector: &P,
    ) -> EditOutcome {
        let session = match &mut self.interaction {
            Interaction::Dragging(session) => session,
            _ => return finish("update_drag", Err(self.wrong_state_rejection())),
        };

        let was_drag = session.is_drag();
        if let Some(provisional) = session.update(position, projector, self.config.drag_threshold_px)
        {
            if !was_drag {
                trace!(
                    "[TrackEditor] Drag threshold crossed on point {}",
                    session.canonical_index
                );
            }
            let moved = self.track[session.canonical_index].moved_to(&provisional);
            self.display.set_position(session.point_index, moved);
        }
        EditOutcome::Applied
    }

    /// Release the pointer.
    ///
    /// A drag replaces the point and records one history entry. A press that
    /// never crossed the threshold selects the point instead.
    pub fn end_drag(&mut self, final_position: TrackPoint) -> EditOutcome {
        let session = match std::mem::replace(
            &mut self.interaction,
            Interaction::Idle { selected: None },
        ) {
            Interaction::Dragging(session) => session,
            other => {
                self.interaction = other;
                return finish("end_drag", Err(self.wrong_state_rejection()));
            }
        };

        if !session.is_drag() {
            self.interaction = Interaction::Idle {
                selected: Some(session.point_index),
            };
            return EditOutcome::Applied;
        }

        if !final_position.is_valid() {
            self.refresh_derived();
            return finish("end_drag", Err(Rejection::InvalidPoint));
        }

        let index = session.canonical_index;
        let mut next = self.track.clone();
        next[index] = self.track[index].moved_to(&final_position);
        self.commit(next);
        debug!("[TrackEditor] Moved point {}", index);
        EditOutcome::Applied
    }

    /// Abandon the drag and put the display back.
    pub fn cancel_drag(&mut self) -> EditOutcome {
        match &self.interaction {
            Interaction::Dragging(session) => {
                let moved = session.is_drag();
                self.interaction = Interaction::Idle { selected: None };
                if moved {
                    self.refresh_derived();
                }
                EditOutcome::Applied
            }
            _ => finish("cancel_drag", Err(self.wrong_state_rejection())),
        }
    }

    // ========================================================================
    // History
    // ========================================================================

    pub fn undo(&mut self) -> EditOutcome {
        let result = self.require_editing().and_then(|_| {
            let snapshot = self.history.undo().ok_or(Rejection::NothingToUndo)?.to_vec();
            self.restore(snapshot);
            Ok(())
        });
        finish("undo", result)
    }

    pub fn redo(&mut self) -> EditOutcome {
        let result = self.require_editing().and_then(|_| {
            let snapshot = self.history.redo().ok_or(Rejection::NothingToRedo)?.to_vec();
            self.restore(snapshot);
            Ok(())
        });
        finish("redo", result)
    }

    // ========================================================================
    // Modes
    // ========================================================================

    /// Simplify the track, or restore the pre-simplification track if the
    /// previous toggle simplified it. Each direction is one history entry.
    pub fn toggle_simplify(&mut self) -> EditOutcome {
        let result = self.require_editing().and_then(|_| {
            if let Some(original) = self.simplify_stash.take() {
                self.commit(original);
                debug!("[TrackEditor] Restored {} points", self.track.len());
                return Ok(());
            }
            if self.track.is_empty() {
                return Err(Rejection::EmptyTrack);
            }

            let original = self.track.clone();
            let simplified = simplify(&original, self.config.simplification_tolerance_km);
            debug!(
                "[TrackEditor] Simplified {} -> {} points",
                original.len(),
                simplified.len()
            );
            self.commit(simplified);
            self.simplify_stash = Some(original);
            Ok(())
        });
        finish("toggle_simplify", result)
    }

    /// Switch between viewing and editing.
    ///
    /// Leaving edit mode discards any drag in progress without touching the
    /// canonical track.
    pub fn toggle_edit_mode(&mut self) -> EditOutcome {
        match std::mem::replace(&mut self.interaction, Interaction::Viewing) {
            Interaction::Viewing => {
                self.interaction = Interaction::Idle { selected: None };
            }
            Interaction::Dragging(session) => {
                if session.is_drag() {
                    self.refresh_derived();
                }
            }
            _ => {}
        }
        debug!("[TrackEditor] Edit mode {}", self.is_edit_mode());
        EditOutcome::Applied
    }

    /// Switch between the downsampled and the full display projection.
    ///
    /// Clears the selection, since display indices change.
    pub fn set_detail_level(&mut self, detail: DetailLevel) -> EditOutcome {
        if matches!(self.interaction, Interaction::Dragging(_)) {
            return finish("set_detail_level", Err(Rejection::WrongState(self.state())));
        }
        self.detail = detail;
        if self.is_edit_mode() {
            self.interaction = Interaction::Idle { selected: None };
        }
        self.refresh_derived();
        EditOutcome::Applied
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn require_editing(&self) -> std::result::Result<(), Rejection> {
        match self.interaction {
            Interaction::Viewing => Err(Rejection::ViewOnly),
            Interaction::Dragging(_) => Err(Rejection::WrongState(EditorState::EditingDragging)),
            _ => Ok(()),
        }
    }

    fn wrong_state_rejection(&self) -> Rejection {
        match self.interaction {
            Interaction::Viewing => Rejection::ViewOnly,
            _ => Rejection::WrongState(self.state()),
        }
    }

    fn require_display_index(&self, index: usize) -> std::result::Result<(), Rejection> {
        if index < self.display.len() {
            Ok(())
        } else {
            Err(Rejection::IndexOutOfRange {
                index,
                len: self.display.len(),
            })
        }
    }

    fn canonical_index(&self, display_index: usize) -> std::result::Result<usize, Rejection> {
        self.display
            .original_index(display_index)
            .ok_or(Rejection::IndexOutOfRange {
                index: display_index,
                len: self.display.len(),
            })
    }

    /// Install a new canonical track as one history step.
    fn commit(&mut self, next: Vec<TrackPoint>) {
        self.history.push(next.clone());
        self.track = next;
        self.simplify_stash = None;
        self.interaction = Interaction::Idle { selected: None };
        self.refresh_derived();
    }

    /// Install a history snapshot without recording a new step.
    fn restore(&mut self, snapshot: Vec<TrackPoint>) {
        self.track = snapshot;
        self.simplify_stash = None;
        self.interaction = Interaction::Idle { selected: None };
        self.refresh_derived();
    }

    fn refresh_derived(&mut self) {
        self.display = match self.detail {
            DetailLevel::Full => DisplayProjection::identity(&self.track),
            DetailLevel::Reduced => downsample(&self.track, self.max_view_points),
        };
        self.stats = route_stats(&self.track);
    }
}

fn finish(operation: &str, result: std::result::Result<(), Rejection>) -> EditOutcome {
    match result {
        Ok(()) => EditOutcome::Applied,
        Err(rejection) => {
            debug!("[TrackEditor] {} rejected: {:?}", operation, rejection);
            EditOutcome::Rejected(rejection)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

//! # History
//!
//! Linear undo/redo over full track snapshots.
//!
//! The cursor always points at the snapshot matching the canonical track.
//! Pushing after an undo discards every entry past the cursor, so there is
//! no branching history.

use crate::TrackPoint;

#[derive(Debug, Clone)]
struct Snapshot {
    revision: u64,
    points: Vec<TrackPoint>,
}

/// Snapshot stack with a cursor.
///
/// Invariant: `entries` is never empty and `cursor < entries.len()`.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Snapshot>,
    cursor: usize,
    next_revision: u64,
    /// Maximum number of snapshots kept. `None` = unbounded.
    limit: Option<usize>,
}

impl History {
    /// Create a history holding the initial track.
    pub fn new(initial: Vec<TrackPoint>) -> Self {
        Self {
            entries: vec![Snapshot {
                revision: 0,
                points: initial,
            }],
            cursor: 0,
            next_revision: 1,
            limit: None,
        }
    }

    /// Create a history that keeps at most `limit` snapshots.
    ///
    /// A limit below 1 is treated as 1 (only the current state).
    pub fn with_limit(initial: Vec<TrackPoint>, limit: Option<usize>) -> Self {
        Self {
            limit: limit.map(|l| l.max(1)),
            ..Self::new(initial)
        }
    }

    /// Drop everything and start over from `initial`.
    pub fn reset(&mut self, initial: Vec<TrackPoint>) {
        self.entries.clear();
        self.push_entry(initial);
        self.cursor = 0;
    }

    /// Record a new snapshot after the cursor, discarding the redo branch.
    pub fn push(&mut self, snapshot: Vec<TrackPoint>) {
        self.entries.truncate(self.cursor + 1);
        self.push_entry(snapshot);
        self.cursor = self.entries.len() - 1;

        if let Some(limit) = self.limit {
            if self.entries.len() > limit {
                let excess = self.entries.len() - limit;
                self.entries.drain(..excess);
                self.cursor -= excess;
            }
        }
    }

    fn push_entry(&mut self, points: Vec<TrackPoint>) {
        self.entries.push(Snapshot {
            revision: self.next_revision,
            points,
        });
        self.next_revision += 1;
    }

    /// Step back one snapshot. `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&[TrackPoint]> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(&self.entries[self.cursor].points)
    }

    /// Step forward one snapshot. `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&[TrackPoint]> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(&self.entries[self.cursor].points)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Number of stored snapshots, including the initial one.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Identifier of the snapshot at the cursor.
    ///
    /// Unique per pushed snapshot, so it still identifies a saved state after
    /// old entries were dropped or the cursor moved.
    pub fn revision(&self) -> u64 {
        self.entries[self.cursor].revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(n: usize) -> Vec<TrackPoint> {
        (0..n).map(|i| TrackPoint::new(46.0, 7.0 + i as f64 * 0.001)).collect()
    }

    #[test]
    fn test_undo_redo_bounds() {
        let mut history = History::new(track(1));
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());

        history.push(track(2));
        history.push(track(3));
        assert_eq!(history.len(), 3);
        assert!(!history.can_redo());

        assert_eq!(history.undo().map(|t| t.len()), Some(2));
        assert_eq!(history.undo().map(|t| t.len()), Some(1));
        assert!(history.undo().is_none());

        assert_eq!(history.redo().map(|t| t.len()), Some(2));
        assert_eq!(history.redo().map(|t| t.len()), Some(3));
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_push_discards_redo_branch() {
        let mut history = History::new(track(1));
        history.push(track(2));
        history.push(track(3));
        history.undo();
        history.push(track(5));

        assert_eq!(history.len(), 3);
        assert!(!history.can_redo());
        assert_eq!(history.undo().map(|t| t.len()), Some(2));
        assert_eq!(history.redo().map(|t| t.len()), Some(5));
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::with_limit(track(1), Some(3));
        for n in 2..=6 {
            history.push(track(n));
        }
        assert_eq!(history.len(), 3);
        assert!(!history.can_redo());
        assert_eq!(history.undo().map(|t| t.len()), Some(5));
        assert_eq!(history.undo().map(|t| t.len()), Some(4));
        assert!(!history.can_undo());
    }

    #[test]
    fn test_revision_follows_cursor() {
        let mut history = History::new(track(1));
        let initial = history.revision();
        history.push(track(2));
        let edited = history.revision();
        assert_ne!(initial, edited);

        history.undo();
        assert_eq!(history.revision(), initial);
        history.push(track(3));
        assert_ne!(history.revision(), edited);
    }

    #[test]
    fn test_reset() {
        let mut history = History::new(track(1));
        history.push(track(2));
        history.reset(track(7));
        assert_eq!(history.len(), 1);
        assert!(!history.can_undo());
        history.push(track(8));
        assert_eq!(history.undo().map(|t| t.len()), Some(7));
    }
}

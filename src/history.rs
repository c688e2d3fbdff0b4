//! Undo/redo stacks of working-set snapshots.

use crate::profile::Snapshot;
use serde::{Deserialize, Serialize};

/// A pair of undo and redo stacks.
///
/// Both stacks keep their most recent entry at the end. Cloning a `History`
/// duplicates every snapshot, so a clone handed to a profile never aliases
/// the live working set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    /// Snapshots taken before each mutation, oldest first.
    #[serde(rename = "history", default)]
    undo: Vec<Snapshot>,

    /// Snapshots displaced by undo, oldest first.
    #[serde(rename = "redoHistory", default)]
    redo: Vec<Snapshot>,
}

impl History {
    /// Creates empty stacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the state before a new mutation. Any pending redo is dropped.
    pub fn record(&mut self, before: Snapshot) {
        self.undo.push(before);
        self.redo.clear();
    }

    /// Steps back one mutation.
    ///
    /// `current` is pushed onto the redo stack and the most recent undo entry
    /// is returned for the caller to restore. Returns `None` (and leaves both
    /// stacks untouched) when there is nothing to undo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo.pop()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Re-applies the most recently undone state; the mirror of [`History::undo`].
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo.pop()?;
        self.undo.push(current);
        Some(next)
    }

    /// Returns `true` if [`History::undo`] would do something.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Returns `true` if [`History::redo`] would do something.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of undoable steps.
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Number of redoable steps.
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    /// Drops both stacks.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Amount;

    fn snap(balance: i64) -> Snapshot {
        Snapshot {
            balance: Amount::from(balance),
            ..Snapshot::default()
        }
    }

    #[test]
    fn test_undo_on_empty_is_noop() {
        let mut history = History::new();
        assert!(history.undo(snap(1)).is_none());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_then_redo_returns_displaced_state() {
        let mut history = History::new();
        history.record(snap(100));

        let restored = history.undo(snap(90)).unwrap();
        assert_eq!(restored, snap(100));
        assert_eq!(history.redo_depth(), 1);

        let reapplied = history.redo(snap(100)).unwrap();
        assert_eq!(reapplied, snap(90));
        assert_eq!(history.undo_depth(), 1);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = History::new();
        history.record(snap(100));
        history.undo(snap(90));
        assert!(history.can_redo());

        history.record(snap(100));
        assert!(!history.can_redo());
        assert_eq!(history.undo_depth(), 1);
    }

    #[test]
    fn test_serialized_field_names() {
        let mut history = History::new();
        history.record(snap(5));
        let json = serde_json::to_value(&history).unwrap();
        assert_eq!(json["history"].as_array().unwrap().len(), 1);
        assert!(json["redoHistory"].as_array().unwrap().is_empty());
    }
}

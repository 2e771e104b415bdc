// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Trail-based backtracking for the tatami search.
//!
//! Every change to trailed search state (variable domains, constraint
//! entailment flags) is recorded here as the cell's old raw word. Rewinding
//! to an earlier position replays the entries newest-first, so the state is
//! restored exactly as it was when the position was taken.
//!
//! Positions are plain trail lengths, which is what the search engine stores
//! in each stack entry.

/// A single entry in the trail, recording one state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TrailEntry {
    /// Identifier of the cell that changed
    id: usize,
    /// The raw word held by the cell before the change
    old_value: u64,
}

/// Something the trail can write old values back into.
///
/// Implementors map a cell id to the storage it names. Ids are assigned by
/// the owner of the state; the trail never interprets them.
pub trait TrailRestore {
    /// Put `old_value` back into cell `id`.
    fn restore(&mut self, id: usize, old_value: u64);
}

/// The undo log for one search.
///
/// # Memory Model
///
/// - DYNAMIC: the trail is mutable state that grows while the search descends
///   and shrinks on every backtrack
/// - Each `DomainStore` owns its own trail, so independent searches can run
///   on separate threads without sharing anything
#[derive(Debug)]
pub struct Trail {
    entries: Vec<TrailEntry>,
}

impl Trail {
    /// Initial capacity; the trail grows past it when a search needs more.
    const INITIAL_CAPACITY: usize = 4096;

    /// Create a new empty trail.
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(Self::INITIAL_CAPACITY),
        }
    }

    /// Current position, to be handed back to [`Trail::rewind_to`].
    pub fn checkpoint(&self) -> usize {
        self.entries.len()
    }

    /// Record that cell `id` held `old_value` before a change.
    pub(crate) fn record_change(&mut self, id: usize, old_value: u64) {
        self.entries.push(TrailEntry { id, old_value });
    }

    /// Undo every change recorded after `position`, newest first.
    ///
    /// Returns the number of entries undone. Rewinding to a position at or
    /// beyond the current length does nothing.
    pub fn rewind_to<R: TrailRestore + ?Sized>(
        &mut self,
        position: usize,
        target: &mut R,
    ) -> usize {
        let mut undone = 0;
        while self.entries.len() > position {
            if let Some(entry) = self.entries.pop() {
                target.restore(entry.id, entry.old_value);
                undone += 1;
            }
        }
        undone
    }

    /// Get the current number of entries in the trail.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the trail is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Trail {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A bank of plain words standing in for trailed state.
    struct Cells(Vec<u64>);

    impl Cells {
        fn set(&mut self, trail: &mut Trail, id: usize, value: u64) {
            trail.record_change(id, self.0[id]);
            self.0[id] = value;
        }
    }

    impl TrailRestore for Cells {
        fn restore(&mut self, id: usize, old_value: u64) {
            self.0[id] = old_value;
        }
    }

    #[test]
    fn test_trail_new() {
        let trail = Trail::new();
        assert_eq!(trail.len(), 0);
        assert_eq!(trail.checkpoint(), 0);
        assert!(trail.is_empty());
    }

    #[test]
    fn test_checkpoint_and_rewind() {
        let mut trail = Trail::new();
        let mut cells = Cells(vec![10, 20, 30]);

        cells.set(&mut trail, 0, 11);
        cells.set(&mut trail, 1, 21);
        let checkpoint = trail.checkpoint();
        assert_eq!(checkpoint, 2);

        cells.set(&mut trail, 2, 31);
        cells.set(&mut trail, 0, 12);
        assert_eq!(trail.len(), 4);

        assert_eq!(trail.rewind_to(checkpoint, &mut cells), 2);
        assert_eq!(cells.0, vec![11, 21, 30]);
        assert_eq!(trail.len(), 2);
    }

    #[test]
    fn test_repeated_changes_restore_oldest() {
        let mut trail = Trail::new();
        let mut cells = Cells(vec![1]);

        let checkpoint = trail.checkpoint();
        cells.set(&mut trail, 0, 2);
        cells.set(&mut trail, 0, 3);
        cells.set(&mut trail, 0, 4);

        trail.rewind_to(checkpoint, &mut cells);
        assert_eq!(cells.0[0], 1);
    }

    #[test]
    fn test_nested_checkpoints() {
        let mut trail = Trail::new();
        let mut cells = Cells(vec![0, 0]);

        let outer = trail.checkpoint();
        cells.set(&mut trail, 0, 5);
        let inner = trail.checkpoint();
        cells.set(&mut trail, 1, 7);

        trail.rewind_to(inner, &mut cells);
        assert_eq!(cells.0, vec![5, 0]);

        trail.rewind_to(outer, &mut cells);
        assert_eq!(cells.0, vec![0, 0]);
        assert!(trail.is_empty());
    }

    #[test]
    fn test_rewind_past_end_is_noop() {
        let mut trail = Trail::new();
        let mut cells = Cells(vec![3]);
        cells.set(&mut trail, 0, 4);

        assert_eq!(trail.rewind_to(10, &mut cells), 0);
        assert_eq!(cells.0[0], 4);
        assert_eq!(trail.len(), 1);
    }
}

//! Bounded linear undo/redo over whole-tree snapshots.

use crate::constants::DEFAULT_HISTORY_CAPACITY;
use crate::tree::ElementTree;
use std::collections::VecDeque;

/// Snapshot stack with a cursor on the currently displayed state.
///
/// The stack always holds at least one entry, the state the session started
/// from. Recording after an undo discards everything past the cursor; recording
/// past capacity evicts the oldest snapshot.
#[derive(Clone, Debug)]
pub struct History {
    snapshots: VecDeque<ElementTree>,
    index: usize,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(ElementTree::new(), DEFAULT_HISTORY_CAPACITY)
    }
}

impl History {
    pub fn new(initial: ElementTree, capacity: usize) -> Self {
        let mut snapshots = VecDeque::with_capacity(capacity.max(1));
        snapshots.push_back(initial);
        Self {
            snapshots,
            index: 0,
            capacity: capacity.max(1),
        }
    }

    /// Pushes `tree` as the new current checkpoint.
    pub fn record(&mut self, tree: &ElementTree) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push_back(tree.clone());
        while self.snapshots.len() > self.capacity {
            self.snapshots.pop_front();
        }
        self.index = self.snapshots.len() - 1;
        log::trace!(
            "checkpoint {}/{} recorded",
            self.index + 1,
            self.snapshots.len()
        );
    }

    /// Steps back one checkpoint and returns the tree to display.
    pub fn undo(&mut self) -> Option<ElementTree> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        self.snapshots.get(self.index).cloned()
    }

    pub fn redo(&mut self) -> Option<ElementTree> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        self.snapshots.get(self.index).cloned()
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    /// Forgets all checkpoints and starts over from `tree`.
    pub fn reset(&mut self, tree: &ElementTree) {
        self.snapshots.clear();
        self.snapshots.push_back(tree.clone());
        self.index = 0;
    }

    pub fn current(&self) -> Option<&ElementTree> {
        self.snapshots.get(self.index)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 tmbkoren

//! Bounded snapshot history backing undo/redo.

use std::collections::VecDeque;

/// Number of snapshots kept on the undo side.
pub const HISTORY_LIMIT: usize = 50;

/// Undo/redo stacks of whole-state snapshots.
///
/// The top of the undo stack always mirrors the committed state, so undo is
/// only possible while more than one snapshot is stored.
#[derive(Clone, Debug)]
pub struct History<T> {
    undo: VecDeque<T>,
    redo: Vec<T>,
}

impl<T: Clone> History<T> {
    pub fn new(initial: T) -> Self {
        Self {
            undo: VecDeque::from([initial]),
            redo: Vec::new(),
        }
    }

    /// Commit a new snapshot; clears anything that could have been redone.
    pub fn record(&mut self, snapshot: T) {
        self.undo.push_back(snapshot);
        self.redo.clear();
        while self.undo.len() > HISTORY_LIMIT {
            self.undo.pop_front();
        }
    }

    /// Step back and return the snapshot to restore.
    pub fn undo(&mut self) -> Option<&T> {
        if self.undo.len() <= 1 {
            return None;
        }
        let current = self.undo.pop_back()?;
        self.redo.push(current);
        self.undo.back()
    }

    /// Step forward again and return the snapshot to restore.
    pub fn redo(&mut self) -> Option<&T> {
        let state = self.redo.pop()?;
        self.undo.push_back(state);
        self.undo.back()
    }

    pub fn can_undo(&self) -> bool {
        self.undo.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}

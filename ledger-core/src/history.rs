//! Transaction log with undo/redo
//!
//! An append-only list of edges plus a cursor:
//!
//! ```text
//! entries:  [ e1  e2  e3 | e4  e5 ]
//!                        ^ cursor
//!            applied       undone
//! ```
//!
//! Undo moves the cursor left, redo moves it right. Recording a new edge
//! truncates everything right of the cursor, discarding the redo branch.
//! The log never touches balances or the graph; [`crate::Ledger`] pairs each
//! cursor move with the matching graph and balance change.

use crate::types::{DebtEdge, HistoryView};

/// Undo/redo history of debt edges
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TransactionLog {
    entries: Vec<DebtEdge>,
    cursor: usize,
}

impl TransactionLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a freshly applied edge; returns how many undone edges were dropped
    pub fn record(&mut self, edge: DebtEdge) -> usize {
        let discarded = self.entries.len() - self.cursor;
        self.entries.truncate(self.cursor);
        self.entries.push(edge);
        self.cursor = self.entries.len();
        discarded
    }

    /// Edge the next undo would reverse
    pub fn last_applied(&self) -> Option<&DebtEdge> {
        self.cursor.checked_sub(1).map(|i| &self.entries[i])
    }

    /// Edge the next redo would re-apply
    pub fn next_undone(&self) -> Option<&DebtEdge> {
        self.entries.get(self.cursor)
    }

    /// Mark the last applied edge as undone
    pub fn step_back(&mut self) -> Option<&DebtEdge> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.entries[self.cursor])
    }

    /// Mark the next undone edge as applied
    pub fn step_forward(&mut self) -> Option<&DebtEdge> {
        if self.cursor == self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.entries[self.cursor - 1])
    }

    /// Applied edges, oldest first
    pub fn applied(&self) -> &[DebtEdge] {
        &self.entries[..self.cursor]
    }

    /// Undone edges; the first is redone first
    pub fn undone(&self) -> &[DebtEdge] {
        &self.entries[self.cursor..]
    }

    /// Whether undo would succeed
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Whether redo would succeed
    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    /// Owned copy for reporting
    pub fn view(&self) -> HistoryView {
        HistoryView {
            applied: self.applied().to_vec(),
            undone: self.undone().to_vec(),
        }
    }
}

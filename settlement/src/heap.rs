//! Priority queue of open positions
//!
//! Creditors and debtors each live in a max-heap keyed by the magnitude of
//! their remaining balance. [`priority`] is the single comparator both heaps
//! use; ties on magnitude go to the lower rank, where rank comes from the
//! configured [`TieBreak`].

use crate::config::TieBreak;
use ledger_core::{BalanceSheet, ParticipantId};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// One side of an open balance
#[derive(Debug, Clone)]
pub struct Position {
    /// Participant
    pub participant: ParticipantId,

    /// Remaining |balance|
    pub magnitude: u64,

    /// Tie-break rank (lower wins)
    pub rank: usize,
}

/// Heap order: larger magnitude first, then lower rank first
pub fn priority(a: &Position, b: &Position) -> Ordering {
    a.magnitude
        .cmp(&b.magnitude)
        .then_with(|| b.rank.cmp(&a.rank))
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        priority(self, other) == Ordering::Equal
    }
}

impl Eq for Position {}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        priority(self, other)
    }
}

/// Rank of each entry of `balances` under the given tie-break, by index
pub fn ranks(balances: &BalanceSheet, tie_break: TieBreak) -> Vec<usize> {
    match tie_break {
        TieBreak::RegistrationOrder => (0..balances.len()).collect(),
        TieBreak::Name => {
            let entries = balances.entries();
            let mut order: Vec<usize> = (0..entries.len()).collect();
            order.sort_by(|&a, &b| entries[a].0.cmp(&entries[b].0));

            let mut ranks = vec![0; entries.len()];
            for (rank, index) in order.into_iter().enumerate() {
                ranks[index] = rank;
            }
            ranks
        }
    }
}

/// Max-heap of positions
#[derive(Debug, Default)]
pub struct PositionQueue {
    heap: BinaryHeap<Position>,
}

impl PositionQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a position; zero magnitudes are dropped
    pub fn push(&mut self, position: Position) {
        if position.magnitude > 0 {
            self.heap.push(position);
        }
    }

    /// Remove the highest-priority position
    pub fn pop(&mut self) -> Option<Position> {
        self.heap.pop()
    }

    /// Number of open positions
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True when no positions remain
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

//! Core types for the ledger
//!
//! All amounts are whole currency units held in `i64`. Balances are signed:
//! positive means the participant is owed money, negative means they owe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// Participant identifier (a display name, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Create new participant ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Monotonic identifier assigned to every recorded edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u64);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A registered participant and its running net balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Participant ID
    pub id: ParticipantId,

    /// Net balance (positive = owed, negative = owes)
    pub balance: i64,

    /// Position in registration order
    pub index: usize,
}

/// Debt obligation: `from` owes `to` the given amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtEdge {
    /// Edge ID (stable across undo/redo)
    pub id: EdgeId,

    /// Debtor
    pub from: ParticipantId,

    /// Creditor
    pub to: ParticipantId,

    /// Amount owed (always > 0)
    pub amount: i64,

    /// When the transaction was first recorded
    pub recorded_at: DateTime<Utc>,
}

impl DebtEdge {
    /// Whether this edge starts and ends at the same participant
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

impl fmt::Display for DebtEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {} : {}", self.from, self.to, self.amount)
    }
}

/// Net balances in registration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    entries: Vec<(ParticipantId, i64)>,
}

impl BalanceSheet {
    /// Build from `(participant, balance)` pairs; order is kept as given
    pub fn new(entries: Vec<(ParticipantId, i64)>) -> Self {
        Self { entries }
    }

    /// Entries in registration order
    pub fn entries(&self) -> &[(ParticipantId, i64)] {
        &self.entries
    }

    /// Balance for a participant
    pub fn get(&self, id: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|(p, _)| p.as_str() == id)
            .map(|(_, b)| *b)
    }

    /// Number of participants
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no participants are registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all balances, widened so it cannot overflow
    pub fn total(&self) -> i128 {
        self.entries.iter().map(|(_, b)| *b as i128).sum()
    }

    /// Participants whose balance is not zero
    pub fn non_zero_count(&self) -> usize {
        self.entries.iter().filter(|(_, b)| *b != 0).count()
    }

    /// Iterate over entries
    pub fn iter(&self) -> impl Iterator<Item = &(ParticipantId, i64)> {
        self.entries.iter()
    }
}

/// Point-in-time read of the ledger used by settlement and reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Balances in registration order
    pub balances: BalanceSheet,

    /// Number of edges currently in the graph
    pub edge_count: usize,

    /// Sum of all edge amounts in the graph
    pub gross_total: i128,
}

/// Applied and undone edges, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryView {
    /// Applied edges (the last one is undone first)
    pub applied: Vec<DebtEdge>,

    /// Undone edges (the first one is redone first)
    pub undone: Vec<DebtEdge>,
}

/// Parse a whole, strictly positive amount from user text
pub fn parse_amount(text: &str) -> Result<i64> {
    let trimmed = text.trim();
    let amount: i64 = trimmed
        .parse()
        .map_err(|_| Error::InvalidTransaction(format!("invalid amount '{}'", trimmed)))?;

    if amount <= 0 {
        return Err(Error::InvalidTransaction(format!(
            "amount must be positive, got {}",
            amount
        )));
    }

    Ok(amount)
}

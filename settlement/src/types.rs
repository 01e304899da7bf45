//! Core types for settlement engine

use ledger_core::ParticipantId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment instruction: `payer` pays `amount` to `payee`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Net debtor
    pub payer: ParticipantId,

    /// Net creditor
    pub payee: ParticipantId,

    /// Amount to transfer (always > 0)
    pub amount: u64,
}

impl fmt::Display for Payment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} pays {} to {}", self.payer, self.amount, self.payee)
    }
}

/// Ordered payments plus netting statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementPlan {
    /// Payments in the order the greedy pass emitted them
    pub payments: Vec<Payment>,

    /// Statistics
    pub stats: NettingStats,
}

impl SettlementPlan {
    /// True when nothing needs to move
    pub fn is_settled(&self) -> bool {
        self.payments.is_empty()
    }
}

/// Netting statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NettingStats {
    /// Registered participants
    pub participant_count: usize,

    /// Participants with a non-zero balance
    pub unsettled_count: usize,

    /// Debt edges in the graph
    pub gross_edge_count: usize,

    /// Sum of all debt edges
    pub gross_total: i128,

    /// Payments in the plan
    pub net_transfer_count: usize,

    /// Sum of all payments
    pub net_total: u128,

    /// Amount no longer moved thanks to netting
    pub amount_saved: i128,

    /// Netting efficiency (0.0 - 1.0)
    pub efficiency: f64,

    /// Transfers eliminated
    pub transfers_eliminated: usize,
}

//! Greedy minimum cash-flow netting
//!
//! Turns net balances into a short list of payments that zeroes them.
//!
//! # Algorithm
//!
//! 1. Split participants into creditors (balance > 0) and debtors (< 0)
//! 2. Put each side in a max-heap keyed by |balance|
//! 3. Pop the largest creditor and the largest debtor, move
//!    `min(credit, debt)` from debtor to creditor, push back any remainder
//! 4. Stop when either heap is empty (both empty, since balances sum to zero)
//!
//! Every step closes at least one position, so `n` open positions give at
//! most `n - 1` payments. This is a heuristic; it does not always find the
//! fewest possible payments.
//!
//! # Example
//!
//! ```text
//! Debts:
//!   A owes B: 100
//!   B owes C: 50
//!
//! Net positions:
//!   A: -100 (debtor)
//!   B:  +50 (creditor)
//!   C:  +50 (creditor)
//!
//! Payments (B wins the tie, registered first):
//!   A pays 50 to B
//!   A pays 50 to C
//! ```

use crate::{
    config::{NettingConfig, TieBreak},
    heap::{ranks, Position, PositionQueue},
    types::*,
    Error, Result,
};
use ledger_core::{BalanceSheet, LedgerSnapshot};

/// Netting engine
#[derive(Debug, Clone)]
pub struct NettingEngine {
    /// Tie-break among equal magnitudes
    tie_break: TieBreak,

    /// Check each plan against its input
    verify_plan: bool,
}

impl NettingEngine {
    /// Create new netting engine
    pub fn new(tie_break: TieBreak, verify_plan: bool) -> Self {
        Self {
            tie_break,
            verify_plan,
        }
    }

    /// Create from configuration
    pub fn from_config(config: &NettingConfig) -> Self {
        Self::new(config.tie_break, config.verify_plan)
    }

    /// Compute the payment list for a set of balances
    ///
    /// Works on a private copy; `balances` is never modified.
    pub fn settle(&self, balances: &BalanceSheet) -> Result<Vec<Payment>> {
        if balances.total() != 0 {
            return Err(Error::Netting(format!(
                "balances sum to {}, expected 0",
                balances.total()
            )));
        }

        let ranks = ranks(balances, self.tie_break);
        let mut creditors = PositionQueue::new();
        let mut debtors = PositionQueue::new();

        for ((participant, balance), rank) in balances.iter().zip(ranks) {
            let position = Position {
                participant: participant.clone(),
                magnitude: balance.unsigned_abs(),
                rank,
            };
            if *balance > 0 {
                creditors.push(position);
            } else if *balance < 0 {
                debtors.push(position);
            }
        }

        let mut payments = Vec::with_capacity(creditors.len() + debtors.len());

        while !creditors.is_empty() && !debtors.is_empty() {
            let (Some(mut creditor), Some(mut debtor)) = (creditors.pop(), debtors.pop()) else {
                break;
            };
            let settle = creditor.magnitude.min(debtor.magnitude);

            payments.push(Payment {
                payer: debtor.participant.clone(),
                payee: creditor.participant.clone(),
                amount: settle,
            });

            creditor.magnitude -= settle;
            debtor.magnitude -= settle;
            creditors.push(creditor);
            debtors.push(debtor);
        }

        if !creditors.is_empty() || !debtors.is_empty() {
            return Err(Error::Netting(format!(
                "{} creditors and {} debtors left open",
                creditors.len(),
                debtors.len()
            )));
        }

        if self.verify_plan {
            verify_payments(balances, &payments)?;
        }

        Ok(payments)
    }

    /// Compute payments and statistics for a ledger snapshot
    pub fn compute_plan(&self, snapshot: &LedgerSnapshot) -> Result<SettlementPlan> {
        let payments = self.settle(&snapshot.balances)?;

        let net_total: u128 = payments.iter().map(|p| p.amount as u128).sum();
        let gross_total = snapshot.gross_total;

        let efficiency = if gross_total > 0 {
            1.0 - (net_total as f64 / gross_total as f64)
        } else {
            0.0
        };

        let stats = NettingStats {
            participant_count: snapshot.balances.len(),
            unsettled_count: snapshot.balances.non_zero_count(),
            gross_edge_count: snapshot.edge_count,
            gross_total,
            net_transfer_count: payments.len(),
            net_total,
            amount_saved: gross_total - net_total as i128,
            efficiency,
            transfers_eliminated: snapshot.edge_count.saturating_sub(payments.len()),
        };

        Ok(SettlementPlan { payments, stats })
    }
}

impl Default for NettingEngine {
    fn default() -> Self {
        Self::from_config(&NettingConfig::default())
    }
}

/// Apply `payments` to a copy of `balances` and check every balance is zero
pub fn verify_payments(balances: &BalanceSheet, payments: &[Payment]) -> Result<()> {
    let mut remaining: Vec<(&str, i128)> = balances
        .iter()
        .map(|(p, b)| (p.as_str(), *b as i128))
        .collect();

    for payment in payments {
        if payment.amount == 0 {
            return Err(Error::Netting(format!("zero payment: {}", payment)));
        }
        for (who, delta) in [
            (payment.payer.as_str(), payment.amount as i128),
            (payment.payee.as_str(), -(payment.amount as i128)),
        ] {
            let slot = remaining
                .iter_mut()
                .find(|(p, _)| *p == who)
                .ok_or_else(|| Error::Netting(format!("unknown participant in plan: {}", who)))?;
            slot.1 += delta;
        }
    }

    if let Some((who, left)) = remaining.iter().find(|(_, b)| *b != 0) {
        return Err(Error::Netting(format!(
            "{} left with balance {} after settlement",
            who, left
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::ParticipantId;

    fn sheet(entries: &[(&str, i64)]) -> BalanceSheet {
        BalanceSheet::new(
            entries
                .iter()
                .map(|(n, b)| (ParticipantId::new(*n), *b))
                .collect(),
        )
    }

    fn describe(payments: &[Payment]) -> Vec<String> {
        payments.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_chain_scenario() {
        let engine = NettingEngine::default();
        let payments = engine
            .settle(&sheet(&[("A", -100), ("B", 50), ("C", 50)]))
            .unwrap();

        assert_eq!(describe(&payments), vec!["A pays 50 to B", "A pays 50 to C"]);
    }

    #[test]
    fn test_tie_break_by_name() {
        let balances = sheet(&[("A", -100), ("C", 50), ("B", 50)]);

        let by_registration = NettingEngine::new(TieBreak::RegistrationOrder, true);
        assert_eq!(
            describe(&by_registration.settle(&balances).unwrap()),
            vec!["A pays 50 to C", "A pays 50 to B"]
        );

        let by_name = NettingEngine::new(TieBreak::Name, true);
        assert_eq!(
            describe(&by_name.settle(&balances).unwrap()),
            vec!["A pays 50 to B", "A pays 50 to C"]
        );
    }

    #[test]
    fn test_largest_first() {
        let engine = NettingEngine::default();
        let payments = engine
            .settle(&sheet(&[("A", -30), ("B", -70), ("C", 60), ("D", 40)]))
            .unwrap();

        // B(70)→C(60); A(30)→D(40); B(10)→D(10)
        assert_eq!(
            describe(&payments),
            vec!["B pays 60 to C", "A pays 30 to D", "B pays 10 to D"]
        );
    }

    #[test]
    fn test_all_zero() {
        let engine = NettingEngine::default();
        assert!(engine.settle(&sheet(&[("A", 0), ("B", 0)])).unwrap().is_empty());
        assert!(engine.settle(&BalanceSheet::default()).unwrap().is_empty());
    }

    #[test]
    fn test_unbalanced_input_rejected() {
        let engine = NettingEngine::default();
        let err = engine.settle(&sheet(&[("A", -10), ("B", 5)])).unwrap_err();
        assert!(matches!(err, Error::Netting(_)));
    }

    #[test]
    fn test_extreme_balances() {
        let engine = NettingEngine::default();
        let payments = engine
            .settle(&sheet(&[("A", i64::MIN + 1), ("B", i64::MAX)]))
            .unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].amount, i64::MAX as u64);
    }

    #[test]
    fn test_compute_plan_stats() {
        let engine = NettingEngine::default();
        let snapshot = LedgerSnapshot {
            balances: sheet(&[("A", -50), ("B", 20), ("C", 30)]),
            edge_count: 3,
            gross_total: 230,
        };

        let plan = engine.compute_plan(&snapshot).unwrap();
        assert_eq!(plan.stats.net_transfer_count, 2);
        assert_eq!(plan.stats.net_total, 50);
        assert_eq!(plan.stats.amount_saved, 180);
        assert_eq!(plan.stats.transfers_eliminated, 1);
        assert_eq!(plan.stats.unsettled_count, 3);
        assert!((plan.stats.efficiency - 0.782).abs() < 0.01);
    }

    #[test]
    fn test_verify_payments_detects_bad_plan() {
        let balances = sheet(&[("A", -10), ("B", 10)]);
        let short = vec![Payment {
            payer: ParticipantId::new("A"),
            payee: ParticipantId::new("B"),
            amount: 5,
        }];
        assert!(verify_payments(&balances, &short).is_err());

        let stranger = vec![Payment {
            payer: ParticipantId::new("A"),
            payee: ParticipantId::new("Z"),
            amount: 10,
        }];
        assert!(verify_payments(&balances, &stranger).is_err());
    }
}

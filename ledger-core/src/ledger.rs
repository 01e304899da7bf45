//! Main ledger orchestration layer
//!
//! This module ties together the participant registry, the debt graph and the
//! transaction log into the single state object callers mutate.
//!
//! # Example
//!
//! ```
//! use ledger_core::{Config, Ledger};
//!
//! let mut ledger = Ledger::new(Config::default());
//! ledger.add_participant("A");
//! ledger.add_participant("B");
//!
//! ledger.record_transaction("A", "B", 100)?;
//! assert_eq!(ledger.balance("A")?, -100);
//!
//! ledger.undo()?;
//! assert_eq!(ledger.balance("A")?, 0);
//! # Ok::<(), ledger_core::Error>(())
//! ```

use crate::{
    config::SelfTransactionPolicy,
    graph::DebtGraph,
    history::TransactionLog,
    metrics::Metrics,
    registry::ParticipantRegistry,
    types::{
        parse_amount, BalanceSheet, DebtEdge, EdgeId, HistoryView, LedgerSnapshot, Participant,
        ParticipantId,
    },
    Config, Error, Result,
};
use chrono::Utc;

/// Main ledger interface
///
/// Every mutating method either completes or returns an error with the
/// ledger unchanged.
#[derive(Debug)]
pub struct Ledger {
    /// Participants and balances
    registry: ParticipantRegistry,

    /// Outgoing edges per debtor
    graph: DebtGraph,

    /// Undo/redo history
    log: TransactionLog,

    /// Next edge ID to hand out
    next_edge_id: u64,

    /// Metrics (if enabled)
    metrics: Option<Metrics>,

    /// Configuration
    config: Config,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new(config: Config) -> Self {
        Self {
            registry: ParticipantRegistry::new(),
            graph: DebtGraph::new(),
            log: TransactionLog::new(),
            next_edge_id: 1,
            metrics: None,
            config,
        }
    }

    /// Attach a metrics collector
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        metrics.participants.set(self.registry.len() as i64);
        self.metrics = Some(metrics);
        self
    }

    /// Register a participant
    ///
    /// Returns `false` (and changes nothing) if the trimmed name is empty or
    /// already registered.
    pub fn add_participant(&mut self, name: &str) -> bool {
        match self.registry.register(name) {
            Some(id) => {
                tracing::info!(participant = %id, "Added participant");
                self.graph.add_node(id);
                if let Some(metrics) = &self.metrics {
                    metrics.record_participant();
                }
                true
            }
            None => {
                tracing::debug!(name, "Ignored empty or duplicate participant");
                false
            }
        }
    }

    /// Record that `from` owes `to` the given amount
    pub fn record_transaction(&mut self, from: &str, to: &str, amount: i64) -> Result<DebtEdge> {
        let result = self.apply_new_edge(from.trim(), to.trim(), amount);
        self.observe_record(&result);
        result
    }

    /// Like [`Ledger::record_transaction`], parsing the amount from user text
    pub fn record_transaction_text(
        &mut self,
        from: &str,
        to: &str,
        amount: &str,
    ) -> Result<DebtEdge> {
        let result =
            parse_amount(amount).and_then(|amount| self.apply_new_edge(from.trim(), to.trim(), amount));
        self.observe_record(&result);
        result
    }

    /// Reverse the most recently applied transaction
    pub fn undo(&mut self) -> Result<DebtEdge> {
        let edge = self.log.last_applied().cloned().ok_or(Error::NothingToUndo)?;

        self.registry.shift(&edge.to, &edge.from, edge.amount)?;
        if self.graph.remove(&edge.from, edge.id).is_none() {
            self.registry.shift(&edge.from, &edge.to, edge.amount)?;
            return Err(Error::InvariantViolation(format!(
                "edge {} missing from graph",
                edge.id
            )));
        }
        self.log.step_back();

        tracing::info!(edge = %edge.id, from = %edge.from, to = %edge.to, amount = edge.amount, "Undid transaction");
        if let Some(metrics) = &self.metrics {
            metrics.record_undo();
        }
        self.update_history_gauges();
        Ok(edge)
    }

    /// Re-apply the most recently undone transaction
    pub fn redo(&mut self) -> Result<DebtEdge> {
        let edge = self.log.next_undone().cloned().ok_or(Error::NothingToRedo)?;

        self.registry.shift(&edge.from, &edge.to, edge.amount)?;
        if let Err(e) = self.graph.insert(edge.clone()) {
            self.registry.shift(&edge.to, &edge.from, edge.amount)?;
            return Err(e);
        }
        self.log.step_forward();

        tracing::info!(edge = %edge.id, from = %edge.from, to = %edge.to, amount = edge.amount, "Redid transaction");
        if let Some(metrics) = &self.metrics {
            metrics.record_redo();
        }
        self.update_history_gauges();
        Ok(edge)
    }

    /// Current balance of a registered participant
    pub fn balance(&self, name: &str) -> Result<i64> {
        self.registry.balance(name)
    }

    /// All balances in registration order
    pub fn balances(&self) -> BalanceSheet {
        self.registry.balances()
    }

    /// Balances plus graph totals, for settlement
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            balances: self.registry.balances(),
            edge_count: self.graph.edge_count(),
            gross_total: self.graph.gross_total(),
        }
    }

    /// Applied and undone edges
    pub fn history(&self) -> HistoryView {
        self.log.view()
    }

    /// Whether [`Ledger::undo`] would succeed
    pub fn can_undo(&self) -> bool {
        self.log.can_undo()
    }

    /// Whether [`Ledger::redo`] would succeed
    pub fn can_redo(&self) -> bool {
        self.log.can_redo()
    }

    /// Outgoing edges of a participant, oldest first
    pub fn edges_from(&self, name: &str) -> &[DebtEdge] {
        self.graph.edges_from(name)
    }

    /// Participants in registration order
    pub fn participants(&self) -> &[Participant] {
        self.registry.participants()
    }

    /// The debt graph
    pub fn graph(&self) -> &DebtGraph {
        &self.graph
    }

    /// Configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Verify zero-sum and that every balance matches the graph
    pub fn check_invariants(&self) -> Result<()> {
        let sheet = self.registry.balances();
        if sheet.total() != 0 {
            return Err(Error::InvariantViolation(format!(
                "balances sum to {}",
                sheet.total()
            )));
        }

        let positions = self.graph.net_positions();
        for (id, balance) in sheet.iter() {
            let derived = positions.get(id).copied().unwrap_or(0);
            if derived != *balance as i128 {
                return Err(Error::InvariantViolation(format!(
                    "{} has balance {} but graph implies {}",
                    id, balance, derived
                )));
            }
        }

        if self.graph.edge_count() != self.log.applied().len() {
            return Err(Error::InvariantViolation(format!(
                "graph has {} edges, log has {} applied",
                self.graph.edge_count(),
                self.log.applied().len()
            )));
        }

        Ok(())
    }

    fn apply_new_edge(&mut self, from: &str, to: &str, amount: i64) -> Result<DebtEdge> {
        if amount <= 0 {
            return Err(Error::InvalidTransaction(format!(
                "amount must be positive, got {}",
                amount
            )));
        }
        for name in [from, to] {
            if !self.registry.contains(name) {
                return Err(Error::InvalidTransaction(format!(
                    "unknown participant '{}'",
                    name
                )));
            }
        }
        if from == to && self.config.self_transactions == SelfTransactionPolicy::Reject {
            return Err(Error::InvalidTransaction(format!(
                "'{}' cannot owe themselves",
                from
            )));
        }

        let edge = DebtEdge {
            id: EdgeId(self.next_edge_id),
            from: ParticipantId::new(from),
            to: ParticipantId::new(to),
            amount,
            recorded_at: Utc::now(),
        };

        self.registry.shift(&edge.from, &edge.to, amount)?;
        if let Err(e) = self.graph.insert(edge.clone()) {
            self.registry.shift(&edge.to, &edge.from, amount)?;
            return Err(e);
        }

        let discarded = self.log.record(edge.clone());
        self.next_edge_id += 1;

        tracing::info!(edge = %edge.id, from, to, amount, "Recorded transaction");
        if discarded > 0 {
            tracing::debug!(discarded, "Discarded redo history");
        }
        Ok(edge)
    }

    fn observe_record(&self, result: &Result<DebtEdge>) {
        match result {
            Ok(_) => {
                if let Some(metrics) = &self.metrics {
                    metrics.record_transaction();
                }
                self.update_history_gauges();
            }
            Err(e) => {
                tracing::warn!("Rejected transaction: {}", e);
                if let Some(metrics) = &self.metrics {
                    metrics.record_rejection();
                }
            }
        }
    }

    fn update_history_gauges(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.update_history(self.log.applied().len(), self.log.undone().len());
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with(names: &[&str]) -> Ledger {
        let mut ledger = Ledger::default();
        for name in names {
            assert!(ledger.add_participant(name));
        }
        ledger
    }

    #[test]
    fn test_scenario_balances() {
        let mut ledger = ledger_with(&["A", "B", "C"]);
        ledger.record_transaction("A", "B", 100).unwrap();
        ledger.record_transaction("B", "C", 50).unwrap();

        assert_eq!(ledger.balance("A").unwrap(), -100);
        assert_eq!(ledger.balance("B").unwrap(), 50);
        assert_eq!(ledger.balance("C").unwrap(), 50);
        ledger.check_invariants().unwrap();
    }

    #[test]
    fn test_rejections_leave_state_unchanged() {
        let mut ledger = ledger_with(&["A", "B"]);
        ledger.record_transaction("A", "B", 10).unwrap();
        let before = ledger.snapshot();

        for (from, to, amount) in [("X", "Y", 10), ("A", "Y", 10), ("A", "B", -5), ("A", "B", 0)] {
            assert!(matches!(
                ledger.record_transaction(from, to, amount),
                Err(Error::InvalidTransaction(_))
            ));
        }
        assert!(matches!(
            ledger.record_transaction_text("A", "B", "ten"),
            Err(Error::InvalidTransaction(_))
        ));

        assert_eq!(ledger.snapshot(), before);
        assert_eq!(ledger.history().applied.len(), 1);
    }

    #[test]
    fn test_record_transaction_text() {
        let mut ledger = ledger_with(&["A", "B"]);
        let edge = ledger.record_transaction_text(" A ", "B", " 25 ").unwrap();
        assert_eq!(edge.amount, 25);
        assert_eq!(edge.from.as_str(), "A");
        assert_eq!(ledger.balance("B").unwrap(), 25);
    }

    #[test]
    fn test_undo_redo_empty() {
        let mut ledger = ledger_with(&["A"]);
        assert_eq!(ledger.undo(), Err(Error::NothingToUndo));
        assert_eq!(ledger.redo(), Err(Error::NothingToRedo));
    }

    #[test]
    fn test_undo_then_redo() {
        let mut ledger = ledger_with(&["A", "B"]);
        let before_balances = ledger.balances();
        let before_graph = ledger.graph().clone();

        let edge = ledger.record_transaction("A", "B", 40).unwrap();
        let after_balances = ledger.balances();
        let after_graph = ledger.graph().clone();

        assert_eq!(ledger.undo().unwrap(), edge);
        assert_eq!(ledger.balances(), before_balances);
        assert_eq!(ledger.graph(), &before_graph);

        assert_eq!(ledger.redo().unwrap(), edge);
        assert_eq!(ledger.balances(), after_balances);
        assert_eq!(ledger.graph(), &after_graph);
        ledger.check_invariants().unwrap();
    }

    #[test]
    fn test_new_transaction_invalidates_redo() {
        let mut ledger = ledger_with(&["A", "B"]);
        ledger.record_transaction("A", "B", 10).unwrap();
        ledger.undo().unwrap();
        assert!(ledger.can_redo());

        ledger.record_transaction("B", "A", 5).unwrap();
        assert!(!ledger.can_redo());
        assert_eq!(ledger.redo(), Err(Error::NothingToRedo));
    }

    #[test]
    fn test_undo_removes_most_recent_duplicate() {
        let mut ledger = ledger_with(&["A", "B", "C"]);
        let first = ledger.record_transaction("A", "B", 10).unwrap();
        ledger.record_transaction("A", "C", 7).unwrap();
        let second = ledger.record_transaction("A", "B", 10).unwrap();

        let undone = ledger.undo().unwrap();
        assert_eq!(undone.id, second.id);

        let ids: Vec<_> = ledger.edges_from("A").iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![first.id, EdgeId(2)]);

        // redo re-appends at the end with the same id
        ledger.redo().unwrap();
        let last = ledger.edges_from("A").last().unwrap();
        assert_eq!(last.id, second.id);
    }

    #[test]
    fn test_self_transaction_policy() {
        let mut ledger = ledger_with(&["A"]);

        let edge = ledger.record_transaction("A", "A", 10).unwrap();
        assert!(edge.is_self_loop());
        assert_eq!(ledger.balance("A").unwrap(), 0);
        assert_eq!(ledger.snapshot().edge_count, 1);
        assert!(ledger.can_undo());
        ledger.check_invariants().unwrap();

        assert_eq!(ledger.undo().unwrap(), edge);
        assert_eq!(ledger.snapshot().edge_count, 0);
        assert_eq!(ledger.balance("A").unwrap(), 0);

        let mut config = Config::default();
        config.self_transactions = SelfTransactionPolicy::Reject;
        let mut ledger = Ledger::new(config);
        ledger.add_participant("A");
        assert!(matches!(
            ledger.record_transaction("A", "A", 10),
            Err(Error::InvalidTransaction(_))
        ));
        assert!(!ledger.can_undo());
    }

    #[test]
    fn test_overflow_rejected_atomically() {
        let mut ledger = ledger_with(&["A", "B"]);
        ledger.record_transaction("A", "B", i64::MAX).unwrap();
        let before = ledger.snapshot();

        assert!(matches!(
            ledger.record_transaction("A", "B", 1),
            Err(Error::BalanceOverflow(_))
        ));
        assert_eq!(ledger.snapshot(), before);
        assert_eq!(ledger.history().applied.len(), 1);
    }

    #[test]
    fn test_metrics_track_operations() {
        let metrics = Metrics::new().unwrap();
        let mut ledger = Ledger::default().with_metrics(metrics.clone());
        ledger.add_participant("A");
        ledger.add_participant("B");
        ledger.add_participant("B");

        ledger.record_transaction("A", "B", 5).unwrap();
        let _ = ledger.record_transaction("A", "Z", 5);
        ledger.undo().unwrap();
        ledger.redo().unwrap();

        assert_eq!(metrics.participants.get(), 2);
        assert_eq!(metrics.transactions_recorded.get(), 1);
        assert_eq!(metrics.transactions_rejected.get(), 1);
        assert_eq!(metrics.undo_total.get(), 1);
        assert_eq!(metrics.redo_total.get(), 1);
        assert_eq!(metrics.history_applied.get(), 1);
        assert_eq!(metrics.history_undone.get(), 0);
    }

    #[test]
    fn test_unknown_balance() {
        let ledger = Ledger::default();
        assert!(matches!(ledger.balance("nobody"), Err(Error::UnknownParticipant(_))));
    }
}

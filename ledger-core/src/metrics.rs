//! Metrics collection for observability
//!
//! This module provides Prometheus metrics for monitoring the ledger.
//!
//! # Metrics
//!
//! - `ledger_participants` - Registered participants
//! - `ledger_transactions_recorded_total` - Accepted transactions
//! - `ledger_transactions_rejected_total` - Rejected transactions
//! - `ledger_undo_total` / `ledger_redo_total` - Successful history moves
//! - `ledger_history_applied` / `ledger_history_undone` - Current log depth
//!
//! Each collector owns a private [`Registry`], so several ledgers (and tests)
//! can coexist in one process.

use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use std::sync::Arc;

/// Metrics collector
#[derive(Clone, Debug)]
pub struct Metrics {
    /// Registered participants
    pub participants: IntGauge,

    /// Accepted transactions
    pub transactions_recorded: IntCounter,

    /// Rejected transactions
    pub transactions_rejected: IntCounter,

    /// Successful undos
    pub undo_total: IntCounter,

    /// Successful redos
    pub redo_total: IntCounter,

    /// Applied edges in the log
    pub history_applied: IntGauge,

    /// Undone edges in the log
    pub history_undone: IntGauge,

    /// Prometheus registry
    registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let participants = IntGauge::new("ledger_participants", "Registered participants")?;
        registry.register(Box::new(participants.clone()))?;

        let transactions_recorded = IntCounter::new(
            "ledger_transactions_recorded_total",
            "Total number of accepted transactions",
        )?;
        registry.register(Box::new(transactions_recorded.clone()))?;

        let transactions_rejected = IntCounter::new(
            "ledger_transactions_rejected_total",
            "Total number of rejected transactions",
        )?;
        registry.register(Box::new(transactions_rejected.clone()))?;

        let undo_total = IntCounter::new("ledger_undo_total", "Successful undo operations")?;
        registry.register(Box::new(undo_total.clone()))?;

        let redo_total = IntCounter::new("ledger_redo_total", "Successful redo operations")?;
        registry.register(Box::new(redo_total.clone()))?;

        let history_applied =
            IntGauge::new("ledger_history_applied", "Applied edges in the transaction log")?;
        registry.register(Box::new(history_applied.clone()))?;

        let history_undone =
            IntGauge::new("ledger_history_undone", "Undone edges in the transaction log")?;
        registry.register(Box::new(history_undone.clone()))?;

        Ok(Self {
            participants,
            transactions_recorded,
            transactions_rejected,
            undo_total,
            redo_total,
            history_applied,
            history_undone,
            registry,
        })
    }

    /// Record a new participant
    pub fn record_participant(&self) {
        self.participants.inc();
    }

    /// Record an accepted transaction
    pub fn record_transaction(&self) {
        self.transactions_recorded.inc();
    }

    /// Record a rejected transaction
    pub fn record_rejection(&self) {
        self.transactions_rejected.inc();
    }

    /// Record an undo
    pub fn record_undo(&self) {
        self.undo_total.inc();
    }

    /// Record a redo
    pub fn record_redo(&self) {
        self.redo_total.inc();
    }

    /// Update log depth gauges
    pub fn update_history(&self, applied: usize, undone: usize) {
        self.history_applied.set(applied as i64);
        self.history_undone.set(undone as i64);
    }

    /// Render all metrics in the Prometheus text format
    pub fn render(&self) -> String {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buffer) {
            tracing::warn!("Failed to encode metrics: {}", e);
            return String::new();
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

//! Main settlement engine
//!
//! Reads a snapshot through the ledger actor and runs netting on it. The
//! ledger is never mutated from here.

use crate::{config::Config, netting::NettingEngine, types::*, Result};
use ledger_core::LedgerHandle;

/// Settlement engine
#[derive(Debug)]
pub struct SettlementEngine {
    /// Ledger actor handle
    ledger: LedgerHandle,

    /// Netting engine
    netting: NettingEngine,
}

impl SettlementEngine {
    /// Create new settlement engine
    pub fn new(ledger: LedgerHandle, config: Config) -> Self {
        Self {
            ledger,
            netting: NettingEngine::from_config(&config.netting),
        }
    }

    /// Compute a settlement plan for the ledger's current balances
    pub async fn run_settlement(&self) -> Result<SettlementPlan> {
        tracing::info!("Starting settlement run");

        let snapshot = self.ledger.snapshot().await?;
        tracing::debug!(
            participants = snapshot.balances.len(),
            edges = snapshot.edge_count,
            "Took ledger snapshot"
        );

        let plan = self.netting.compute_plan(&snapshot)?;

        tracing::info!(
            "Netting complete: {} edges → {} payments ({} gross → {} net, {:.1}% efficiency)",
            plan.stats.gross_edge_count,
            plan.stats.net_transfer_count,
            plan.stats.gross_total,
            plan.stats.net_total,
            plan.stats.efficiency * 100.0
        );

        Ok(plan)
    }
}

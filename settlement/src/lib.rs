//! Settlement Engine
//!
//! Computes a short list of payments that clears every net balance in the
//! ledger.
//!
//! # Architecture
//!
//! 1. **Snapshot**: read balances and graph totals through the ledger actor
//! 2. **Netting**: greedy two-heap matching of largest creditor and debtor
//! 3. **Verification**: optionally re-apply the plan and check it zeroes
//!    every balance
//!
//! Settlement is read-only with respect to the ledger; running it twice
//! without intervening mutations yields the same plan.
//!
//! # Example
//!
//! ```no_run
//! use ledger_core::{spawn_ledger_actor, Ledger};
//! use settlement::{Config, SettlementEngine};
//!
//! #[tokio::main]
//! async fn main() -> settlement::Result<()> {
//!     let ledger = spawn_ledger_actor(Ledger::default());
//!     ledger.add_participant("A").await?;
//!     ledger.add_participant("B").await?;
//!     ledger.record_transaction("A", "B", 100).await?;
//!
//!     let engine = SettlementEngine::new(ledger, Config::default());
//!     let plan = engine.run_settlement().await?;
//!     for payment in &plan.payments {
//!         println!("{}", payment);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod heap;
pub mod netting;
pub mod error;
pub mod config;
pub mod engine;

// Re-exports
pub use error::{Error, Result};
pub use types::*;
pub use config::{Config, NettingConfig, TieBreak};
pub use engine::SettlementEngine;
pub use netting::{verify_payments, NettingEngine};

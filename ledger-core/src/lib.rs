//! Cashflow Ledger Core
//!
//! Participants, pairwise debts and an undo/redo transaction log.
//!
//! # Architecture
//!
//! - **Registry**: participants in registration order with net balances
//! - **Debt Graph**: outgoing debt edges per debtor
//! - **Transaction Log**: append-only edges with an undo/redo cursor
//! - **Single Writer**: one actor task owns the ledger for concurrent callers
//!
//! # Invariants
//!
//! - Money conservation: Σ(balances) == 0 after every operation
//! - Graph consistency: each balance equals incoming minus outgoing edges
//! - Atomicity: failed operations change nothing
//! - Linear history: recording a transaction discards the redo branch

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod registry;
pub mod graph;
pub mod history;
pub mod ledger;
pub mod error;
pub mod actor;
pub mod config;
pub mod metrics;

// Re-exports
pub use error::{Error, Result};
pub use types::{
    parse_amount, BalanceSheet, DebtEdge, EdgeId, HistoryView, LedgerSnapshot, Participant,
    ParticipantId,
};
pub use ledger::Ledger;
pub use actor::{spawn_ledger_actor, LedgerHandle};
pub use config::{Config, SelfTransactionPolicy};
pub use metrics::Metrics;

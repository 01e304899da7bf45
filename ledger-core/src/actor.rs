//! Actor-based concurrency for the ledger
//!
//! This module implements the single-writer pattern using Tokio actors:
//! - One task owns the [`Ledger`]; nothing else can touch it
//! - Every request is handled to completion before the next one starts
//! - Bounded mailbox gives backpressure
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │          Callers (CLI, settlement engine, ...)        │
//! └─────────────────────┬────────────────────────────────┘
//!                       │
//!                       ▼
//! ┌──────────────────────────────────────────────────────┐
//! │               LedgerHandle (Clone)                    │
//! │         Sends messages to actor mailbox              │
//! └─────────────────────┬────────────────────────────────┘
//!                       │
//!                       │ mpsc::channel (bounded)
//!                       ▼
//! ┌──────────────────────────────────────────────────────┐
//! │              LedgerActor (Single Task)                │
//! │   add / record / undo / redo / snapshot / history    │
//! │         replies through a oneshot channel            │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! Because mutations and snapshots share one mailbox, a settlement run can
//! never observe a half-applied transaction.

use crate::types::{BalanceSheet, DebtEdge, HistoryView, LedgerSnapshot};
use crate::{Error, Ledger, Result};
use tokio::sync::{mpsc, oneshot};

/// Message sent to the ledger actor
///
/// Each request carries a `response` sender for its reply.
#[derive(Debug)]
#[allow(missing_docs)]
pub enum LedgerMessage {
    /// Register a participant
    AddParticipant {
        name: String,
        response: oneshot::Sender<bool>,
    },

    /// Record a transaction
    RecordTransaction {
        from: String,
        to: String,
        amount: i64,
        response: oneshot::Sender<Result<DebtEdge>>,
    },

    /// Record a transaction with the amount still as text
    RecordTransactionText {
        from: String,
        to: String,
        amount: String,
        response: oneshot::Sender<Result<DebtEdge>>,
    },

    /// Undo the last transaction
    Undo {
        response: oneshot::Sender<Result<DebtEdge>>,
    },

    /// Redo the last undone transaction
    Redo {
        response: oneshot::Sender<Result<DebtEdge>>,
    },

    /// Get a single balance
    GetBalance {
        name: String,
        response: oneshot::Sender<Result<i64>>,
    },

    /// Get all balances
    GetBalances {
        response: oneshot::Sender<BalanceSheet>,
    },

    /// Get balances and graph totals
    Snapshot {
        response: oneshot::Sender<LedgerSnapshot>,
    },

    /// Get the transaction history
    GetHistory {
        response: oneshot::Sender<HistoryView>,
    },

    /// Verify ledger invariants
    CheckInvariants {
        response: oneshot::Sender<Result<()>>,
    },

    /// Shutdown actor
    Shutdown,
}

/// Actor that owns the ledger and processes messages
#[derive(Debug)]
pub struct LedgerActor {
    /// The ledger state
    ledger: Ledger,

    /// Mailbox for incoming messages
    mailbox: mpsc::Receiver<LedgerMessage>,
}

impl LedgerActor {
    /// Create new actor
    pub fn new(ledger: Ledger, mailbox: mpsc::Receiver<LedgerMessage>) -> Self {
        Self { ledger, mailbox }
    }

    /// Run the actor event loop until shutdown or until every handle is dropped
    pub async fn run(mut self) -> Ledger {
        while let Some(msg) = self.mailbox.recv().await {
            if let LedgerMessage::Shutdown = msg {
                tracing::debug!("Ledger actor shutting down");
                break;
            }
            self.handle_message(msg);
        }
        self.ledger
    }

    /// Handle a single message
    fn handle_message(&mut self, msg: LedgerMessage) {
        // A dropped receiver only means the caller stopped waiting.
        match msg {
            LedgerMessage::AddParticipant { name, response } => {
                let _ = response.send(self.ledger.add_participant(&name));
            }

            LedgerMessage::RecordTransaction {
                from,
                to,
                amount,
                response,
            } => {
                let _ = response.send(self.ledger.record_transaction(&from, &to, amount));
            }

            LedgerMessage::RecordTransactionText {
                from,
                to,
                amount,
                response,
            } => {
                let _ = response.send(self.ledger.record_transaction_text(&from, &to, &amount));
            }

            LedgerMessage::Undo { response } => {
                let _ = response.send(self.ledger.undo());
            }

            LedgerMessage::Redo { response } => {
                let _ = response.send(self.ledger.redo());
            }

            LedgerMessage::GetBalance { name, response } => {
                let _ = response.send(self.ledger.balance(&name));
            }

            LedgerMessage::GetBalances { response } => {
                let _ = response.send(self.ledger.balances());
            }

            LedgerMessage::Snapshot { response } => {
                let _ = response.send(self.ledger.snapshot());
            }

            LedgerMessage::GetHistory { response } => {
                let _ = response.send(self.ledger.history());
            }

            LedgerMessage::CheckInvariants { response } => {
                let _ = response.send(self.ledger.check_invariants());
            }

            LedgerMessage::Shutdown => {
                // Handled in main loop
            }
        }
    }
}

/// Handle for sending messages to the actor
#[derive(Clone, Debug)]
pub struct LedgerHandle {
    sender: mpsc::Sender<LedgerMessage>,
}

impl LedgerHandle {
    /// Create new handle
    pub fn new(sender: mpsc::Sender<LedgerMessage>) -> Self {
        Self { sender }
    }

    /// Register a participant
    pub async fn add_participant(&self, name: impl Into<String>) -> Result<bool> {
        let name = name.into();
        self.request(|response| LedgerMessage::AddParticipant { name, response })
            .await
    }

    /// Record a transaction
    pub async fn record_transaction(
        &self,
        from: impl Into<String>,
        to: impl Into<String>,
        amount: i64,
    ) -> Result<DebtEdge> {
        let (from, to) = (from.into(), to.into());
        self.request(|response| LedgerMessage::RecordTransaction {
            from,
            to,
            amount,
            response,
        })
        .await?
    }

    /// Record a transaction, parsing the amount inside the actor
    pub async fn record_transaction_text(
        &self,
        from: impl Into<String>,
        to: impl Into<String>,
        amount: impl Into<String>,
    ) -> Result<DebtEdge> {
        let (from, to, amount) = (from.into(), to.into(), amount.into());
        self.request(|response| LedgerMessage::RecordTransactionText {
            from,
            to,
            amount,
            response,
        })
        .await?
    }

    /// Undo the last transaction
    pub async fn undo(&self) -> Result<DebtEdge> {
        self.request(|response| LedgerMessage::Undo { response })
            .await?
    }

    /// Redo the last undone transaction
    pub async fn redo(&self) -> Result<DebtEdge> {
        self.request(|response| LedgerMessage::Redo { response })
            .await?
    }

    /// Get a single balance
    pub async fn balance(&self, name: impl Into<String>) -> Result<i64> {
        let name = name.into();
        self.request(|response| LedgerMessage::GetBalance { name, response })
            .await?
    }

    /// Get all balances
    pub async fn balances(&self) -> Result<BalanceSheet> {
        self.request(|response| LedgerMessage::GetBalances { response })
            .await
    }

    /// Get balances and graph totals
    pub async fn snapshot(&self) -> Result<LedgerSnapshot> {
        self.request(|response| LedgerMessage::Snapshot { response })
            .await
    }

    /// Get the transaction history
    pub async fn history(&self) -> Result<HistoryView> {
        self.request(|response| LedgerMessage::GetHistory { response })
            .await
    }

    /// Verify ledger invariants
    pub async fn check_invariants(&self) -> Result<()> {
        self.request(|response| LedgerMessage::CheckInvariants { response })
            .await?
    }

    /// Shutdown actor
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(LedgerMessage::Shutdown)
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;
        Ok(())
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> LedgerMessage,
    ) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(build(tx))
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))
    }
}

/// Spawn the ledger actor
///
/// The mailbox capacity comes from the ledger's own configuration.
pub fn spawn_ledger_actor(ledger: Ledger) -> LedgerHandle {
    let (tx, rx) = mpsc::channel(ledger.config().actor.mailbox_capacity.max(1));
    let actor = LedgerActor::new(ledger, rx);

    tokio::spawn(async move {
        actor.run().await;
    });

    LedgerHandle::new(tx)
}

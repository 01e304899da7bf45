//! Error types for the ledger

use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
///
/// Every variant returned by a mutating operation leaves the ledger untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Unknown participant, non-positive or unparseable amount, or a
    /// self-transaction under the `reject` policy
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    /// Undo requested with no applied transactions
    #[error("Nothing to undo")]
    NothingToUndo,

    /// Redo requested with no undone transactions
    #[error("Nothing to redo")]
    NothingToRedo,

    /// Balance lookup for a name that was never registered
    #[error("Unknown participant: {0}")]
    UnknownParticipant(String),

    /// Balance arithmetic left the representable range
    #[error("Balance overflow: {0}")]
    BalanceOverflow(String),

    /// Invariant violation (zero-sum, graph consistency)
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Concurrency error (actor mailbox closed, etc.)
    #[error("Concurrency error: {0}")]
    Concurrency(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    /// Informational failures the caller can simply report and move on from
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::InvalidTransaction(_)
                | Error::NothingToUndo
                | Error::NothingToRedo
                | Error::UnknownParticipant(_)
                | Error::BalanceOverflow(_)
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

//! Participant registry
//!
//! Holds the known participants, their registration order, and their running
//! net balance. Balances only move in pairs through [`ParticipantRegistry::shift`],
//! which keeps the zero-sum invariant intact.

use crate::{
    types::{BalanceSheet, Participant, ParticipantId},
    Error, Result,
};
use std::collections::HashMap;

/// Registered participants in registration order
#[derive(Debug, Default, Clone)]
pub struct ParticipantRegistry {
    participants: Vec<Participant>,
    index: HashMap<ParticipantId, usize>,
}

impl ParticipantRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a participant with a zero balance
    ///
    /// Surrounding whitespace is trimmed. Returns `None` for an empty or
    /// already registered name; that case is not an error.
    pub fn register(&mut self, name: &str) -> Option<ParticipantId> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let id = ParticipantId::new(name);
        if self.index.contains_key(&id) {
            return None;
        }

        let index = self.participants.len();
        self.participants.push(Participant {
            id: id.clone(),
            balance: 0,
            index,
        });
        self.index.insert(id.clone(), index);
        Some(id)
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&ParticipantId::new(name))
    }

    /// Look up a participant
    pub fn get(&self, name: &str) -> Option<&Participant> {
        self.index
            .get(&ParticipantId::new(name))
            .map(|&i| &self.participants[i])
    }

    /// Current net balance
    pub fn balance(&self, name: &str) -> Result<i64> {
        self.get(name)
            .map(|p| p.balance)
            .ok_or_else(|| Error::UnknownParticipant(name.to_string()))
    }

    /// Move `amount` of net balance from `debtor` to `creditor`
    ///
    /// `debtor` goes down, `creditor` goes up. Both results are computed before
    /// either is stored, so an overflow leaves both balances untouched. A
    /// self-shift changes nothing.
    pub fn shift(
        &mut self,
        debtor: &ParticipantId,
        creditor: &ParticipantId,
        amount: i64,
    ) -> Result<()> {
        let d = self.slot(debtor)?;
        let c = self.slot(creditor)?;

        if d == c {
            return Ok(());
        }

        let new_debtor = self.participants[d]
            .balance
            .checked_sub(amount)
            .ok_or_else(|| Error::BalanceOverflow(format!("{} - {}", debtor, amount)))?;
        let new_creditor = self.participants[c]
            .balance
            .checked_add(amount)
            .ok_or_else(|| Error::BalanceOverflow(format!("{} + {}", creditor, amount)))?;

        self.participants[d].balance = new_debtor;
        self.participants[c].balance = new_creditor;
        Ok(())
    }

    /// Participants in registration order
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Balances in registration order
    pub fn balances(&self) -> BalanceSheet {
        BalanceSheet::new(
            self.participants
                .iter()
                .map(|p| (p.id.clone(), p.balance))
                .collect(),
        )
    }

    /// Number of registered participants
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// True if nobody is registered
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    fn slot(&self, id: &ParticipantId) -> Result<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| Error::UnknownParticipant(id.to_string()))
    }
}

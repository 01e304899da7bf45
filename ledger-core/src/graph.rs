//! Debt graph
//!
//! Directed, amount-weighted edges keyed by debtor. Each debtor's outgoing
//! edges keep insertion order. Removal is by [`EdgeId`], never by value, so
//! two edges with the same endpoints and amount are never confused.

use crate::{
    types::{DebtEdge, EdgeId, ParticipantId},
    Error, Result,
};
use std::collections::HashMap;

/// Adjacency lists of outgoing debt edges
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DebtGraph {
    adjacency: HashMap<ParticipantId, Vec<DebtEdge>>,
    edge_count: usize,
}

impl DebtGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with no outgoing edges (no-op if present)
    pub fn add_node(&mut self, id: ParticipantId) {
        self.adjacency.entry(id).or_default();
    }

    /// Append an edge to its debtor's adjacency list
    pub fn insert(&mut self, edge: DebtEdge) -> Result<()> {
        if !self.adjacency.contains_key(&edge.to) {
            return Err(Error::UnknownParticipant(edge.to.to_string()));
        }

        let list = self
            .adjacency
            .get_mut(&edge.from)
            .ok_or_else(|| Error::UnknownParticipant(edge.from.to_string()))?;
        list.push(edge);
        self.edge_count += 1;
        Ok(())
    }

    /// Remove the edge with the given id from `from`'s list
    ///
    /// Scans from the back: the edge being undone is always the newest one.
    pub fn remove(&mut self, from: &ParticipantId, id: EdgeId) -> Option<DebtEdge> {
        let list = self.adjacency.get_mut(from)?;
        let pos = list.iter().rposition(|e| e.id == id)?;
        self.edge_count -= 1;
        Some(list.remove(pos))
    }

    /// Outgoing edges of a participant, oldest first
    pub fn edges_from(&self, from: &str) -> &[DebtEdge] {
        self.adjacency
            .get(&ParticipantId::new(from))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All edges, grouped by debtor (group order unspecified)
    pub fn edges(&self) -> impl Iterator<Item = &DebtEdge> {
        self.adjacency.values().flatten()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Sum of all edge amounts
    pub fn gross_total(&self) -> i128 {
        self.edges().map(|e| e.amount as i128).sum()
    }

    /// Net position per participant derived from the edges alone
    pub fn net_positions(&self) -> HashMap<ParticipantId, i128> {
        let mut positions: HashMap<ParticipantId, i128> = self
            .adjacency
            .keys()
            .map(|id| (id.clone(), 0))
            .collect();

        for edge in self.edges() {
            *positions.entry(edge.from.clone()).or_default() -= edge.amount as i128;
            *positions.entry(edge.to.clone()).or_default() += edge.amount as i128;
        }

        positions
    }
}

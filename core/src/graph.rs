//! Undirected counterparty graph.
//!
//! INVARIANT: adjacency is symmetric, b ∈ adj(a) iff a ∈ adj(b).
//! Nodes appear on first edge and are never removed. Repeated
//! transactions between the same pair collapse into one edge.

use crate::types::UserId;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Default, Clone)]
pub struct RelationshipGraph {
    adjacency: BTreeMap<UserId, BTreeSet<UserId>>,
}

impl RelationshipGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect `a` and `b`. Returns true if the edge is new.
    ///
    /// A self-transfer registers the node but adds no edge, so a lone
    /// user can never form a ring with themselves.
    pub fn add_edge(&mut self, a: &str, b: &str) -> bool {
        if a == b {
            self.adjacency.entry(a.to_string()).or_default();
            return false;
        }
        let inserted = self
            .adjacency
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string());
        self.adjacency
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string());
        if inserted {
            log::debug!("graph edge added: {a} <-> {b}");
        }
        inserted
    }

    /// Owned copy of the adjacency set; empty for unknown users.
    pub fn neighbors(&self, user_id: &str) -> BTreeSet<UserId> {
        self.adjacency.get(user_id).cloned().unwrap_or_default()
    }

    pub(crate) fn adjacency(&self, user_id: &str) -> Option<&BTreeSet<UserId>> {
        self.adjacency.get(user_id)
    }

    /// Borrowing iterator over neighbors, in sorted order.
    pub fn adjacent<'g>(&'g self, user_id: &str) -> impl Iterator<Item = &'g str> + 'g {
        self.adjacency
            .get(user_id)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.adjacency.contains_key(user_id)
    }

    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        self.adjacency.get(a).is_some_and(|set| set.contains(b))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(String::as_str)
    }

    /// Each undirected edge once, as (smaller, larger).
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.adjacency.iter().flat_map(|(a, set)| {
            set.iter()
                .filter(move |b| a.as_str() < b.as_str())
                .map(move |b| (a.as_str(), b.as_str()))
        })
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum::<usize>() / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacency_stays_symmetric() {
        let mut graph = RelationshipGraph::new();
        graph.add_edge("a", "b");
        graph.add_edge("c", "a");
        graph.add_edge("b", "d");

        for a in graph.nodes() {
            for b in graph.adjacent(a) {
                assert!(graph.has_edge(b, a), "edge {a}->{b} has no mirror");
            }
        }
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.edges().count(), 3);
    }

    #[test]
    fn self_transfer_creates_node_only() {
        let mut graph = RelationshipGraph::new();
        assert!(!graph.add_edge("solo", "solo"));
        assert!(graph.contains("solo"));
        assert!(graph.neighbors("solo").is_empty());
        assert_eq!(graph.edge_count(), 0);
    }
}

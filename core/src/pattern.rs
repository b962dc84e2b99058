//! Ring detection over the counterparty graph.
//!
//! The graph is undirected, so a ring is a simple cycle of three or more
//! distinct users. All traversals are read-only and keep a visited set,
//! so they terminate on cyclic graphs.

use crate::{graph::RelationshipGraph, types::UserId};
use petgraph::unionfind::UnionFind;
use std::collections::{HashMap, HashSet, VecDeque};

pub struct PatternDetector<'g> {
    graph: &'g RelationshipGraph,
}

impl<'g> PatternDetector<'g> {
    pub fn new(graph: &'g RelationshipGraph) -> Self {
        Self { graph }
    }

    pub fn has_cycle_through(&self, user_id: &str) -> bool {
        self.cycle_through(user_id).is_some()
    }

    /// A witness ring starting and implicitly ending at `user_id`.
    ///
    /// The user lies on a cycle iff two of its neighbors are still
    /// connected once the user is removed. Each neighbor seeds a BFS
    /// that never re-enters the user; reaching a second neighbor
    /// closes the ring. Neighbors are visited in sorted order, so the
    /// witness is deterministic.
    pub fn cycle_through(&self, user_id: &str) -> Option<Vec<UserId>> {
        let ring_ends = self.graph.adjacency(user_id)?;
        if ring_ends.len() < 2 {
            return None;
        }

        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(user_id);

        for start in ring_ends.iter().map(String::as_str) {
            if !visited.insert(start) {
                continue;
            }
            let mut parent: HashMap<&str, &str> = HashMap::new();
            let mut queue = VecDeque::from([start]);

            while let Some(node) = queue.pop_front() {
                if node != start && ring_ends.contains(node) {
                    let mut ring = vec![node.to_string()];
                    let mut cursor = node;
                    while let Some(&prev) = parent.get(cursor) {
                        ring.push(prev.to_string());
                        cursor = prev;
                    }
                    ring.push(user_id.to_string());
                    ring.reverse();
                    return Some(ring);
                }
                for next in self.graph.adjacent(node) {
                    if visited.insert(next) {
                        parent.insert(next, node);
                        queue.push_back(next);
                    }
                }
            }
        }
        None
    }

    /// True if any ring exists anywhere in the graph.
    pub fn has_any_cycle(&self) -> bool {
        let index: HashMap<&str, usize> = self
            .graph
            .nodes()
            .enumerate()
            .map(|(i, id)| (id, i))
            .collect();
        let mut components = UnionFind::<usize>::new(index.len());

        // An edge joining two nodes already in one component closes a ring.
        self.graph
            .edges()
            .any(|(a, b)| !components.union(index[a], index[b]))
    }

    /// Every user that lies on at least one ring, sorted.
    ///
    /// One traversal per node; meant for periodic sweeps, not the
    /// per-transaction path.
    pub fn ring_members(&self) -> Vec<UserId> {
        self.graph
            .nodes()
            .filter(|id| self.has_cycle_through(id))
            .map(str::to_string)
            .collect()
    }
}

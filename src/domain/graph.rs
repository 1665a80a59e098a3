//! Dependency graph for features
//!
//! Manages the directed "must land before" relation with cycle detection
//! and deterministic topological ordering. Uses petgraph for graph storage.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use super::feature::FeatureId;

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("Dependency cycle between features: {}", join_ids(.0))]
    CycleDetected(Vec<FeatureId>),

    #[error("Feature not found in graph: {0}")]
    FeatureNotFound(FeatureId),

    #[error("Feature cannot depend on itself: {0}")]
    SelfDependency(FeatureId),
}

fn join_ids(ids: &[FeatureId]) -> String {
    ids.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A directed "must land before" relation between two features
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// The feature that must land first
    pub from: FeatureId,
    /// The feature that builds on it
    pub to: FeatureId,
}

impl DependencyEdge {
    pub fn new(from: FeatureId, to: FeatureId) -> Self {
        Self { from, to }
    }
}

/// A dependency graph over feature ids
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// The underlying directed graph; edges point from prerequisite to dependent
    graph: DiGraph<FeatureId, ()>,

    /// Map from FeatureId to node index
    node_map: HashMap<FeatureId, NodeIndex>,
}

impl DependencyGraph {
    /// Creates an empty dependency graph
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Builds a graph from a node set and an edge set
    ///
    /// Every feature becomes a node even when no edge touches it, so
    /// isolated features keep their place in the topological order.
    pub fn from_edges<'a, I, E>(ids: I, edges: E) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = &'a FeatureId>,
        E: IntoIterator<Item = &'a DependencyEdge>,
    {
        let mut graph = Self::new();

        for id in ids {
            graph.add_feature(id.clone());
        }
        for edge in edges {
            graph.add_edge(&edge.from, &edge.to)?;
        }

        Ok(graph)
    }

    /// Adds a feature to the graph
    pub fn add_feature(&mut self, id: FeatureId) {
        if !self.node_map.contains_key(&id) {
            let idx = self.graph.add_node(id.clone());
            self.node_map.insert(id, idx);
        }
    }

    /// Adds an edge: `from` must land before `to`
    ///
    /// Parallel edges are deduplicated. Cycles are not rejected here; they
    /// surface from [`check_acyclic`](Self::check_acyclic) with the full
    /// member list, which every caller goes through.
    pub fn add_edge(&mut self, from: &FeatureId, to: &FeatureId) -> Result<(), GraphError> {
        if from == to {
            return Err(GraphError::SelfDependency(from.clone()));
        }

        let from_idx = self
            .node_map
            .get(from)
            .ok_or_else(|| GraphError::FeatureNotFound(from.clone()))?;

        let to_idx = self
            .node_map
            .get(to)
            .ok_or_else(|| GraphError::FeatureNotFound(to.clone()))?;

        if self.graph.find_edge(*from_idx, *to_idx).is_none() {
            self.graph.add_edge(*from_idx, *to_idx, ());
        }

        Ok(())
    }

    /// Returns the direct prerequisites of a feature
    pub fn predecessors(&self, id: &FeatureId) -> Vec<FeatureId> {
        let idx = match self.node_map.get(id) {
            Some(idx) => *idx,
            None => return vec![],
        };

        self.graph
            .neighbors_directed(idx, Direction::Incoming)
            .filter_map(|idx| self.graph.node_weight(idx).cloned())
            .collect()
    }

    /// Returns the features that directly build on a feature
    pub fn successors(&self, id: &FeatureId) -> Vec<FeatureId> {
        let idx = match self.node_map.get(id) {
            Some(idx) => *idx,
            None => return vec![],
        };

        self.graph
            .neighbors_directed(idx, Direction::Outgoing)
            .filter_map(|idx| self.graph.node_weight(idx).cloned())
            .collect()
    }

    /// Finds a dependency cycle, if any
    ///
    /// Returns the members of the first strongly connected component larger
    /// than one node, sorted by id so error text is stable.
    pub fn cycle(&self) -> Option<Vec<FeatureId>> {
        for scc in tarjan_scc(&self.graph) {
            if scc.len() > 1 {
                let mut members: Vec<FeatureId> = scc
                    .iter()
                    .filter_map(|idx| self.graph.node_weight(*idx).cloned())
                    .collect();
                members.sort();
                return Some(members);
            }
        }
        None
    }

    /// Fails with the offending cycle's feature ids if the graph is cyclic
    pub fn check_acyclic(&self) -> Result<(), GraphError> {
        match self.cycle() {
            Some(members) => Err(GraphError::CycleDetected(members)),
            None => Ok(()),
        }
    }

    /// Returns all features in topological order (prerequisites first)
    ///
    /// When several features have no unresolved prerequisites at a step, the
    /// one with the smallest `key` is taken, so identical inputs always
    /// produce identical orders. Callers pass `(declaration index, id)`.
    pub fn topological_order<K, F>(&self, mut key: F) -> Result<Vec<FeatureId>, GraphError>
    where
        F: FnMut(&FeatureId) -> K,
        K: Ord,
    {
        self.check_acyclic()?;

        let mut indegree: HashMap<NodeIndex, usize> = self
            .graph
            .node_indices()
            .map(|idx| {
                (
                    idx,
                    self.graph
                        .neighbors_directed(idx, Direction::Incoming)
                        .count(),
                )
            })
            .collect();

        let mut ready: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|idx| indegree.get(idx).copied() == Some(0))
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());

        while !ready.is_empty() {
            let mut best = 0;
            for i in 1..ready.len() {
                let candidate = self.graph.node_weight(ready[i]);
                let current = self.graph.node_weight(ready[best]);
                if let (Some(candidate), Some(current)) = (candidate, current) {
                    if key(candidate) < key(current) {
                        best = i;
                    }
                }
            }

            let next = ready.swap_remove(best);
            if let Some(id) = self.graph.node_weight(next) {
                order.push(id.clone());
            }

            for succ in self.graph.neighbors_directed(next, Direction::Outgoing) {
                if let Some(degree) = indegree.get_mut(&succ) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push(succ);
                    }
                }
            }
        }

        Ok(order)
    }

    /// Returns true if the graph contains the feature
    pub fn contains(&self, id: &FeatureId) -> bool {
        self.node_map.contains_key(id)
    }

    /// Returns the number of features in the graph
    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    /// Returns true if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }

    /// Returns all feature ids in the graph
    pub fn feature_ids(&self) -> impl Iterator<Item = &FeatureId> {
        self.node_map.keys()
    }
}

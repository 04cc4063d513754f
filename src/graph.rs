//! Feature graph module.
//!
//! Provides the `FeatureGraph` type, a directed graph of feature set
//! membership built from a [`FeatureCatalog`]. An edge runs from a set to
//! each child it references, for union and exclusive sets alike. Content
//! is expected to be acyclic; the graph is used to prove that at load time.

use crate::error::CastError;
use crate::feature::FeatureCatalog;
use crate::ids::FeatureId;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

/// A directed graph of feature set membership.
///
/// # Examples
///
/// ```rust
/// use zzcast::graph::FeatureGraph;
/// use zzcast::FeatureId;
///
/// let mut graph = FeatureGraph::new();
/// let a = FeatureId::from_str("A");
/// let b = FeatureId::from_str("B");
///
/// graph.add_edge(a.clone(), b.clone());
/// assert!(graph.detect_cycles().is_ok());
///
/// graph.add_edge(b, a);
/// assert!(graph.detect_cycles().is_err());
/// ```
pub struct FeatureGraph {
    graph: DiGraph<FeatureId, ()>,
    node_map: HashMap<FeatureId, NodeIndex>,
}

impl FeatureGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Build the membership graph of every feature in `catalog`.
    ///
    /// Features are inserted in id order so cycle reports are deterministic.
    /// Dangling child references become childless nodes.
    pub fn from_catalog(catalog: &FeatureCatalog) -> Self {
        let mut graph = Self::new();

        let mut entries: Vec<_> = catalog.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        for (id, _) in &entries {
            graph.add_node((*id).clone());
        }
        for (id, node) in &entries {
            for child in node.children() {
                graph.add_edge((*id).clone(), child.clone());
            }
        }

        graph
    }

    /// Add a node if it doesn't exist, returning its index.
    pub fn add_node(&mut self, feature: FeatureId) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&feature) {
            idx
        } else {
            let idx = self.graph.add_node(feature.clone());
            self.node_map.insert(feature, idx);
            idx
        }
    }

    /// Add an edge from a set to one of its children.
    pub fn add_edge(&mut self, parent: FeatureId, child: FeatureId) {
        let parent_idx = self.add_node(parent);
        let child_idx = self.add_node(child);
        self.graph.add_edge(parent_idx, child_idx, ());
    }

    /// Check if a feature is in the graph.
    pub fn contains_node(&self, feature: &FeatureId) -> bool {
        self.node_map.contains_key(feature)
    }

    /// Number of features in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Detect membership cycles.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the graph is acyclic
    /// * `Err(CastError::FeatureCycle)` with the closed cycle path otherwise
    pub fn detect_cycles(&self) -> Result<(), CastError> {
        let mut visited = HashSet::new();
        let mut rec_stack = HashSet::new();

        for node_idx in self.graph.node_indices() {
            if !visited.contains(&node_idx) {
                let mut path = Vec::new();
                if let Some(cycle) =
                    self.dfs_cycle_detect(node_idx, &mut visited, &mut rec_stack, &mut path)
                {
                    return Err(cycle);
                }
            }
        }

        Ok(())
    }

    fn dfs_cycle_detect(
        &self,
        node: NodeIndex,
        visited: &mut HashSet<NodeIndex>,
        rec_stack: &mut HashSet<NodeIndex>,
        path: &mut Vec<FeatureId>,
    ) -> Option<CastError> {
        visited.insert(node);
        rec_stack.insert(node);
        path.push(self.graph[node].clone());

        // petgraph yields neighbors newest edge first; walk them in insertion order.
        let mut neighbors: Vec<_> = self
            .graph
            .neighbors_directed(node, petgraph::Direction::Outgoing)
            .collect();
        neighbors.reverse();

        for neighbor in neighbors {
            if !visited.contains(&neighbor) {
                if let Some(cycle) = self.dfs_cycle_detect(neighbor, visited, rec_stack, path) {
                    return Some(cycle);
                }
            } else if rec_stack.contains(&neighbor) {
                let start = self.graph[neighbor].clone();
                let start_pos = path.iter().position(|f| f == &start).unwrap_or(0);
                let mut cycle = path[start_pos..].to_vec();
                cycle.push(start);
                return Some(CastError::FeatureCycle { path: cycle });
            }
        }

        rec_stack.remove(&node);
        path.pop();
        None
    }
}

impl Default for FeatureGraph {
    fn default() -> Self {
        Self::new()
    }
}

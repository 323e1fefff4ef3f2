//! Schema Reference Graph
//!
//! Entity references are implicit (string tokens inside definitions), so the
//! schema itself is only a lazily walkable graph. `ReferenceGraph` materializes
//! it once with petgraph: one node per entity, one edge per resolved reference.
//! Passes that touch the whole schema (full parents, cycle detection) run on
//! this index instead of re-extracting references per entity.

pub mod closure;
pub mod parents;
pub mod refs;

pub use closure::{compute_closure, walk};
pub use parents::{include_full_parents, include_full_parents_with};
pub use refs::{decode_reference, extract_references};

use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::schema::{EntityKind, EntitySet, ProviderSchema, QualifiedName};

/// Graph node key
pub type EntityId = (EntityKind, QualifiedName);

/// Materialized reference graph of a whole schema
pub struct ReferenceGraph {
    /// Edges point from the referencing entity to the referenced one
    graph: DiGraph<EntityId, ()>,

    /// Node index lookup by `(kind, name)`
    node_indices: HashMap<EntityId, NodeIndex>,
}

impl ReferenceGraph {
    /// Index every entity of the schema. Dangling references get no edge.
    pub fn build(schema: &ProviderSchema) -> Self {
        let count = schema.entity_count();
        let mut graph = DiGraph::with_capacity(count, count * 2);
        let mut node_indices = HashMap::with_capacity(count);

        for (kind, name, _) in schema.entities() {
            let key = (kind, name.clone());
            let idx = graph.add_node(key.clone());
            node_indices.insert(key, idx);
        }

        for (kind, name, definition) in schema.entities() {
            let Some(&from_idx) = node_indices.get(&(kind, name.clone())) else {
                continue;
            };
            for target in extract_references(definition) {
                if let Some(&to_idx) = node_indices.get(&target) {
                    graph.update_edge(from_idx, to_idx, ());
                }
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built reference graph"
        );

        Self { graph, node_indices }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Forward closure of one entity, itself included. `None` if it is not in the graph.
    pub fn closure(&self, kind: EntityKind, name: &str) -> Option<EntitySet> {
        let &idx = self.node_indices.get(&(kind, name.to_string()))?;
        Some(self.reach([idx], Direction::Outgoing))
    }

    /// Everything reachable from any member of `seeds`, seeds included
    pub fn reachable_from(&self, seeds: &EntitySet) -> EntitySet {
        self.reach(self.indices_of(seeds), Direction::Outgoing)
    }

    /// Every entity that reaches a member of `targets`, targets included.
    ///
    /// These are exactly the entities whose forward closure intersects `targets`.
    pub fn ancestors(&self, targets: &EntitySet) -> EntitySet {
        self.reach(self.indices_of(targets), Direction::Incoming)
    }

    /// Reference cycles: strongly connected components with more than one member,
    /// plus single entities that reference themselves. Members are sorted.
    pub fn cycle_groups(&self) -> Vec<Vec<EntityId>> {
        let mut groups: Vec<Vec<EntityId>> = kosaraju_scc(&self.graph)
            .into_iter()
            .filter(|scc| {
                scc.len() > 1 || scc.iter().any(|&idx| self.graph.contains_edge(idx, idx))
            })
            .map(|scc| {
                let mut members: Vec<EntityId> = scc
                    .into_iter()
                    .filter_map(|idx| self.graph.node_weight(idx).cloned())
                    .collect();
                members.sort();
                members
            })
            .collect();
        groups.sort();
        groups
    }

    fn indices_of<'a>(&'a self, set: &'a EntitySet) -> impl Iterator<Item = NodeIndex> + 'a {
        set.iter()
            .filter_map(move |(kind, name)| self.node_indices.get(&(kind, name.clone())).copied())
    }

    fn reach<I>(&self, starts: I, direction: Direction) -> EntitySet
    where
        I: IntoIterator<Item = NodeIndex>,
    {
        let mut visited = HashSet::new();
        let mut stack: Vec<NodeIndex> = starts.into_iter().collect();

        while let Some(node_idx) = stack.pop() {
            if !visited.insert(node_idx) {
                continue;
            }
            stack.extend(
                self.graph
                    .neighbors_directed(node_idx, direction)
                    .filter(|next| !visited.contains(next)),
            );
        }

        visited
            .into_iter()
            .filter_map(|idx| self.graph.node_weight(idx).cloned())
            .collect()
    }
}

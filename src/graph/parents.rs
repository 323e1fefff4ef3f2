//! Full Parents
//!
//! An entity is a parent of a subset when its forward closure touches the subset.
//! Loading full parents adds every parent together with its whole closure, so
//! the result stays closed under references.
//!
//! Testing closure-intersects-target for each schema entity is the same as
//! walking the reference edges backwards from the targets, which is what the
//! indexed graph does.

use tracing::debug;

use super::ReferenceGraph;
use crate::schema::{EntitySet, ProviderSchema};

/// `targets` plus the full closure of every entity whose closure intersects it
pub fn include_full_parents(schema: &ProviderSchema, targets: &EntitySet) -> EntitySet {
    let graph = ReferenceGraph::build(schema);
    include_full_parents_with(&graph, targets)
}

/// Same as [`include_full_parents`], reusing an already built graph
pub fn include_full_parents_with(graph: &ReferenceGraph, targets: &EntitySet) -> EntitySet {
    let parents = graph.ancestors(targets);
    debug!(targets = targets.len(), parents = parents.len(), "found full parents");

    let mut result = targets.clone();
    result.extend(graph.reachable_from(&parents));
    result
}

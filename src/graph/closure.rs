//! Forward Closure
//!
//! Walks the schema lazily from one or more seeds, extracting references as it
//! goes. The visited set only grows and is bounded by the schema size, so cyclic
//! references terminate.

use std::collections::VecDeque;
use tracing::{debug, trace};

use super::refs::extract_references;
use crate::error::Result;
use crate::schema::{EntityKind, EntitySet, ProviderSchema, QualifiedName};

/// Every entity reachable from the root, the root included.
///
/// Fails if the root itself is not in the schema. References to entities that
/// are missing from the schema are dropped.
pub fn compute_closure(schema: &ProviderSchema, kind: EntityKind, name: &str) -> Result<EntitySet> {
    schema.require(kind, name)?;
    let closure = walk(schema, [(kind, name.to_string())]);
    debug!(root = %name, %kind, size = closure.len(), "computed forward closure");
    Ok(closure)
}

/// Union of the closures of every seed. Seeds missing from the schema are skipped.
pub fn walk<I>(schema: &ProviderSchema, seeds: I) -> EntitySet
where
    I: IntoIterator<Item = (EntityKind, QualifiedName)>,
{
    let mut visited = EntitySet::new();
    let mut queue: VecDeque<(EntityKind, QualifiedName)> = seeds.into_iter().collect();

    while let Some((kind, name)) = queue.pop_front() {
        if visited.contains(kind, &name) {
            continue;
        }
        let Some(definition) = schema.get(kind, &name) else {
            trace!(%kind, %name, "dropping dangling reference");
            continue;
        };

        for (ref_kind, ref_name) in extract_references(definition) {
            if !visited.contains(ref_kind, &ref_name) {
                queue.push_back((ref_kind, ref_name));
            }
        }
        visited.insert(kind, name);
    }

    visited
}

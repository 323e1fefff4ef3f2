//! Schema Subsets
//!
//! Cuts a provider schema down to what one entity needs: its forward closure,
//! optionally widened with full parents, optionally with shortened
//! descriptions. The source schema is never modified; every pass returns a new
//! value.

pub mod shorten;

pub use shorten::{shorten, shorten_descriptions, ShortenOptions};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::graph::{compute_closure, include_full_parents_with, ReferenceGraph};
use crate::schema::{EntityKind, EntitySet, ProviderSchema, QualifiedName};

/// Parameters of a subset computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsetRequest {
    /// Root entity qualified name
    pub name: QualifiedName,

    /// Which mapping the root lives in
    pub kind: EntityKind,

    /// Add every entity whose closure touches the root's closure
    #[serde(default)]
    pub load_full_parents: bool,

    /// Shorten description strings when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shorten: Option<ShortenOptions>,
}

impl SubsetRequest {
    pub fn new(kind: EntityKind, name: impl Into<QualifiedName>) -> Self {
        Self {
            name: name.into(),
            kind,
            load_full_parents: false,
            shorten: None,
        }
    }

    pub fn with_full_parents(mut self, enabled: bool) -> Self {
        self.load_full_parents = enabled;
        self
    }

    pub fn with_shortening(mut self, options: ShortenOptions) -> Self {
        self.shorten = Some(options);
        self
    }
}

/// Compute the subset described by `request`.
///
/// Fails before any traversal if the root is not in the schema.
pub fn compute_subset(schema: &ProviderSchema, request: &SubsetRequest) -> Result<ProviderSchema> {
    let mut entities = compute_closure(schema, request.kind, &request.name)?;

    if request.load_full_parents {
        let graph = ReferenceGraph::build(schema);
        let cycles = graph.cycle_groups();
        if !cycles.is_empty() {
            debug!(groups = cycles.len(), "schema contains reference cycles");
        }
        entities = include_full_parents_with(&graph, &entities);
    }

    let mut subset = build_subset(schema, &entities);

    if let Some(options) = &request.shorten {
        subset = shorten_subset(&subset, options);
    }

    info!(
        root = %request.name,
        kind = %request.kind,
        types = subset.types.len(),
        resources = subset.resources.len(),
        functions = subset.functions.len(),
        "computed schema subset"
    );

    Ok(subset)
}

/// A new schema holding exactly the members of `entities` that exist in `schema`.
///
/// Definitions are copied unmodified. Key order is ascending lexical within each
/// mapping.
pub fn build_subset(schema: &ProviderSchema, entities: &EntitySet) -> ProviderSchema {
    let mut subset = ProviderSchema::default();
    for (kind, name) in entities.iter() {
        if let Some(definition) = schema.get(kind, name) {
            subset.section_mut(kind).insert(name.clone(), definition.clone());
        }
    }
    subset
}

/// Copy of `schema` with every description in every definition shortened
pub fn shorten_subset(schema: &ProviderSchema, options: &ShortenOptions) -> ProviderSchema {
    let mut shortened = ProviderSchema::default();
    for (kind, name, definition) in schema.entities() {
        shortened
            .section_mut(kind)
            .insert(name.clone(), shorten_descriptions(definition, options));
    }
    shortened
}

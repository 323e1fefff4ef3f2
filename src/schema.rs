//! Provider schema model
//!
//! A provider schema exposes three independent mappings of qualified name to
//! entity definition: `types`, `resources` and `functions`. Definitions are kept
//! as raw JSON; the only structure the core relies on is the reference tokens
//! embedded in their string values.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::btree_set;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Result, SchemaError};

/// Qualified name of a schema entity (e.g. `aws:lambda/function:Function`)
pub type QualifiedName = String;

/// Which of the three schema mappings an entity lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Type,
    Resource,
    Function,
}

impl EntityKind {
    /// All kinds, in serialization order
    pub const ALL: [EntityKind; 3] = [EntityKind::Type, EntityKind::Resource, EntityKind::Function];

    /// Name of the schema section holding this kind (also the reference token segment)
    pub fn section(&self) -> &'static str {
        match self {
            EntityKind::Type => "types",
            EntityKind::Resource => "resources",
            EntityKind::Function => "functions",
        }
    }

    /// Inverse of [`EntityKind::section`]
    pub fn from_section(section: &str) -> Option<Self> {
        match section {
            "types" => Some(EntityKind::Type),
            "resources" => Some(EntityKind::Resource),
            "functions" => Some(EntityKind::Function),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Type => "type",
            EntityKind::Resource => "resource",
            EntityKind::Function => "function",
        };
        f.write_str(name)
    }
}

impl FromStr for EntityKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "type" | "types" => Ok(EntityKind::Type),
            "resource" | "resources" => Ok(EntityKind::Resource),
            "function" | "functions" => Ok(EntityKind::Function),
            _ => Err(SchemaError::UnknownKind(s.to_string())),
        }
    }
}

/// A set of entities, one name set per kind.
///
/// The same name may appear under several kinds without any relation implied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySet {
    pub types: BTreeSet<QualifiedName>,
    pub resources: BTreeSet<QualifiedName>,
    pub functions: BTreeSet<QualifiedName>,
}

impl EntitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set holding a single entity
    pub fn single(kind: EntityKind, name: impl Into<QualifiedName>) -> Self {
        let mut set = Self::new();
        set.insert(kind, name);
        set
    }

    pub fn names(&self, kind: EntityKind) -> &BTreeSet<QualifiedName> {
        match kind {
            EntityKind::Type => &self.types,
            EntityKind::Resource => &self.resources,
            EntityKind::Function => &self.functions,
        }
    }

    fn names_mut(&mut self, kind: EntityKind) -> &mut BTreeSet<QualifiedName> {
        match kind {
            EntityKind::Type => &mut self.types,
            EntityKind::Resource => &mut self.resources,
            EntityKind::Function => &mut self.functions,
        }
    }

    /// Insert an entity, returning `true` if it was not already present
    pub fn insert(&mut self, kind: EntityKind, name: impl Into<QualifiedName>) -> bool {
        self.names_mut(kind).insert(name.into())
    }

    pub fn contains(&self, kind: EntityKind, name: &str) -> bool {
        self.names(kind).contains(name)
    }

    pub fn len(&self) -> usize {
        self.types.len() + self.resources.len() + self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over `(kind, name)` pairs, types first, each kind in lexical order
    pub fn iter(&self) -> impl Iterator<Item = (EntityKind, &QualifiedName)> + '_ {
        EntityKind::ALL
            .into_iter()
            .flat_map(move |kind| self.names(kind).iter().map(move |name| (kind, name)))
    }

    /// Add every member of `other`
    pub fn extend(&mut self, other: EntitySet) {
        for (kind, name) in other {
            self.insert(kind, name);
        }
    }

    /// Whether the two sets share at least one `(kind, name)` pair
    pub fn intersects(&self, other: &EntitySet) -> bool {
        EntityKind::ALL
            .into_iter()
            .any(|kind| !self.names(kind).is_disjoint(other.names(kind)))
    }

    /// Whether every member of `self` is also in `other`
    pub fn is_subset(&self, other: &EntitySet) -> bool {
        EntityKind::ALL
            .into_iter()
            .all(|kind| self.names(kind).is_subset(other.names(kind)))
    }
}

impl IntoIterator for EntitySet {
    type Item = (EntityKind, QualifiedName);
    type IntoIter = std::iter::Chain<
        std::iter::Chain<KindIter, KindIter>,
        KindIter,
    >;

    fn into_iter(self) -> Self::IntoIter {
        KindIter::new(EntityKind::Type, self.types)
            .chain(KindIter::new(EntityKind::Resource, self.resources))
            .chain(KindIter::new(EntityKind::Function, self.functions))
    }
}

/// Owning iterator over one kind's names
pub struct KindIter {
    kind: EntityKind,
    names: btree_set::IntoIter<QualifiedName>,
}

impl KindIter {
    fn new(kind: EntityKind, names: BTreeSet<QualifiedName>) -> Self {
        Self { kind, names: names.into_iter() }
    }
}

impl Iterator for KindIter {
    type Item = (EntityKind, QualifiedName);

    fn next(&mut self) -> Option<Self::Item> {
        self.names.next().map(|name| (self.kind, name))
    }
}

impl FromIterator<(EntityKind, QualifiedName)> for EntitySet {
    fn from_iter<I: IntoIterator<Item = (EntityKind, QualifiedName)>>(iter: I) -> Self {
        let mut set = EntitySet::new();
        for (kind, name) in iter {
            set.insert(kind, name);
        }
        set
    }
}

/// JSON rendering of a serialized schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

/// An in-memory provider schema.
///
/// Only the three entity mappings are kept; other top-level keys of the source
/// document are ignored on load. `BTreeMap` gives every mapping ascending
/// lexical key order, which is the canonical order for serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderSchema {
    pub types: BTreeMap<QualifiedName, Value>,
    pub resources: BTreeMap<QualifiedName, Value>,
    pub functions: BTreeMap<QualifiedName, Value>,
}

impl ProviderSchema {
    /// Parse and validate a schema document
    pub fn from_json_str(content: &str) -> Result<Self> {
        let schema: ProviderSchema = serde_json::from_str(content)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Load and validate a schema document from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Every entity definition must be a JSON object
    pub fn validate(&self) -> Result<()> {
        for (kind, name, definition) in self.entities() {
            if !definition.is_object() {
                return Err(SchemaError::InvalidFormat(format!(
                    "{} `{}` is not an object",
                    kind, name
                )));
            }
        }
        Ok(())
    }

    pub fn section(&self, kind: EntityKind) -> &BTreeMap<QualifiedName, Value> {
        match kind {
            EntityKind::Type => &self.types,
            EntityKind::Resource => &self.resources,
            EntityKind::Function => &self.functions,
        }
    }

    pub fn section_mut(&mut self, kind: EntityKind) -> &mut BTreeMap<QualifiedName, Value> {
        match kind {
            EntityKind::Type => &mut self.types,
            EntityKind::Resource => &mut self.resources,
            EntityKind::Function => &mut self.functions,
        }
    }

    /// Look up an entity definition
    pub fn get(&self, kind: EntityKind, name: &str) -> Option<&Value> {
        self.section(kind).get(name)
    }

    pub fn contains(&self, kind: EntityKind, name: &str) -> bool {
        self.section(kind).contains_key(name)
    }

    /// Total number of entities across all three mappings
    pub fn entity_count(&self) -> usize {
        self.types.len() + self.resources.len() + self.functions.len()
    }

    /// Iterate over every entity as `(kind, name, definition)`
    pub fn entities(&self) -> impl Iterator<Item = (EntityKind, &QualifiedName, &Value)> + '_ {
        EntityKind::ALL.into_iter().flat_map(move |kind| {
            self.section(kind)
                .iter()
                .map(move |(name, definition)| (kind, name, definition))
        })
    }

    /// Names of every entity in the schema
    pub fn entity_set(&self) -> EntitySet {
        self.entities()
            .map(|(kind, name, _)| (kind, name.clone()))
            .collect()
    }

    /// Fail with [`SchemaError::UnknownEntity`] unless the entity exists
    pub fn require(&self, kind: EntityKind, name: &str) -> Result<&Value> {
        self.get(kind, name).ok_or_else(|| SchemaError::UnknownEntity {
            kind,
            name: name.to_string(),
            suggestion: self.suggest(kind, name),
        })
    }

    /// Closest existing name of the given kind (fuzzy)
    pub fn suggest(&self, kind: EntityKind, query: &str) -> Option<String> {
        use fuzzy_matcher::skim::SkimMatcherV2;
        use fuzzy_matcher::FuzzyMatcher;

        let matcher = SkimMatcherV2::default();
        self.section(kind)
            .keys()
            .filter_map(|name| matcher.fuzzy_match(name, query).map(|score| (score, name)))
            // Ties resolve to the lexically first name
            .max_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.cmp(a.1)))
            .map(|(_, name)| name.clone())
    }

    /// Serialize to JSON with keys `types`, `resources`, `functions`
    pub fn to_json_string(&self, format: OutputFormat) -> Result<String> {
        let json = match format {
            OutputFormat::Pretty => serde_json::to_string_pretty(self)?,
            OutputFormat::Compact => serde_json::to_string(self)?,
        };
        Ok(json)
    }
}

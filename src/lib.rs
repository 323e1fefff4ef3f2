//! Provider Schemas
//!
//! Tooling over provider schemas: JSON documents describing the types,
//! resources and functions an infrastructure provider exposes, which client
//! code generators consume.
//!
//! ## Features
//!
//! - **Reference Extraction**: Finds `#/types/...`, `#/resources/...` and
//!   `#/functions/...` tokens anywhere inside an entity definition
//! - **Forward Closure**: Everything an entity transitively references, cycle safe
//! - **Full Parents**: Widens a set with every entity that references into it
//! - **Subsets**: Deterministic, reference-closed cut of a schema, with optional
//!   description shortening, for use as golden test fixtures
//!
//! ## Pipeline
//!
//! ```text
//! schema.json ──load──▶ ProviderSchema
//!                          │
//!                          ├─ compute_closure(kind, name)
//!                          ├─ include_full_parents   (optional, ReferenceGraph)
//!                          ├─ build_subset
//!                          └─ shorten_descriptions   (optional)
//!                                │
//!                                ▼
//!                  {"types": …, "resources": …, "functions": …}
//! ```

pub mod checksum;
pub mod config;
pub mod error;
pub mod graph;
pub mod schema;
pub mod subset;

pub use checksum::Checksum;
pub use config::SubsetConfig;
pub use error::{Result, SchemaError};
pub use graph::{compute_closure, include_full_parents, ReferenceGraph};
pub use schema::{EntityKind, EntitySet, OutputFormat, ProviderSchema, QualifiedName};
pub use subset::{build_subset, compute_subset, ShortenOptions, SubsetRequest};

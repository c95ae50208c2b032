//! Relation-aware seed data generator
//!
//! Models are declared in [`registry`], field values come from per-model
//! template files ([`templates`]) rendered with the `fake` crate, and rows are
//! written through a [`SeedStore`].

pub mod engine;
pub mod error;
pub mod registry;
pub mod store;
pub mod template;
pub mod templates;

pub use engine::{SeedEngine, SeedOptions, SeedReport};
pub use error::SeedError;
pub use registry::{find_model, ModelDefinition, SeedKind, MODELS};
pub use store::{InMemorySeedStore, PgSeedStore, SeedStore, SeedValue};
pub use templates::{prepare, PrepareOutcome, TemplateSet};

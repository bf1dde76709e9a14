//! Declarative feature model.
//!
//! Defines the shapes the reconciliation engine reads, builds and compares:
//! - [`Feature`]: a complete declarative snapshot or baseline, identified by an [`ArtifactId`]
//! - [`Artifact`]: one resolved bundle (identity, start order, metadata)
//! - [`Configuration`]: one configuration entry (pid + property bag)
//! - [`Prototype`]: the baseline reference and removal lists carried by a diff result
//! - [`FeatureProvider`]: resolves a feature reference during assembly
//!
//! The JSON reader/writer in [`io`] is the on-disk form of a feature.

mod artifact;
mod category;
mod configuration;
mod error;
mod feature;
pub mod io;
mod provider;

pub use artifact::{Artifact, Artifacts};
pub use category::DiffCategory;
pub use configuration::{Configuration, ConfigurationProperties, Configurations};
pub use error::{ModelError, ModelResult};
pub use feature::{Feature, Prototype, Removals};
pub use provider::FeatureProvider;
pub use r2f_types::ArtifactId;

//! Feature diff and assembly.
//!
//! Two pure operations over features:
//! - [`compare_features`] computes what turns a previous feature into a current
//!   one, as a prototype-based delta (additions plus removal lists)
//! - [`assemble`] expands prototype-based features through a
//!   [`FeatureProvider`](r2f_model::FeatureProvider) and merges them into one
//!   new feature
//!
//! Neither touches its inputs; both return new values.

mod builder;
mod diff;

pub use builder::assemble;
pub use diff::{compare_features, DiffRequest, UPDATER_CLASSIFIER};

use r2f_types::ArtifactId;

/// Result type for diff and assembly operations.
pub type DiffResult<T> = Result<T, DiffError>;

/// Errors that can occur while diffing or assembling features.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    #[error("no features to assemble into {0}")]
    NothingToAssemble(ArtifactId),

    #[error("prototype {prototype} of feature {feature} could not be resolved")]
    UnresolvedPrototype {
        feature: ArtifactId,
        prototype: ArtifactId,
    },

    #[error("feature {0} uses itself as prototype")]
    SelfPrototype(ArtifactId),
}

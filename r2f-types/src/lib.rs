//! Core type definitions for runtime-to-feature reconciliation.
//!
//! This crate defines the identity types every other layer depends on:
//! - Artifact identities (`group:artifact:version[:classifier[:type]]`)
//! - OSGi-style component versions used to key the identity table
//!
//! Model shapes (features, bundles, configurations) live in `r2f-model`.

mod artifact;
mod version;

pub use artifact::{ArtifactId, DEFAULT_TYPE, FEATURE_PACKAGING};
pub use version::ComponentVersion;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing identity types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid artifact id '{input}': {reason}")]
    InvalidArtifactId { input: String, reason: String },

    #[error("invalid version '{input}': {reason}")]
    InvalidVersion { input: String, reason: String },
}

//! Error types for the model crate.

use r2f_types::ArtifactId;
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while building, reading or writing a feature.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A feature file could not be parsed.
    #[error("failed to parse feature at {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    /// Serialization failed while writing a feature.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error while reading or writing a feature.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The same bundle identity appears twice in one feature.
    #[error("duplicate bundle: {0}")]
    DuplicateBundle(ArtifactId),
}

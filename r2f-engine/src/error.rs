//! Error types for the reconciliation engine.

use crate::resolver::IdentityError;
use r2f_types::ArtifactId;
use thiserror::Error;

/// Boxed error returned by live-runtime and collaborator implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for reconciliation operations.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Errors that can occur while starting the engine or serving a reconciliation.
///
/// Startup errors (`ConfigurationLoad`, `BaselineLoad`) are fatal to the
/// process. Every other variant fails the current call only.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The identity table or engine configuration could not be located or read.
    #[error("failed to load {resource}: {reason}")]
    ConfigurationLoad {
        resource: String,
        reason: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The declared baseline feature is missing or unreadable.
    #[error("failed to load baseline feature from {location}: {reason}")]
    BaselineLoad {
        location: String,
        reason: String,
        #[source]
        source: Option<BoxError>,
    },

    /// A live component could not be mapped to an artifact identity.
    #[error(transparent)]
    IdentityResolution(#[from] IdentityError),

    /// A live enumeration (components or configurations) failed.
    #[error("could not enumerate {what}: {source}")]
    Enumeration {
        what: &'static str,
        #[source]
        source: BoxError,
    },

    /// The diff collaborator failed.
    #[error("could not compare running feature against baseline {baseline}: {source}")]
    Diff {
        baseline: ArtifactId,
        #[source]
        source: BoxError,
    },

    /// The assembly collaborator failed to build the merged feature.
    #[error("could not assemble {target}: {source}")]
    Assembly {
        target: ArtifactId,
        #[source]
        source: BoxError,
    },

    /// The caller cancelled the operation.
    #[error("{operation} was cancelled")]
    Cancelled { operation: String },

    /// The call deadline passed before the operation completed.
    #[error("{operation} exceeded its deadline")]
    DeadlineExceeded { operation: String },
}

impl ReconcileError {
    pub(crate) fn configuration_load(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigurationLoad {
            resource: resource.into(),
            reason: reason.into(),
            source: None,
        }
    }

    pub(crate) fn baseline_load(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BaselineLoad {
            location: location.into(),
            reason: reason.into(),
            source: None,
        }
    }

    /// Attaches an underlying cause to a load error. Other variants are returned unchanged.
    pub(crate) fn caused_by(mut self, cause: impl Into<BoxError>) -> Self {
        match &mut self {
            Self::ConfigurationLoad { source, .. } | Self::BaselineLoad { source, .. } => {
                *source = Some(cause.into());
            }
            _ => {}
        }
        self
    }

    /// Stable short name of the error kind, for reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigurationLoad { .. } => "configuration_load",
            Self::BaselineLoad { .. } => "baseline_load",
            Self::IdentityResolution(_) => "identity_resolution",
            Self::Enumeration { .. } => "enumeration",
            Self::Diff { .. } => "diff",
            Self::Assembly { .. } => "assembly",
            Self::Cancelled { .. } => "cancelled",
            Self::DeadlineExceeded { .. } => "deadline_exceeded",
        }
    }

    /// Returns true for errors caused by the caller's context rather than by data.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Cancelled { .. } | Self::DeadlineExceeded { .. })
    }
}

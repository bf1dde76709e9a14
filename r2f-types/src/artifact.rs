//! Artifact identities.
//!
//! An artifact identity names one deployable unit. Its canonical string form is
//! `group:artifact:version[:classifier[:type]]`; an empty classifier segment
//! means "no classifier" and the type defaults to [`DEFAULT_TYPE`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type assumed when the canonical form carries no type segment.
pub const DEFAULT_TYPE: &str = "jar";

/// Type used for identities that name a feature model.
pub const FEATURE_PACKAGING: &str = "slingosgifeature";

/// Immutable identity of a deployable unit.
///
/// Ordering is lexicographic over (group, artifact, version, classifier, type),
/// which keeps every collection keyed by identity in a stable order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtifactId {
    group_id: String,
    artifact_id: String,
    version: String,
    classifier: Option<String>,
    type_: String,
}

impl ArtifactId {
    /// Creates an identity from its parts.
    ///
    /// A blank classifier is treated as absent and a missing type falls back to
    /// [`DEFAULT_TYPE`].
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
        classifier: Option<&str>,
        type_: Option<&str>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            classifier: classifier
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            type_: type_
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(DEFAULT_TYPE)
                .to_string(),
        }
    }

    /// Parses the canonical `group:artifact:version[:classifier[:type]]` form.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidArtifactId {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.len() < 3 {
            return Err(invalid("expected at least group:artifact:version"));
        }
        if parts.len() > 5 {
            return Err(invalid("too many ':' separated segments"));
        }

        let group_id = parts[0].trim();
        let artifact_id = parts[1].trim();
        let version = parts[2].trim();
        if group_id.is_empty() {
            return Err(invalid("group is empty"));
        }
        if artifact_id.is_empty() {
            return Err(invalid("artifact is empty"));
        }
        if version.is_empty() {
            return Err(invalid("version is empty"));
        }

        Ok(Self::new(
            group_id,
            artifact_id,
            version,
            parts.get(3).copied(),
            parts.get(4).copied(),
        ))
    }

    #[must_use]
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    #[must_use]
    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    /// Returns the packaging type (`jar` unless stated otherwise).
    #[must_use]
    pub fn type_(&self) -> &str {
        &self.type_
    }

    /// Derives a sibling identity: same group, artifact and version with the
    /// given classifier and type.
    #[must_use]
    pub fn with_classifier(&self, classifier: &str, type_: &str) -> Self {
        Self::new(
            self.group_id.clone(),
            self.artifact_id.clone(),
            self.version.clone(),
            Some(classifier),
            Some(type_),
        )
    }

    /// Returns true when both identities name the same group and artifact,
    /// regardless of version, classifier or type.
    #[must_use]
    pub fn is_same_ga(&self, other: &ArtifactId) -> bool {
        self.group_id == other.group_id && self.artifact_id == other.artifact_id
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)?;
        let custom_type = self.type_ != DEFAULT_TYPE;
        if self.classifier.is_some() || custom_type {
            write!(f, ":{}", self.classifier.as_deref().unwrap_or(""))?;
        }
        if custom_type {
            write!(f, ":{}", self.type_)?;
        }
        Ok(())
    }
}

impl FromStr for ArtifactId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ArtifactId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<ArtifactId> for String {
    fn from(id: ArtifactId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_form() {
        let id = ArtifactId::parse("g:a:1.0:run:slingosgifeature").unwrap();
        assert_eq!(id.group_id(), "g");
        assert_eq!(id.artifact_id(), "a");
        assert_eq!(id.version(), "1.0");
        assert_eq!(id.classifier(), Some("run"));
        assert_eq!(id.type_(), "slingosgifeature");
    }

    #[test]
    fn empty_classifier_segment_is_absent() {
        let id = ArtifactId::parse("g:a:1::zip").unwrap();
        assert_eq!(id.classifier(), None);
        assert_eq!(id.type_(), "zip");
        assert_eq!(id.to_string(), "g:a:1::zip");
    }

    #[test]
    fn default_type_is_not_rendered() {
        let id = ArtifactId::new("g", "a", "1", None, Some("jar"));
        assert_eq!(id.to_string(), "g:a:1");
    }
}

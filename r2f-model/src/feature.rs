use crate::{Artifacts, Configurations};
use r2f_types::ArtifactId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A declarative snapshot of deployable bundles and configuration.
///
/// The identity is fixed at construction. Features derived from another one
/// (running snapshots, diff results, merged models) are always new values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Feature {
    id: ArtifactId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prototype: Option<Prototype>,
    #[serde(default, skip_serializing_if = "Artifacts::is_empty")]
    pub bundles: Artifacts,
    #[serde(default, skip_serializing_if = "Configurations::is_empty")]
    pub configurations: Configurations,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub framework_properties: BTreeMap<String, String>,
    /// Opaque extension sections, keyed by extension name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, serde_json::Value>,
}

impl Feature {
    /// Creates an empty feature with the given identity.
    pub fn new(id: ArtifactId) -> Self {
        Self {
            id,
            prototype: None,
            bundles: Artifacts::new(),
            configurations: Configurations::new(),
            framework_properties: BTreeMap::new(),
            extensions: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &ArtifactId {
        &self.id
    }

    /// Returns true when the feature carries no records in any section.
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
            && self.configurations.is_empty()
            && self.framework_properties.is_empty()
            && self.extensions.is_empty()
    }
}

/// Reference to the feature a delta applies to, plus what it removes from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prototype {
    pub id: ArtifactId,
    #[serde(default, skip_serializing_if = "Removals::is_empty")]
    pub removals: Removals,
}

impl Prototype {
    pub fn new(id: ArtifactId) -> Self {
        Self {
            id,
            removals: Removals::default(),
        }
    }
}

/// Records present in a prototype that the deriving feature drops.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Removals {
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub bundles: BTreeSet<ArtifactId>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub configurations: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub framework_properties: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub extensions: BTreeSet<String>,
}

impl Removals {
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
            && self.configurations.is_empty()
            && self.framework_properties.is_empty()
            && self.extensions.is_empty()
    }
}

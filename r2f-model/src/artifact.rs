use crate::ModelError;
use r2f_types::ArtifactId;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::collections::btree_map;

const START_ORDER_KEY: &str = "start-order";

/// A resolved bundle inside a feature.
///
/// On disk a bundle is either its bare identity string or an object with an
/// `id`, an optional `start-order` and arbitrary extra metadata.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "ArtifactRepr")]
pub struct Artifact {
    pub id: ArtifactId,
    /// Boot phase the bundle is started in, when known.
    pub start_order: Option<u32>,
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Artifact {
    pub fn new(id: ArtifactId) -> Self {
        Self {
            id,
            start_order: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Builder-style setter for the start order.
    #[must_use]
    pub fn with_start_order(mut self, start_order: u32) -> Self {
        self.start_order = Some(start_order);
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ArtifactRepr {
    Id(ArtifactId),
    Object {
        id: ArtifactId,
        #[serde(rename = "start-order", default)]
        start_order: Option<u32>,
        #[serde(flatten)]
        metadata: BTreeMap<String, serde_json::Value>,
    },
}

impl From<ArtifactRepr> for Artifact {
    fn from(repr: ArtifactRepr) -> Self {
        match repr {
            ArtifactRepr::Id(id) => Artifact::new(id),
            ArtifactRepr::Object {
                id,
                start_order,
                metadata,
            } => Artifact {
                id,
                start_order,
                metadata,
            },
        }
    }
}

impl Serialize for Artifact {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.start_order.is_none() && self.metadata.is_empty() {
            return serializer.collect_str(&self.id);
        }
        let len = 1 + usize::from(self.start_order.is_some()) + self.metadata.len();
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("id", &self.id)?;
        if let Some(order) = self.start_order {
            map.serialize_entry(START_ORDER_KEY, &order)?;
        }
        for (key, value) in &self.metadata {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// The bundle set of a feature, unique by identity and kept in identity order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Artifact>", into = "Vec<Artifact>")]
pub struct Artifacts(BTreeMap<ArtifactId, Artifact>);

impl Artifacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a bundle, replacing and returning any record with the same identity.
    pub fn add(&mut self, artifact: Artifact) -> Option<Artifact> {
        self.0.insert(artifact.id.clone(), artifact)
    }

    pub fn remove(&mut self, id: &ArtifactId) -> Option<Artifact> {
        self.0.remove(id)
    }

    pub fn get(&self, id: &ArtifactId) -> Option<&Artifact> {
        self.0.get(id)
    }

    pub fn contains(&self, id: &ArtifactId) -> bool {
        self.0.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Values<'_, ArtifactId, Artifact> {
        self.0.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ArtifactId> {
        self.0.keys()
    }
}

impl TryFrom<Vec<Artifact>> for Artifacts {
    type Error = ModelError;

    fn try_from(list: Vec<Artifact>) -> Result<Self, Self::Error> {
        let mut artifacts = Artifacts::new();
        for artifact in list {
            let id = artifact.id.clone();
            if artifacts.add(artifact).is_some() {
                return Err(ModelError::DuplicateBundle(id));
            }
        }
        Ok(artifacts)
    }
}

impl From<Artifacts> for Vec<Artifact> {
    fn from(artifacts: Artifacts) -> Self {
        artifacts.0.into_values().collect()
    }
}

impl FromIterator<Artifact> for Artifacts {
    /// Collects bundles; a later record with the same identity replaces an earlier one.
    fn from_iter<I: IntoIterator<Item = Artifact>>(iter: I) -> Self {
        let mut artifacts = Artifacts::new();
        for artifact in iter {
            artifacts.add(artifact);
        }
        artifacts
    }
}

impl<'a> IntoIterator for &'a Artifacts {
    type Item = &'a Artifact;
    type IntoIter = btree_map::Values<'a, ArtifactId, Artifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

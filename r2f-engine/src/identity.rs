//! The identity table: live component (symbolic name, version) → artifact id.
//!
//! Loaded once at startup from `idbsnver.properties`, where each entry maps an
//! artifact id to `symbolicName~version`. Read-only afterwards.

use crate::location::{read_resource, resolve_data_file};
use crate::{CallContext, EngineConfig, Properties, ReconcileError, ReconcileResult};
use r2f_types::{ArtifactId, ComponentVersion};
use std::collections::HashMap;
use tracing::{info, warn};

/// Conventional name of the identity table resource.
pub const IDBSNVER_FILENAME: &str = "idbsnver.properties";

const NAME_VERSION_SEPARATOR: char = '~';

/// Immutable mapping from live component coordinates to artifact identities.
#[derive(Debug, Clone, Default)]
pub struct IdentityTable {
    entries: HashMap<String, HashMap<ComponentVersion, ArtifactId>>,
    len: usize,
}

impl IdentityTable {
    /// An empty table; every lookup misses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from parsed properties. `resource` only labels errors.
    pub fn from_properties(properties: &Properties, resource: &str) -> ReconcileResult<Self> {
        let mut table = IdentityTable::new();
        for (key, value) in properties.iter() {
            let invalid = |reason: String| {
                ReconcileError::configuration_load(resource, format!("entry '{key}': {reason}"))
            };

            let id = ArtifactId::parse(key).map_err(|e| invalid(e.to_string()))?;
            let (symbolic_name, version) = value
                .split_once(NAME_VERSION_SEPARATOR)
                .ok_or_else(|| invalid(format!("value '{value}' is not symbolicName~version")))?;
            let symbolic_name = symbolic_name.trim();
            if symbolic_name.is_empty() {
                return Err(invalid("symbolic name is empty".to_string()));
            }
            let version = ComponentVersion::parse(version).map_err(|e| invalid(e.to_string()))?;

            table.insert(symbolic_name.to_string(), version, id);
        }
        Ok(table)
    }

    /// Parses properties text into a table.
    pub fn parse(text: &str, resource: &str) -> ReconcileResult<Self> {
        Self::from_properties(&Properties::parse(text), resource)
    }

    /// Locates, reads and parses the identity table named by `config`.
    pub async fn load(config: &EngineConfig, ctx: &CallContext) -> ReconcileResult<Self> {
        let url = resolve_data_file(config, IDBSNVER_FILENAME)?;
        let bytes = read_resource(&url, ctx).await?.map_err(|e| {
            ReconcileError::configuration_load(url.as_str(), "cannot read identity table").caused_by(e)
        })?;

        let table = Self::from_properties(&Properties::from_bytes(&bytes), url.as_str())?;
        info!("Loaded {} identity table entries from {}", table.len(), url);
        Ok(table)
    }

    // Load-time only: duplicate coordinates keep the last artifact id.
    fn insert(&mut self, symbolic_name: String, version: ComponentVersion, id: ArtifactId) {
        let versions = self.entries.entry(symbolic_name.clone()).or_default();
        match versions.insert(version.clone(), id) {
            Some(previous) => warn!(
                "Identity table maps {}~{} more than once; {} replaced by {}",
                symbolic_name,
                version,
                previous,
                versions[&version]
            ),
            None => self.len += 1,
        }
    }

    /// Looks up the artifact id of a live component.
    pub fn get(&self, symbolic_name: &str, version: &ComponentVersion) -> Option<&ArtifactId> {
        self.entries.get(symbolic_name).and_then(|v| v.get(version))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates (symbolic name, version, artifact id) triples in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ComponentVersion, &ArtifactId)> {
        self.entries.iter().flat_map(|(name, versions)| {
            versions.iter().map(move |(version, id)| (name.as_str(), version, id))
        })
    }
}

impl FromIterator<(String, ComponentVersion, ArtifactId)> for IdentityTable {
    fn from_iter<I: IntoIterator<Item = (String, ComponentVersion, ArtifactId)>>(iter: I) -> Self {
        let mut table = IdentityTable::new();
        for (name, version, id) in iter {
            table.insert(name, version, id);
        }
        table
    }
}

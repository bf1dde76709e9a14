//! File-backed live runtime.
//!
//! Reads a JSON dump of a live system on every enumeration, so edits to the
//! file show up on the next reconciliation:
//!
//! ```json
//! {
//!   "components": [
//!     { "id": 0, "symbolic_name": "org.apache.felix.framework", "version": "7.0.5" },
//!     { "id": 1, "symbolic_name": "org.example.core", "version": "1.0.0", "start_level": 10,
//!       "entries": { "/META-INF/maven/org.example/core/pom.properties": "groupId=..." } }
//!   ],
//!   "configurations": { "svc.A": { "port": 8080 } }
//! }
//! ```
//!
//! Components and configurations are separate enumerations, each reading the
//! file on its own. A snapshot is therefore not atomic: replacing the file
//! between the two reads yields components from one version and
//! configurations from the next. Write the dump to a temporary file and rename
//! it into place so that each read at least sees a complete document.

use async_trait::async_trait;
use r2f_engine::memory::StaticComponent;
use r2f_engine::{BoxError, ComponentRegistry, ConfigurationService, LiveComponent, LiveConfiguration};
use r2f_model::ConfigurationProperties;
use r2f_types::ComponentVersion;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while reading a runtime dump.
#[derive(Debug, Error)]
pub enum DumpError {
    #[error("cannot read runtime dump {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid runtime dump {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One component in a dump.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpedComponent {
    pub id: u64,
    pub symbolic_name: String,
    pub version: ComponentVersion,
    #[serde(default = "default_start_level")]
    pub start_level: u32,
    /// Packaged entries, path → text contents.
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
}

fn default_start_level() -> u32 {
    1
}

/// The whole dump document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeDump {
    #[serde(default)]
    pub components: Vec<DumpedComponent>,
    #[serde(default)]
    pub configurations: BTreeMap<String, ConfigurationProperties>,
}

/// A live runtime backed by a dump file.
#[derive(Debug, Clone)]
pub struct DumpRuntime {
    path: PathBuf,
}

impl DumpRuntime {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the dump as it is now.
    pub async fn read(&self) -> Result<RuntimeDump, DumpError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|source| DumpError::Io {
            path: self.path.clone(),
            source,
        })?;
        let dump: RuntimeDump = serde_json::from_slice(&bytes).map_err(|source| DumpError::Parse {
            path: self.path.clone(),
            source,
        })?;
        debug!(
            "Read runtime dump {}: {} component(s), {} configuration(s)",
            self.path.display(),
            dump.components.len(),
            dump.configurations.len()
        );
        Ok(dump)
    }
}

impl From<DumpedComponent> for StaticComponent {
    fn from(dumped: DumpedComponent) -> Self {
        dumped.entries.iter().fold(
            StaticComponent::new(dumped.id, dumped.symbolic_name.as_str(), dumped.version.clone())
                .with_start_order(dumped.start_level),
            |component, (path, contents)| component.with_entry(path, contents.as_bytes()),
        )
    }
}

#[async_trait]
impl ComponentRegistry for DumpRuntime {
    async fn components(&self) -> Result<Vec<Arc<dyn LiveComponent>>, BoxError> {
        let dump = self.read().await?;
        Ok(dump
            .components
            .into_iter()
            .map(|c| Arc::new(StaticComponent::from(c)) as Arc<dyn LiveComponent>)
            .collect())
    }
}

#[async_trait]
impl ConfigurationService for DumpRuntime {
    async fn list_configurations(&self) -> Result<Vec<LiveConfiguration>, BoxError> {
        let dump = self.read().await?;
        Ok(dump
            .configurations
            .into_iter()
            .map(|(pid, properties)| LiveConfiguration::new(pid, properties))
            .collect())
    }
}

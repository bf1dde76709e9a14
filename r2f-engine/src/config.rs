//! Engine configuration.

use crate::{CallContext, ReconcileError, ReconcileResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Immutable startup configuration handed to [`Reconciler::start`](crate::Reconciler::start).
///
/// ```toml
/// resource_dir = "/opt/app/resources"
/// call_timeout_ms = 30000
///
/// [framework_properties]
/// "sling.feature" = "file:///opt/app/launch.json"
/// "sling.feature.apiregions.location" = "/opt/app/data"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Framework properties consulted for resource and baseline locations.
    pub framework_properties: BTreeMap<String, String>,
    /// Root directory for `classloader://` locations.
    pub resource_dir: Option<PathBuf>,
    /// Default deadline for each reconciliation call (ms).
    pub call_timeout_ms: Option<u64>,
}

impl EngineConfig {
    /// Parses a TOML configuration document.
    pub fn from_toml_str(text: &str) -> ReconcileResult<Self> {
        toml::from_str(text).map_err(|e| {
            ReconcileError::configuration_load("engine configuration", "invalid TOML").caused_by(e)
        })
    }

    /// Reads a TOML configuration file.
    pub fn load(path: &Path) -> ReconcileResult<Self> {
        let resource = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ReconcileError::configuration_load(resource.as_str(), "cannot read file").caused_by(e)
        })?;
        toml::from_str(&text).map_err(|e| {
            ReconcileError::configuration_load(resource, "invalid TOML").caused_by(e)
        })
    }

    /// Sets a framework property, overriding any loaded value.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.framework_properties.insert(key.into(), value.into());
        self
    }

    /// Sets the root directory for `classloader://` locations.
    #[must_use]
    pub fn with_resource_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resource_dir = Some(dir.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.framework_properties.get(key).map(String::as_str)
    }

    /// Builds a fresh call context honouring `call_timeout_ms`.
    pub fn call_context(&self) -> CallContext {
        match self.call_timeout_ms {
            Some(ms) => CallContext::with_timeout(Duration::from_millis(ms)),
            None => CallContext::new(),
        }
    }
}

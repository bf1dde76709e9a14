use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Property bag of one configuration, keyed by property name.
///
/// Values keep their runtime type (string, number, boolean, array).
pub type ConfigurationProperties = BTreeMap<String, serde_json::Value>;

const FACTORY_SEPARATOR: char = '~';

/// One configuration entry inside a feature.
///
/// The pid is either plain (`org.example.Service`) or factory-qualified
/// (`org.example.Factory~name`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub pid: String,
    pub properties: ConfigurationProperties,
}

impl Configuration {
    pub fn new(pid: impl Into<String>) -> Self {
        Self {
            pid: pid.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Builder-style property setter.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Returns true for factory configurations.
    pub fn is_factory(&self) -> bool {
        self.pid.contains(FACTORY_SEPARATOR)
    }

    /// The factory pid of a factory configuration.
    pub fn factory_pid(&self) -> Option<&str> {
        self.pid.split_once(FACTORY_SEPARATOR).map(|(factory, _)| factory)
    }

    /// The instance name of a factory configuration.
    pub fn name(&self) -> Option<&str> {
        self.pid.split_once(FACTORY_SEPARATOR).map(|(_, name)| name)
    }
}

/// The configuration set of a feature, unique by pid and kept in pid order.
///
/// Serialized as a JSON object mapping pid to its property bag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, ConfigurationProperties>",
    into = "BTreeMap<String, ConfigurationProperties>"
)]
pub struct Configurations(BTreeMap<String, Configuration>);

impl Configurations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a configuration, replacing and returning any entry with the same pid.
    pub fn add(&mut self, configuration: Configuration) -> Option<Configuration> {
        self.0.insert(configuration.pid.clone(), configuration)
    }

    pub fn remove(&mut self, pid: &str) -> Option<Configuration> {
        self.0.remove(pid)
    }

    pub fn get(&self, pid: &str) -> Option<&Configuration> {
        self.0.get(pid)
    }

    pub fn contains(&self, pid: &str) -> bool {
        self.0.contains_key(pid)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Values<'_, String, Configuration> {
        self.0.values()
    }

    pub fn pids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<BTreeMap<String, ConfigurationProperties>> for Configurations {
    fn from(map: BTreeMap<String, ConfigurationProperties>) -> Self {
        Self(
            map.into_iter()
                .map(|(pid, properties)| (pid.clone(), Configuration { pid, properties }))
                .collect(),
        )
    }
}

impl From<Configurations> for BTreeMap<String, ConfigurationProperties> {
    fn from(configurations: Configurations) -> Self {
        configurations
            .0
            .into_iter()
            .map(|(pid, c)| (pid, c.properties))
            .collect()
    }
}

impl FromIterator<Configuration> for Configurations {
    fn from_iter<I: IntoIterator<Item = Configuration>>(iter: I) -> Self {
        let mut configurations = Configurations::new();
        for configuration in iter {
            configurations.add(configuration);
        }
        configurations
    }
}

impl<'a> IntoIterator for &'a Configurations {
    type Item = &'a Configuration;
    type IntoIter = btree_map::Values<'a, String, Configuration>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

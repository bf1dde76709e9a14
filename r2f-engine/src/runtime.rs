//! Live-runtime capabilities.
//!
//! The engine never talks to a concrete runtime. It sees live components and
//! configurations only through these traits, implemented by whatever binding
//! the host provides (see [`memory`] for an in-process one).

use crate::BoxError;
use async_trait::async_trait;
use r2f_model::ConfigurationProperties;
use r2f_types::ComponentVersion;
use serde::{Deserialize, Serialize};
use std::io;
use std::sync::Arc;

/// Id of the framework root component. It is never part of a feature.
pub const SYSTEM_COMPONENT_ID: u64 = 0;

/// One live component, as far as the engine needs to see it.
#[async_trait]
pub trait LiveComponent: Send + Sync {
    /// Runtime-assigned component id.
    fn id(&self) -> u64;

    fn symbolic_name(&self) -> &str;

    fn version(&self) -> &ComponentVersion;

    /// Boot phase of the component.
    fn start_order(&self) -> u32;

    /// Recursively lists packaged entries below `path` whose file name matches
    /// `file_pattern` (`*` matches any run of characters). Returned paths are
    /// absolute within the component, in the component's listing order.
    async fn list_entries(&self, path: &str, file_pattern: &str) -> io::Result<Vec<String>>;

    /// Reads one packaged entry. `Ok(None)` when the entry does not exist.
    async fn read_entry(&self, path: &str) -> io::Result<Option<Vec<u8>>>;
}

/// Enumerates the currently installed components.
#[async_trait]
pub trait ComponentRegistry: Send + Sync {
    async fn components(&self) -> Result<Vec<Arc<dyn LiveComponent>>, BoxError>;
}

/// One live configuration entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveConfiguration {
    /// Plain pid, or `factoryPid~name` for factory configurations.
    pub pid: String,
    pub properties: ConfigurationProperties,
}

impl LiveConfiguration {
    pub fn new(pid: impl Into<String>, properties: ConfigurationProperties) -> Self {
        Self {
            pid: pid.into(),
            properties,
        }
    }
}

/// Enumerates the currently active configuration entries.
#[async_trait]
pub trait ConfigurationService: Send + Sync {
    async fn list_configurations(&self) -> Result<Vec<LiveConfiguration>, BoxError>;
}

/// Matches a file name against a pattern where `*` matches any run of characters.
pub fn matches_pattern(name: &str, pattern: &str) -> bool {
    let mut pieces = pattern.split('*');
    let Some(first) = pieces.next() else {
        return name.is_empty();
    };
    let Some(mut rest) = name.strip_prefix(first) else {
        return false;
    };

    let pieces: Vec<&str> = pieces.collect();
    let Some((last, middle)) = pieces.split_last() else {
        return rest.is_empty();
    };
    for piece in middle {
        match rest.find(piece) {
            Some(at) => rest = &rest[at + piece.len()..],
            None => return false,
        }
    }
    rest.len() >= last.len() && rest.ends_with(last)
}

/// In-memory runtime binding.
///
/// Holds components and configurations directly and lets callers change them
/// between reconciliations. Used by tests and by file-backed bindings that
/// rebuild the state from a dump.
pub mod memory {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::{PoisonError, RwLock};

    #[derive(Debug, Clone)]
    enum Entry {
        Data(Vec<u8>),
        Unreadable,
    }

    /// A live component backed by an in-memory entry map.
    #[derive(Debug, Clone)]
    pub struct StaticComponent {
        id: u64,
        symbolic_name: String,
        version: ComponentVersion,
        start_order: u32,
        entries: BTreeMap<String, Entry>,
    }

    impl StaticComponent {
        pub fn new(id: u64, symbolic_name: impl Into<String>, version: ComponentVersion) -> Self {
            Self {
                id,
                symbolic_name: symbolic_name.into(),
                version,
                start_order: 1,
                entries: BTreeMap::new(),
            }
        }

        #[must_use]
        pub fn with_start_order(mut self, start_order: u32) -> Self {
            self.start_order = start_order;
            self
        }

        /// Adds a packaged entry. Leading slashes in `path` are ignored.
        #[must_use]
        pub fn with_entry(mut self, path: &str, contents: impl Into<Vec<u8>>) -> Self {
            self.entries
                .insert(normalize(path).to_string(), Entry::Data(contents.into()));
            self
        }

        /// Adds an entry that is listed but fails to read.
        #[must_use]
        pub fn with_unreadable_entry(mut self, path: &str) -> Self {
            self.entries.insert(normalize(path).to_string(), Entry::Unreadable);
            self
        }
    }

    fn normalize(path: &str) -> &str {
        path.trim_start_matches('/')
    }

    #[async_trait]
    impl LiveComponent for StaticComponent {
        fn id(&self) -> u64 {
            self.id
        }

        fn symbolic_name(&self) -> &str {
            &self.symbolic_name
        }

        fn version(&self) -> &ComponentVersion {
            &self.version
        }

        fn start_order(&self) -> u32 {
            self.start_order
        }

        async fn list_entries(&self, path: &str, file_pattern: &str) -> io::Result<Vec<String>> {
            let dir = normalize(path).trim_end_matches('/');
            let found = self
                .entries
                .keys()
                .filter(|entry| dir.is_empty() || entry.starts_with(&format!("{dir}/")))
                .filter(|entry| {
                    let file_name = entry.rsplit('/').next().unwrap_or_default();
                    matches_pattern(file_name, file_pattern)
                })
                .map(|entry| format!("/{entry}"))
                .collect();
            Ok(found)
        }

        async fn read_entry(&self, path: &str) -> io::Result<Option<Vec<u8>>> {
            match self.entries.get(normalize(path)) {
                Some(Entry::Data(bytes)) => Ok(Some(bytes.clone())),
                Some(Entry::Unreadable) => Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    format!("entry {path} of {} is not readable", self.symbolic_name),
                )),
                None => Ok(None),
            }
        }
    }

    #[derive(Default)]
    struct State {
        components: Vec<Arc<dyn LiveComponent>>,
        configurations: Vec<LiveConfiguration>,
        component_failure: Option<String>,
        configuration_failure: Option<String>,
    }

    /// A mutable in-memory runtime implementing both enumeration traits.
    #[derive(Default)]
    pub struct StaticRuntime {
        state: RwLock<State>,
    }

    impl StaticRuntime {
        pub fn new() -> Self {
            Self::default()
        }

        /// Installs a component, keeping enumeration order.
        pub fn add_component(&self, component: impl LiveComponent + 'static) {
            self.write(|state| state.components.push(Arc::new(component)));
        }

        /// Removes every component with the given id. Returns whether one was removed.
        pub fn remove_component(&self, id: u64) -> bool {
            self.write(|state| {
                let before = state.components.len();
                state.components.retain(|c| c.id() != id);
                state.components.len() != before
            })
        }

        pub fn set_components(&self, components: Vec<Arc<dyn LiveComponent>>) {
            self.write(|state| state.components = components);
        }

        /// Adds or replaces a configuration entry by pid.
        pub fn put_configuration(&self, configuration: LiveConfiguration) {
            self.write(|state| {
                match state
                    .configurations
                    .iter_mut()
                    .find(|c| c.pid == configuration.pid)
                {
                    Some(existing) => *existing = configuration,
                    None => state.configurations.push(configuration),
                }
            });
        }

        pub fn remove_configuration(&self, pid: &str) -> bool {
            self.write(|state| {
                let before = state.configurations.len();
                state.configurations.retain(|c| c.pid != pid);
                state.configurations.len() != before
            })
        }

        pub fn set_configurations(&self, configurations: Vec<LiveConfiguration>) {
            self.write(|state| state.configurations = configurations);
        }

        /// Makes component enumeration fail with `reason` until cleared with `None`.
        pub fn fail_components(&self, reason: Option<&str>) {
            self.write(|state| state.component_failure = reason.map(str::to_string));
        }

        /// Makes configuration enumeration fail with `reason` until cleared with `None`.
        pub fn fail_configurations(&self, reason: Option<&str>) {
            self.write(|state| state.configuration_failure = reason.map(str::to_string));
        }

        fn write<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            f(&mut state)
        }

        fn read<R>(&self, f: impl FnOnce(&State) -> R) -> R {
            let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
            f(&state)
        }
    }

    #[async_trait]
    impl ComponentRegistry for StaticRuntime {
        async fn components(&self) -> Result<Vec<Arc<dyn LiveComponent>>, BoxError> {
            self.read(|state| match &state.component_failure {
                Some(reason) => Err(reason.clone().into()),
                None => Ok(state.components.clone()),
            })
        }
    }

    #[async_trait]
    impl ConfigurationService for StaticRuntime {
        async fn list_configurations(&self) -> Result<Vec<LiveConfiguration>, BoxError> {
            self.read(|state| match &state.configuration_failure {
                Some(reason) => Err(reason.clone().into()),
                None => Ok(state.configurations.clone()),
            })
        }
    }
}

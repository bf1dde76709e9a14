//! Structural feature diff.
//!
//! The result of comparing `previous` with `current` is a feature whose
//! prototype is `previous` and whose records are what `current` adds or
//! changes. Records of `previous` missing from `current` land in the
//! prototype's removal lists. Applying the result on top of `previous` with
//! [`assemble`](crate::assemble) reproduces `current` for every compared
//! category.

use r2f_model::{DiffCategory, Feature, Prototype};
use r2f_types::ArtifactId;
use std::collections::BTreeSet;
use tracing::debug;

/// Classifier suffix of diff result identities.
pub const UPDATER_CLASSIFIER: &str = "updater";

/// Parameters of one feature comparison.
#[derive(Debug, Clone)]
pub struct DiffRequest<'a> {
    previous: &'a Feature,
    current: &'a Feature,
    includes: BTreeSet<DiffCategory>,
    result_id: Option<ArtifactId>,
}

impl<'a> DiffRequest<'a> {
    /// Creates a request comparing every category.
    pub fn new(previous: &'a Feature, current: &'a Feature) -> Self {
        Self {
            previous,
            current,
            includes: BTreeSet::new(),
            result_id: None,
        }
    }

    /// Restricts the comparison to `category` (cumulative across calls).
    #[must_use]
    pub fn include(mut self, category: DiffCategory) -> Self {
        self.includes.insert(category);
        self
    }

    /// Overrides the identity of the produced delta.
    #[must_use]
    pub fn with_result_id(mut self, id: ArtifactId) -> Self {
        self.result_id = Some(id);
        self
    }

    /// Returns true when `category` takes part in the comparison.
    /// An empty include set compares everything.
    pub fn includes(&self, category: DiffCategory) -> bool {
        self.includes.is_empty() || self.includes.contains(&category)
    }

    fn result_id(&self) -> ArtifactId {
        if let Some(id) = &self.result_id {
            return id.clone();
        }
        let previous = self.previous.id();
        let classifier = match previous.classifier() {
            Some(c) => format!("{c}_{UPDATER_CLASSIFIER}"),
            None => UPDATER_CLASSIFIER.to_string(),
        };
        ArtifactId::new(
            previous.group_id(),
            previous.artifact_id(),
            self.current.id().version(),
            Some(&classifier),
            Some(previous.type_()),
        )
    }
}

/// Computes the delta turning `request.previous` into `request.current`.
pub fn compare_features(request: &DiffRequest<'_>) -> Feature {
    let previous = request.previous;
    let current = request.current;

    let mut result = Feature::new(request.result_id());
    let mut prototype = Prototype::new(previous.id().clone());

    if request.includes(DiffCategory::Bundles) {
        for bundle in &previous.bundles {
            if !current.bundles.contains(&bundle.id) {
                prototype.removals.bundles.insert(bundle.id.clone());
            }
        }
        for bundle in &current.bundles {
            if previous.bundles.get(&bundle.id) != Some(bundle) {
                result.bundles.add(bundle.clone());
            }
        }
    }

    if request.includes(DiffCategory::Configurations) {
        for config in &previous.configurations {
            if !current.configurations.contains(&config.pid) {
                prototype.removals.configurations.insert(config.pid.clone());
            }
        }
        for config in &current.configurations {
            if previous.configurations.get(&config.pid) != Some(config) {
                result.configurations.add(config.clone());
            }
        }
    }

    if request.includes(DiffCategory::FrameworkProperties) {
        for key in previous.framework_properties.keys() {
            if !current.framework_properties.contains_key(key) {
                prototype.removals.framework_properties.insert(key.clone());
            }
        }
        for (key, value) in &current.framework_properties {
            if previous.framework_properties.get(key) != Some(value) {
                result.framework_properties.insert(key.clone(), value.clone());
            }
        }
    }

    if request.includes(DiffCategory::Extensions) {
        for name in previous.extensions.keys() {
            if !current.extensions.contains_key(name) {
                prototype.removals.extensions.insert(name.clone());
            }
        }
        for (name, value) in &current.extensions {
            if previous.extensions.get(name) != Some(value) {
                result.extensions.insert(name.clone(), value.clone());
            }
        }
    }

    debug!(
        "Compared {} -> {}: {} bundle(s) added, {} removed; {} configuration(s) added, {} removed",
        previous.id(),
        current.id(),
        result.bundles.len(),
        prototype.removals.bundles.len(),
        result.configurations.len(),
        prototype.removals.configurations.len(),
    );

    result.prototype = Some(prototype);
    result
}

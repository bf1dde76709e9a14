use crate::Feature;
use r2f_types::ArtifactId;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Resolves a feature reference (typically a prototype id) during assembly.
///
/// Returning `None` means the reference is unknown to this provider; the
/// assembler decides whether that is fatal.
pub trait FeatureProvider: Send + Sync {
    fn provide(&self, id: &ArtifactId) -> Option<Arc<Feature>>;
}

impl FeatureProvider for BTreeMap<ArtifactId, Arc<Feature>> {
    fn provide(&self, id: &ArtifactId) -> Option<Arc<Feature>> {
        self.get(id).cloned()
    }
}

impl FeatureProvider for HashMap<ArtifactId, Arc<Feature>> {
    fn provide(&self, id: &ArtifactId) -> Option<Arc<Feature>> {
        self.get(id).cloned()
    }
}

//! Feature assembly.
//!
//! Each source is first expanded against its prototype (resolved through the
//! provider): the prototype's records are copied, its removal lists applied,
//! then the source's own records overlaid. Expanded sources are merged into
//! the target in order, later ones overriding earlier ones by identity, pid,
//! or key.

use crate::{DiffError, DiffResult};
use r2f_model::{Feature, FeatureProvider};
use r2f_types::ArtifactId;
use tracing::debug;

/// Assembles `sources` into a new feature identified by `target`.
pub fn assemble(
    target: &ArtifactId,
    provider: &dyn FeatureProvider,
    sources: &[&Feature],
) -> DiffResult<Feature> {
    if sources.is_empty() {
        return Err(DiffError::NothingToAssemble(target.clone()));
    }

    let mut assembled = Feature::new(target.clone());
    for source in sources {
        let expanded = expand(source, provider)?;
        overlay(&mut assembled, &expanded);
    }

    debug!(
        "Assembled {} from {} source(s): {} bundle(s), {} configuration(s)",
        target,
        sources.len(),
        assembled.bundles.len(),
        assembled.configurations.len()
    );
    Ok(assembled)
}

fn expand(source: &Feature, provider: &dyn FeatureProvider) -> DiffResult<Feature> {
    let Some(prototype) = &source.prototype else {
        return Ok(source.clone());
    };
    if &prototype.id == source.id() {
        return Err(DiffError::SelfPrototype(source.id().clone()));
    }

    let base = provider
        .provide(&prototype.id)
        .ok_or_else(|| DiffError::UnresolvedPrototype {
            feature: source.id().clone(),
            prototype: prototype.id.clone(),
        })?;

    let mut expanded = Feature::new(source.id().clone());
    overlay(&mut expanded, &base);

    let removals = &prototype.removals;
    for id in &removals.bundles {
        expanded.bundles.remove(id);
    }
    for pid in &removals.configurations {
        expanded.configurations.remove(pid);
    }
    for key in &removals.framework_properties {
        expanded.framework_properties.remove(key);
    }
    for name in &removals.extensions {
        expanded.extensions.remove(name);
    }

    overlay(&mut expanded, source);
    Ok(expanded)
}

fn overlay(target: &mut Feature, source: &Feature) {
    for bundle in &source.bundles {
        target.bundles.add(bundle.clone());
    }
    for config in &source.configurations {
        target.configurations.add(config.clone());
    }
    for (key, value) in &source.framework_properties {
        target.framework_properties.insert(key.clone(), value.clone());
    }
    for (name, value) in &source.extensions {
        target.extensions.insert(name.clone(), value.clone());
    }
}

//! Diff and assembly collaborators.
//!
//! The engine only decides *when* to diff and merge; how is delegated to
//! these two traits. The defaults are backed by `r2f-diff`.

use crate::BoxError;
use r2f_diff::DiffRequest;
use r2f_model::{DiffCategory, Feature, FeatureProvider};
use r2f_types::ArtifactId;

/// Computes what turns `previous` into `current`, restricted to `categories`.
pub trait FeatureDiffer: Send + Sync {
    fn compare(
        &self,
        previous: &Feature,
        current: &Feature,
        categories: &[DiffCategory],
    ) -> Result<Feature, BoxError>;
}

/// Merges `sources` into a new feature identified by `target`, resolving
/// prototype references through `provider`.
pub trait FeatureAssembler: Send + Sync {
    fn assemble(
        &self,
        target: &ArtifactId,
        provider: &dyn FeatureProvider,
        sources: &[&Feature],
    ) -> Result<Feature, BoxError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFeatureDiffer;

impl FeatureDiffer for DefaultFeatureDiffer {
    fn compare(
        &self,
        previous: &Feature,
        current: &Feature,
        categories: &[DiffCategory],
    ) -> Result<Feature, BoxError> {
        let request = categories
            .iter()
            .fold(DiffRequest::new(previous, current), |request, &category| {
                request.include(category)
            });
        Ok(r2f_diff::compare_features(&request))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFeatureAssembler;

impl FeatureAssembler for DefaultFeatureAssembler {
    fn assemble(
        &self,
        target: &ArtifactId,
        provider: &dyn FeatureProvider,
        sources: &[&Feature],
    ) -> Result<Feature, BoxError> {
        Ok(r2f_diff::assemble(target, provider, sources)?)
    }
}

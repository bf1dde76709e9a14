//! Running-feature snapshots of the live system.

use crate::configuration::map_configuration;
use crate::runtime::{ComponentRegistry, ConfigurationService};
use crate::{CallContext, IdentityResolver, IdentityTable, ReconcileError, ReconcileResult};
use r2f_model::Feature;
use r2f_types::ArtifactId;
use tracing::{debug, warn};

/// Classifier of the running feature derived from the baseline identity.
pub const RUNNING_CLASSIFIER: &str = "running";

/// Builds a running feature from everything the live system reports.
///
/// Components are resolved first: identity resolution is the step most
/// likely to fail, so a failure there stops the snapshot before
/// configurations are enumerated. Any failure aborts the whole snapshot.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotAssembler<'a> {
    resolver: IdentityResolver<'a>,
}

impl<'a> SnapshotAssembler<'a> {
    pub fn new(table: &'a IdentityTable) -> Self {
        Self {
            resolver: IdentityResolver::new(table),
        }
    }

    /// Snapshots the live system into a new feature identified by `target`.
    pub async fn assemble(
        &self,
        target: ArtifactId,
        components: &dyn ComponentRegistry,
        configurations: &dyn ConfigurationService,
        ctx: &CallContext,
    ) -> ReconcileResult<Feature> {
        let mut feature = Feature::new(target);

        let live_components = ctx
            .run("enumerating components", components.components())
            .await?
            .map_err(|source| ReconcileError::Enumeration {
                what: "components",
                source,
            })?;

        for component in &live_components {
            let Some(artifact) = self.resolver.to_artifact(component.as_ref(), ctx).await? else {
                debug!("Skipping framework component {}", component.symbolic_name());
                continue;
            };
            if let Some(previous) = feature.bundles.add(artifact) {
                warn!(
                    "Component {} resolves to {}, already claimed by another component",
                    component.symbolic_name(),
                    previous.id
                );
            }
        }

        let live_configurations = ctx
            .run("enumerating configurations", configurations.list_configurations())
            .await?
            .map_err(|source| ReconcileError::Enumeration {
                what: "configurations",
                source,
            })?;

        for live in &live_configurations {
            debug!("Snapshotting configuration {}", live.pid);
            feature.configurations.add(map_configuration(live));
        }

        debug!(
            "Snapshot {}: {} bundle(s), {} configuration(s)",
            feature.id(),
            feature.bundles.len(),
            feature.configurations.len()
        );
        Ok(feature)
    }
}

//! Reconciliation orchestrator.
//!
//! Owns the baseline feature and the identity table, both loaded once at
//! startup and read-only afterwards. Every call re-reads the live system;
//! nothing is retained between calls.

use crate::collaborator::{DefaultFeatureAssembler, DefaultFeatureDiffer, FeatureAssembler, FeatureDiffer};
use crate::location::{location_to_url, read_resource};
use crate::runtime::{ComponentRegistry, ConfigurationService};
use crate::snapshot::{SnapshotAssembler, RUNNING_CLASSIFIER};
use crate::{CallContext, EngineConfig, IdentityTable, ReconcileError, ReconcileResult};
use r2f_model::{DiffCategory, Feature, FeatureProvider};
use r2f_types::{ArtifactId, FEATURE_PACKAGING};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Classifier of the merged feature materialized when drift is found.
pub const RUNTIME_CLASSIFIER: &str = "runtime";

/// Framework property naming the baseline feature location.
pub const LAUNCH_FEATURE_PROPERTY: &str = "sling.feature";

/// The only categories observable at runtime. Framework properties and
/// extensions cannot be read back from a live system.
pub const COMPARED_CATEGORIES: [DiffCategory; 2] = [DiffCategory::Bundles, DiffCategory::Configurations];

/// Phase of a single reconciliation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcilePhase {
    Idle,
    Snapshotting,
    Diffing,
    Unchanged,
    Merging,
    Done,
}

impl fmt::Display for ReconcilePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Snapshotting => "snapshotting",
            Self::Diffing => "diffing",
            Self::Unchanged => "unchanged",
            Self::Merging => "merging",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

fn enter(phase: ReconcilePhase, baseline: &ArtifactId) {
    debug!("Reconciliation of {} -> {}", baseline, phase);
}

/// Compares the live system against the baseline and materializes drift.
pub struct Reconciler {
    baseline: Arc<Feature>,
    table: Arc<IdentityTable>,
    components: Arc<dyn ComponentRegistry>,
    configurations: Arc<dyn ConfigurationService>,
    differ: Arc<dyn FeatureDiffer>,
    assembler: Arc<dyn FeatureAssembler>,
}

impl Reconciler {
    /// Creates a reconciler from already-loaded parts, using the default
    /// diff and assembly collaborators.
    pub fn new(
        baseline: Arc<Feature>,
        table: Arc<IdentityTable>,
        components: Arc<dyn ComponentRegistry>,
        configurations: Arc<dyn ConfigurationService>,
    ) -> Self {
        Self {
            baseline,
            table,
            components,
            configurations,
            differ: Arc::new(DefaultFeatureDiffer),
            assembler: Arc::new(DefaultFeatureAssembler),
        }
    }

    #[must_use]
    pub fn with_differ(mut self, differ: Arc<dyn FeatureDiffer>) -> Self {
        self.differ = differ;
        self
    }

    #[must_use]
    pub fn with_assembler(mut self, assembler: Arc<dyn FeatureAssembler>) -> Self {
        self.assembler = assembler;
        self
    }

    /// One-time initialization: loads the identity table and the baseline.
    ///
    /// Either failure fails the whole startup; no reconciler is returned.
    pub async fn start(
        config: &EngineConfig,
        components: Arc<dyn ComponentRegistry>,
        configurations: Arc<dyn ConfigurationService>,
    ) -> ReconcileResult<Self> {
        let ctx = config.call_context();
        let table = IdentityTable::load(config, &ctx).await?;
        let baseline = load_baseline(config, &ctx).await?;

        info!(
            "Reconciler started for {} ({} bundle(s), {} configuration(s), {} identity table entries)",
            baseline.id(),
            baseline.bundles.len(),
            baseline.configurations.len(),
            table.len()
        );
        Ok(Self::new(Arc::new(baseline), Arc::new(table), components, configurations))
    }

    /// The baseline feature, as loaded.
    pub fn baseline(&self) -> Arc<Feature> {
        Arc::clone(&self.baseline)
    }

    pub fn identity_table(&self) -> &IdentityTable {
        &self.table
    }

    fn derived_id(&self, classifier: &str) -> ArtifactId {
        self.baseline.id().with_classifier(classifier, FEATURE_PACKAGING)
    }

    /// Snapshots the live system into a new running feature.
    pub async fn running_feature(&self, ctx: &CallContext) -> ReconcileResult<Feature> {
        enter(ReconcilePhase::Snapshotting, self.baseline.id());
        SnapshotAssembler::new(&self.table)
            .assemble(
                self.derived_id(RUNNING_CLASSIFIER),
                self.components.as_ref(),
                self.configurations.as_ref(),
                ctx,
            )
            .await
    }

    /// Compares a fresh snapshot against the baseline, over bundles and
    /// configurations only.
    pub async fn drift(&self, ctx: &CallContext) -> ReconcileResult<Feature> {
        let running = self.running_feature(ctx).await?;

        enter(ReconcilePhase::Diffing, self.baseline.id());
        ctx.check("diffing")?;
        let diff = self
            .differ
            .compare(&self.baseline, &running, &COMPARED_CATEGORIES)
            .map_err(|source| ReconcileError::Diff {
                baseline: self.baseline.id().clone(),
                source,
            })?;
        ctx.check("diffing")?;
        Ok(diff)
    }

    /// Returns the baseline itself when nothing drifted, otherwise a new
    /// `runtime` feature merging the drift into the baseline.
    pub async fn reconciled_feature(&self, ctx: &CallContext) -> ReconcileResult<Arc<Feature>> {
        let baseline_id = self.baseline.id();
        enter(ReconcilePhase::Idle, baseline_id);

        let diff = self.drift(ctx).await?;
        if is_unchanged(&diff) {
            enter(ReconcilePhase::Unchanged, baseline_id);
            info!("No drift from {}", baseline_id);
            enter(ReconcilePhase::Done, baseline_id);
            return Ok(self.baseline());
        }

        enter(ReconcilePhase::Merging, baseline_id);
        let target = self.derived_id(RUNTIME_CLASSIFIER);
        ctx.check("merging")?;
        let merged = self
            .assembler
            .assemble(&target, self, &[&diff])
            .map_err(|source| ReconcileError::Assembly {
                target: target.clone(),
                source,
            })?;
        ctx.check("merging")?;

        info!(
            "Drift from {} materialized as {}: {} bundle(s), {} configuration(s)",
            baseline_id,
            merged.id(),
            merged.bundles.len(),
            merged.configurations.len()
        );
        enter(ReconcilePhase::Done, baseline_id);
        Ok(Arc::new(merged))
    }
}

impl FeatureProvider for Reconciler {
    /// Resolves the baseline's own identity and nothing else.
    fn provide(&self, id: &ArtifactId) -> Option<Arc<Feature>> {
        (self.baseline.id() == id).then(|| self.baseline())
    }
}

/// Returns true when a diff result adds and removes no bundles and no configurations.
pub fn is_unchanged(diff: &Feature) -> bool {
    let no_removals = diff.prototype.as_ref().is_none_or(|p| {
        p.removals.bundles.is_empty() && p.removals.configurations.is_empty()
    });
    diff.bundles.is_empty() && diff.configurations.is_empty() && no_removals
}

/// Reads the baseline feature named by the `sling.feature` framework property.
pub async fn load_baseline(config: &EngineConfig, ctx: &CallContext) -> ReconcileResult<Feature> {
    let location = config.property(LAUNCH_FEATURE_PROPERTY).ok_or_else(|| {
        ReconcileError::baseline_load(
            LAUNCH_FEATURE_PROPERTY,
            format!("framework property '{LAUNCH_FEATURE_PROPERTY}' is not set"),
        )
    })?;

    let url = location_to_url(location, config.resource_dir.as_deref())
        .map_err(|reason| ReconcileError::baseline_load(location, reason))?;
    let bytes = read_resource(&url, ctx)
        .await?
        .map_err(|e| ReconcileError::baseline_load(location, "cannot read feature").caused_by(e))?;

    let feature = r2f_model::io::read_feature(bytes.as_slice(), location)
        .map_err(|e| ReconcileError::baseline_load(location, "cannot parse feature").caused_by(e))?;
    info!("Loaded baseline {} from {}", feature.id(), url);
    Ok(feature)
}

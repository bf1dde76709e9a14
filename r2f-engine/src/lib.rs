//! Runtime-state reconciliation engine.
//!
//! Compares the declared baseline feature a system was launched with against
//! the live state of that system, and materializes a merged feature when the
//! two have drifted apart.
//!
//! # Architecture
//!
//! - **Identity resolution**: maps a live component to a stable artifact
//!   identity, first through the identity table loaded at startup, then
//!   through the component's embedded `pom.properties`
//! - **Configuration mapping**: copies a live configuration entry into the
//!   declarative shape
//! - **Snapshot assembly**: drives both mappers over the whole live system to
//!   build the running feature
//! - **Reconciler**: owns the baseline and the identity table, diffs the
//!   running feature against the baseline and requests assembly of a merged
//!   runtime feature when needed
//!
//! ## Reconciliation
//!
//! 1. **Snapshot**: enumerate live components and configurations
//! 2. **Diff**: compare bundles and configurations against the baseline
//! 3. **Decide**: return the baseline as-is when nothing drifted
//! 4. **Merge**: otherwise assemble baseline + delta into a `runtime` feature
//!
//! Nothing is cached between calls; every reconciliation re-reads live state.
//!
//! # Example
//!
//! ```no_run
//! use r2f_engine::memory::StaticRuntime;
//! use r2f_engine::{CallContext, EngineConfig, Reconciler};
//! use std::sync::Arc;
//!
//! # async fn run() -> r2f_engine::ReconcileResult<()> {
//! let config = EngineConfig::default()
//!     .with_property("sling.feature", "/opt/app/launch.json")
//!     .with_property("sling.feature.apiregions.location", "/opt/app/data");
//! let runtime = Arc::new(StaticRuntime::new());
//!
//! let reconciler = Reconciler::start(&config, runtime.clone(), runtime).await?;
//! let runtime_feature = reconciler.reconciled_feature(&CallContext::new()).await?;
//! println!("{}", runtime_feature.id());
//! # Ok(())
//! # }
//! ```

mod collaborator;
mod config;
mod configuration;
mod context;
mod error;
mod identity;
pub mod location;
pub mod properties;
mod reconciler;
mod resolver;
pub mod runtime;
mod snapshot;

pub use collaborator::{DefaultFeatureAssembler, DefaultFeatureDiffer, FeatureAssembler, FeatureDiffer};
pub use config::EngineConfig;
pub use configuration::map_configuration;
pub use context::CallContext;
pub use error::{BoxError, ReconcileError, ReconcileResult};
pub use identity::{IdentityTable, IDBSNVER_FILENAME};
pub use properties::Properties;
pub use reconciler::{
    is_unchanged, load_baseline, ReconcilePhase, Reconciler, COMPARED_CATEGORIES,
    LAUNCH_FEATURE_PROPERTY, RUNTIME_CLASSIFIER,
};
pub use resolver::{IdentityError, IdentityResolver, MAVEN_METADATA_PATH, POM_PROPERTIES};
pub use runtime::{
    memory, ComponentRegistry, ConfigurationService, LiveComponent, LiveConfiguration,
    SYSTEM_COMPONENT_ID,
};
pub use snapshot::{SnapshotAssembler, RUNNING_CLASSIFIER};

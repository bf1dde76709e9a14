//! Shared test helpers for engine tests.

#![allow(dead_code)]

use r2f_engine::memory::{StaticComponent, StaticRuntime};
use r2f_engine::{IdentityTable, LiveConfiguration, Reconciler};
use r2f_model::{Artifact, Configuration, Feature};
use r2f_types::{ArtifactId, ComponentVersion};
use serde_json::json;
use std::sync::Arc;

pub const BASELINE_ID: &str = "org.example:app:1.0";

pub fn id(s: &str) -> ArtifactId {
    ArtifactId::parse(s).unwrap()
}

pub fn version(s: &str) -> ComponentVersion {
    ComponentVersion::parse(s).unwrap()
}

/// Text of an embedded `pom.properties`.
pub fn pom(group: &str, artifact: &str, version: &str) -> String {
    format!("#Generated by Maven\ngroupId={group}\nartifactId={artifact}\nversion={version}\n")
}

/// The framework root component.
pub fn system_component() -> StaticComponent {
    StaticComponent::new(0, "org.apache.felix.framework", version("7.0.5")).with_start_order(0)
}

/// Identity table used by most tests: covers `core` and `api`, not `extra`.
pub fn table() -> IdentityTable {
    IdentityTable::parse(
        "org.example\\:core\\:1.0=org.example.core~1.0.0\n\
         org.example:api:1.0=org.example.api~1.0.0\n",
        "test table",
    )
    .unwrap()
}

pub fn core_component() -> StaticComponent {
    StaticComponent::new(1, "org.example.core", version("1.0.0")).with_start_order(10)
}

pub fn api_component() -> StaticComponent {
    StaticComponent::new(2, "org.example.api", version("1.0.0")).with_start_order(20)
}

/// A component only resolvable through its embedded metadata.
pub fn extra_component() -> StaticComponent {
    StaticComponent::new(3, "org.example.extra", version("2.0.0"))
        .with_start_order(30)
        .with_entry(
            "/META-INF/maven/org.example/extra/pom.properties",
            pom("org.example", "extra", "2.0"),
        )
}

pub fn service_a() -> LiveConfiguration {
    LiveConfiguration::new(
        "svc.A",
        [("enabled".to_string(), json!(true)), ("port".to_string(), json!(8080))]
            .into_iter()
            .collect(),
    )
}

pub fn service_b_factory() -> LiveConfiguration {
    LiveConfiguration::new(
        "svc.B~factoryX",
        [("hosts".to_string(), json!(["a.example", "b.example"]))]
            .into_iter()
            .collect(),
    )
}

/// Baseline declaring exactly what [`matching_runtime`] reports.
pub fn baseline() -> Feature {
    let mut feature = Feature::new(id(BASELINE_ID));
    feature
        .bundles
        .add(Artifact::new(id("org.example:core:1.0")).with_start_order(10));
    feature
        .bundles
        .add(Artifact::new(id("org.example:api:1.0")).with_start_order(20));
    feature.configurations.add(Configuration {
        pid: "svc.A".to_string(),
        properties: service_a().properties,
    });
    feature.configurations.add(Configuration {
        pid: "svc.B~factoryX".to_string(),
        properties: service_b_factory().properties,
    });
    feature
        .framework_properties
        .insert("org.osgi.framework.bootdelegation".to_string(), "sun.*".to_string());
    feature
}

/// A live system in the state [`baseline`] declares.
pub fn matching_runtime() -> Arc<StaticRuntime> {
    let runtime = StaticRuntime::new();
    runtime.add_component(system_component());
    runtime.add_component(core_component());
    runtime.add_component(api_component());
    runtime.put_configuration(service_a());
    runtime.put_configuration(service_b_factory());
    Arc::new(runtime)
}

pub fn reconciler(runtime: &Arc<StaticRuntime>) -> Reconciler {
    Reconciler::new(
        Arc::new(baseline()),
        Arc::new(table()),
        runtime.clone(),
        runtime.clone(),
    )
}

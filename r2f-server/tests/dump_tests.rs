use pretty_assertions::assert_eq;
use r2f_engine::location::LOCATION_PROPERTY;
use r2f_engine::{
    CallContext, ComponentRegistry, ConfigurationService, EngineConfig, Reconciler,
    IDBSNVER_FILENAME, LAUNCH_FEATURE_PROPERTY,
};
use r2f_server::{DumpError, DumpRuntime};
use r2f_types::ArtifactId;
use serde_json::json;
use std::fs;
use std::path::Path;
use std::sync::Arc;

fn id(s: &str) -> ArtifactId {
    ArtifactId::parse(s).unwrap()
}

fn write_dump(path: &Path, dump: serde_json::Value) {
    fs::write(path, serde_json::to_vec_pretty(&dump).unwrap()).unwrap();
}

fn base_dump() -> serde_json::Value {
    json!({
        "components": [
            { "id": 0, "symbolic_name": "org.apache.felix.framework", "version": "7.0.5" },
            { "id": 1, "symbolic_name": "org.example.core", "version": "1.0.0", "start_level": 10 },
            {
                "id": 2,
                "symbolic_name": "org.example.extra",
                "version": "2.0.0",
                "start_level": 20,
                "entries": {
                    "/META-INF/maven/org.example/extra/pom.properties":
                        "groupId=org.example\nartifactId=extra\nversion=2.0\n"
                }
            }
        ],
        "configurations": {
            "svc.A": { "port": 8080 },
            "svc.B~factoryX": { "hosts": ["a", "b"] }
        }
    })
}

// ── Reading ─────────────────────────────────────────────────────

#[tokio::test]
async fn components_and_configurations_are_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("runtime.json");
    write_dump(&path, base_dump());
    let runtime = DumpRuntime::new(&path);

    let components = runtime.components().await.unwrap();
    assert_eq!(components.len(), 3);
    assert_eq!(components[1].symbolic_name(), "org.example.core");
    assert_eq!(components[1].start_order(), 10);
    assert_eq!(components[0].start_order(), 1);

    let entry = components[2]
        .read_entry("/META-INF/maven/org.example/extra/pom.properties")
        .await
        .unwrap();
    assert!(entry.is_some());

    let configurations = runtime.list_configurations().await.unwrap();
    let pids: Vec<&str> = configurations.iter().map(|c| c.pid.as_str()).collect();
    assert_eq!(pids, vec!["svc.A", "svc.B~factoryX"]);
    assert_eq!(configurations[0].properties.get("port"), Some(&json!(8080)));
}

#[tokio::test]
async fn dump_is_reread_on_every_enumeration() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("runtime.json");
    write_dump(&path, base_dump());
    let runtime = DumpRuntime::new(&path);
    assert_eq!(runtime.components().await.unwrap().len(), 3);

    write_dump(&path, json!({ "components": [] }));
    assert!(runtime.components().await.unwrap().is_empty());
    assert!(runtime.list_configurations().await.unwrap().is_empty());
}

#[tokio::test]
async fn each_enumeration_sees_the_file_as_of_its_own_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("runtime.json");
    write_dump(&path, base_dump());
    let runtime = DumpRuntime::new(&path);
    assert_eq!(runtime.components().await.unwrap().len(), 3);

    write_dump(&path, json!({ "configurations": { "svc.C": {} } }));
    let configurations = runtime.list_configurations().await.unwrap();
    let pids: Vec<&str> = configurations.iter().map(|c| c.pid.as_str()).collect();
    assert_eq!(pids, vec!["svc.C"]);
}

#[tokio::test]
async fn missing_dump_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let runtime = DumpRuntime::new(dir.path().join("absent.json"));
    assert!(matches!(runtime.read().await, Err(DumpError::Io { .. })));
    assert!(runtime.components().await.is_err());
}

#[tokio::test]
async fn malformed_dump_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("runtime.json");
    fs::write(&path, r#"{ "components": [ { "id": "one" } ] }"#).unwrap();
    let runtime = DumpRuntime::new(&path);
    assert!(matches!(runtime.read().await, Err(DumpError::Parse { .. })));
}

// ── End to end ──────────────────────────────────────────────────

#[tokio::test]
async fn reconciles_a_dumped_runtime() {
    let dir = tempfile::tempdir().unwrap();
    let dump_path = dir.path().join("runtime.json");
    write_dump(&dump_path, base_dump());
    fs::write(
        dir.path().join(IDBSNVER_FILENAME),
        "org.example:core:1.0=org.example.core~1.0.0\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("launch.json"),
        serde_json::to_vec(&json!({
            "id": "org.example:app:1.0",
            "bundles": [ { "id": "org.example:core:1.0", "start-order": 10 } ],
            "configurations": { "svc.A": { "port": 8080 } }
        }))
        .unwrap(),
    )
    .unwrap();

    let config = EngineConfig::default()
        .with_property(
            LAUNCH_FEATURE_PROPERTY,
            dir.path().join("launch.json").display().to_string(),
        )
        .with_property(LOCATION_PROPERTY, dir.path().display().to_string());
    let runtime = Arc::new(DumpRuntime::new(&dump_path));
    let reconciler = Reconciler::start(&config, runtime.clone(), runtime).await.unwrap();

    let merged = reconciler.reconciled_feature(&CallContext::new()).await.unwrap();
    assert_eq!(merged.id(), &id("org.example:app:1.0:runtime:slingosgifeature"));
    let bundles: Vec<String> = merged.bundles.ids().map(ToString::to_string).collect();
    assert_eq!(
        bundles,
        vec!["org.example:core:1.0".to_string(), "org.example:extra:2.0".to_string()]
    );
    assert!(merged.configurations.contains("svc.B~factoryX"));
}

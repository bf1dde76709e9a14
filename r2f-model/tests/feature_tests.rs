use r2f_model::{
    Artifact, Artifacts, ArtifactId, Configuration, Configurations, DiffCategory, Feature,
    FeatureProvider, Prototype,
};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

fn id(s: &str) -> ArtifactId {
    ArtifactId::parse(s).unwrap()
}

// ── Artifacts ────────────────────────────────────────────────────

#[test]
fn artifacts_are_unique_by_identity() {
    let mut bundles = Artifacts::new();
    assert!(bundles.add(Artifact::new(id("g:a:1"))).is_none());
    let replaced = bundles.add(Artifact::new(id("g:a:1")).with_start_order(20));
    assert!(replaced.is_some());
    assert_eq!(bundles.len(), 1);
    assert_eq!(bundles.get(&id("g:a:1")).unwrap().start_order, Some(20));
}

#[test]
fn artifacts_iterate_in_identity_order() {
    let bundles: Artifacts = ["z:z:1", "a:a:1", "m:m:1"]
        .iter()
        .map(|s| Artifact::new(id(s)))
        .collect();
    let ids: Vec<String> = bundles.ids().map(ToString::to_string).collect();
    assert_eq!(ids, vec!["a:a:1", "m:m:1", "z:z:1"]);
}

#[test]
fn artifacts_remove_and_contains() {
    let mut bundles = Artifacts::new();
    bundles.add(Artifact::new(id("g:a:1")));
    assert!(bundles.contains(&id("g:a:1")));
    assert!(bundles.remove(&id("g:a:1")).is_some());
    assert!(!bundles.contains(&id("g:a:1")));
    assert!(bundles.is_empty());
}

#[test]
fn duplicate_bundles_rejected_on_deserialize() {
    let res: Result<Artifacts, _> = serde_json::from_value(json!(["g:a:1", {"id": "g:a:1"}]));
    let err = res.unwrap_err();
    assert!(err.to_string().contains("duplicate bundle"));
}

#[test]
fn bare_bundle_serializes_as_string() {
    let value = serde_json::to_value(Artifact::new(id("g:a:1"))).unwrap();
    assert_eq!(value, json!("g:a:1"));
}

#[test]
fn bundle_with_start_order_serializes_as_object() {
    let mut artifact = Artifact::new(id("g:a:1")).with_start_order(5);
    artifact.metadata.insert("run-modes".into(), json!("author"));
    let value = serde_json::to_value(&artifact).unwrap();
    assert_eq!(value, json!({"id": "g:a:1", "start-order": 5, "run-modes": "author"}));

    let back: Artifact = serde_json::from_value(value).unwrap();
    assert_eq!(back, artifact);
}

// ── Configurations ───────────────────────────────────────────────

#[test]
fn factory_pid_parts() {
    let plain = Configuration::new("svc.A");
    assert!(!plain.is_factory());
    assert_eq!(plain.factory_pid(), None);

    let factory = Configuration::new("svc.B~factoryX");
    assert!(factory.is_factory());
    assert_eq!(factory.factory_pid(), Some("svc.B"));
    assert_eq!(factory.name(), Some("factoryX"));
}

#[test]
fn configurations_serialize_as_pid_map() {
    let configs: Configurations = vec![
        Configuration::new("svc.A").with_property("port", 8080),
        Configuration::new("svc.B~x").with_property("names", json!(["a", "b"])),
    ]
    .into_iter()
    .collect();

    let value = serde_json::to_value(&configs).unwrap();
    assert_eq!(
        value,
        json!({"svc.A": {"port": 8080}, "svc.B~x": {"names": ["a", "b"]}})
    );
}

#[test]
fn configuration_values_keep_runtime_types() {
    let configs: Configurations =
        serde_json::from_value(json!({"pid": {"s": "x", "n": 3, "b": true, "l": [1, 2]}})).unwrap();
    let c = configs.get("pid").unwrap();
    assert!(c.properties["s"].is_string());
    assert!(c.properties["n"].is_number());
    assert!(c.properties["b"].is_boolean());
    assert!(c.properties["l"].is_array());
}

// ── Feature & Prototype ──────────────────────────────────────────

#[test]
fn new_feature_is_empty() {
    let f = Feature::new(id("g:f:1:base:slingosgifeature"));
    assert!(f.is_empty());
    assert!(f.prototype.is_none());
    assert_eq!(f.id().classifier(), Some("base"));
}

#[test]
fn empty_sections_are_omitted_from_json() {
    let f = Feature::new(id("g:f:1"));
    let value = serde_json::to_value(&f).unwrap();
    assert_eq!(value, json!({"id": "g:f:1"}));
}

#[test]
fn prototype_removals_round_trip() {
    let mut proto = Prototype::new(id("g:f:1"));
    proto.removals.bundles.insert(id("g:gone:1"));
    proto.removals.configurations.insert("old.pid".into());
    let value = serde_json::to_value(&proto).unwrap();
    assert_eq!(
        value,
        json!({"id": "g:f:1", "removals": {"bundles": ["g:gone:1"], "configurations": ["old.pid"]}})
    );
    assert!(!proto.removals.is_empty());
}

// ── DiffCategory ─────────────────────────────────────────────────

#[test]
fn diff_category_names() {
    assert_eq!(DiffCategory::Bundles.to_string(), "bundles");
    assert_eq!(
        "framework-properties".parse::<DiffCategory>().unwrap(),
        DiffCategory::FrameworkProperties
    );
    assert!("nope".parse::<DiffCategory>().is_err());
}

// ── FeatureProvider ──────────────────────────────────────────────

#[test]
fn map_provider_resolves_known_ids_only() {
    let f = Arc::new(Feature::new(id("g:f:1")));
    let mut map = BTreeMap::new();
    map.insert(f.id().clone(), Arc::clone(&f));

    let resolved = map.provide(&id("g:f:1")).unwrap();
    assert!(Arc::ptr_eq(&resolved, &f));
    assert!(map.provide(&id("g:other:1")).is_none());
}

//! Tests for resolver.rs: live component → artifact identity.

mod common;

use common::{id, pom, system_component, table, version};
use pretty_assertions::assert_eq;
use r2f_engine::memory::StaticComponent;
use r2f_engine::{CallContext, IdentityError, IdentityResolver, IdentityTable, ReconcileError};

fn unwrap_identity_error(err: ReconcileError) -> IdentityError {
    match err {
        ReconcileError::IdentityResolution(inner) => inner,
        other => panic!("expected identity resolution error, got {other:?}"),
    }
}

// ── Table path ──────────────────────────────────────────────────

#[tokio::test]
async fn table_entry_wins_over_embedded_metadata() {
    let table = table();
    let component = StaticComponent::new(7, "org.example.core", version("1.0.0")).with_entry(
        "/META-INF/maven/other/core/pom.properties",
        pom("other", "core", "9.9"),
    );

    let resolved = IdentityResolver::new(&table)
        .resolve(&component, &CallContext::new())
        .await
        .unwrap();
    assert_eq!(resolved, id("org.example:core:1.0"));
}

#[tokio::test]
async fn table_lookup_is_exact_on_version() {
    let table = table();
    let component = StaticComponent::new(7, "org.example.core", version("1.0.1"));

    let err = IdentityResolver::new(&table)
        .resolve(&component, &CallContext::new())
        .await
        .unwrap_err();
    assert!(matches!(unwrap_identity_error(err), IdentityError::NotFound { .. }));
}

#[tokio::test]
async fn feature_typed_identity_from_table() {
    let table = IdentityTable::parse("g:a:1.0:run:slingosgifeature=sym~1.0.0", "inline").unwrap();
    let component = StaticComponent::new(4, "sym", version("1.0.0"));

    let resolved = IdentityResolver::new(&table)
        .resolve(&component, &CallContext::new())
        .await
        .unwrap();
    assert_eq!(resolved, id("g:a:1.0:run:slingosgifeature"));
}

// ── Embedded metadata ───────────────────────────────────────────

#[tokio::test]
async fn embedded_metadata_is_the_fallback() {
    let table = IdentityTable::new();
    let component = StaticComponent::new(5, "org.example.extra", version("2.0.0")).with_entry(
        "/META-INF/maven/org.example/extra/pom.properties",
        "groupId=org.example\nartifactId=extra\nversion=2.0\nclassifier=tests\n",
    );

    let resolved = IdentityResolver::new(&table)
        .resolve(&component, &CallContext::new())
        .await
        .unwrap();
    assert_eq!(resolved, id("org.example:extra:2.0:tests"));
}

#[tokio::test]
async fn first_listed_metadata_wins() {
    let table = IdentityTable::new();
    let component = StaticComponent::new(5, "shaded", version("1.0.0"))
        .with_entry("/META-INF/maven/a/first/pom.properties", pom("a", "first", "1"))
        .with_entry("/META-INF/maven/b/second/pom.properties", pom("b", "second", "2"));

    let resolved = IdentityResolver::new(&table)
        .resolve(&component, &CallContext::new())
        .await
        .unwrap();
    assert_eq!(resolved, id("a:first:1"));
}

#[tokio::test]
async fn metadata_outside_maven_directory_is_ignored() {
    let table = IdentityTable::new();
    let component = StaticComponent::new(5, "stray", version("1.0.0"))
        .with_entry("/pom.properties", pom("g", "a", "1"));

    let err = IdentityResolver::new(&table)
        .resolve(&component, &CallContext::new())
        .await
        .unwrap_err();
    assert!(matches!(unwrap_identity_error(err), IdentityError::NotFound { .. }));
}

// ── Failures ────────────────────────────────────────────────────

#[tokio::test]
async fn no_table_entry_and_no_metadata_fails() {
    let table = IdentityTable::new();
    let component = StaticComponent::new(5, "anonymous", version("0.1.0"));

    let err = IdentityResolver::new(&table)
        .resolve(&component, &CallContext::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "identity_resolution");
    assert!(err.to_string().contains("anonymous"), "{err}");
}

#[tokio::test]
async fn blank_metadata_fails() {
    let table = IdentityTable::new();
    let component = StaticComponent::new(5, "blank", version("1.0.0")).with_entry(
        "/META-INF/maven/g/a/pom.properties",
        "groupId=\nartifactId=\nversion=\n",
    );

    let err = IdentityResolver::new(&table)
        .resolve(&component, &CallContext::new())
        .await
        .unwrap_err();
    assert!(matches!(unwrap_identity_error(err), IdentityError::InvalidMetadata { .. }));
}

#[tokio::test]
async fn empty_metadata_fails() {
    let table = IdentityTable::new();
    let component = StaticComponent::new(5, "empty", version("1.0.0"))
        .with_entry("/META-INF/maven/g/a/pom.properties", "");

    let err = IdentityResolver::new(&table)
        .resolve(&component, &CallContext::new())
        .await
        .unwrap_err();
    assert!(matches!(unwrap_identity_error(err), IdentityError::InvalidMetadata { .. }));
}

#[tokio::test]
async fn unreadable_metadata_fails() {
    let table = IdentityTable::new();
    let component = StaticComponent::new(5, "locked", version("1.0.0"))
        .with_unreadable_entry("/META-INF/maven/g/a/pom.properties")
        .with_entry("/META-INF/maven/h/b/pom.properties", pom("h", "b", "1"));

    let err = IdentityResolver::new(&table)
        .resolve(&component, &CallContext::new())
        .await
        .unwrap_err();
    match unwrap_identity_error(err) {
        IdentityError::Unreadable { resource, .. } => {
            assert_eq!(resource, "/META-INF/maven/g/a/pom.properties");
        }
        other => panic!("expected unreadable, got {other:?}"),
    }
}

#[tokio::test]
async fn cancelled_context_stops_metadata_lookup() {
    let table = IdentityTable::new();
    let component = StaticComponent::new(5, "org.example.extra", version("2.0.0"))
        .with_entry("/META-INF/maven/g/a/pom.properties", pom("g", "a", "1"));
    let ctx = CallContext::new();
    ctx.cancellation_token().cancel();

    let err = IdentityResolver::new(&table)
        .resolve(&component, &ctx)
        .await
        .unwrap_err();
    assert!(err.is_interrupted());
}

// ── Records ─────────────────────────────────────────────────────

#[tokio::test]
async fn system_component_has_no_record() {
    let table = table();
    let record = IdentityResolver::new(&table)
        .to_artifact(&system_component(), &CallContext::new())
        .await
        .unwrap();
    assert!(record.is_none());
}

#[tokio::test]
async fn record_carries_live_start_order() {
    let table = table();
    let component = StaticComponent::new(9, "org.example.api", version("1.0.0")).with_start_order(42);

    let record = IdentityResolver::new(&table)
        .to_artifact(&component, &CallContext::new())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.id, id("org.example:api:1.0"));
    assert_eq!(record.start_order, Some(42));
}

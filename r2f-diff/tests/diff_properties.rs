//! Property-based tests for diff/assemble consistency.
//!
//! For arbitrary previous/current bundle and configuration sets:
//! - assembling the delta on top of `previous` reproduces `current`
//! - diffing a feature against an equal copy yields an empty delta

use proptest::prelude::*;
use r2f_diff::{assemble, compare_features, DiffRequest};
use r2f_model::{Artifact, ArtifactId, Configuration, DiffCategory, Feature};
use std::collections::BTreeMap;
use std::sync::Arc;

fn bundle_strategy() -> impl Strategy<Value = Artifact> {
    (0u8..12, 1u8..4, prop::option::of(1u32..40)).prop_map(|(name, version, order)| {
        let mut a = Artifact::new(ArtifactId::new("g", format!("b{name}"), format!("{version}"), None, None));
        a.start_order = order;
        a
    })
}

fn config_strategy() -> impl Strategy<Value = Configuration> {
    (0u8..10, 0i64..5).prop_map(|(pid, value)| {
        Configuration::new(format!("svc.{pid}")).with_property("v", value)
    })
}

fn feature_strategy(classifier: &'static str) -> impl Strategy<Value = Feature> {
    (
        prop::collection::vec(bundle_strategy(), 0..8),
        prop::collection::vec(config_strategy(), 0..6),
    )
        .prop_map(move |(bundles, configs)| {
            let mut f = Feature::new(ArtifactId::new("g", "app", "1", Some(classifier), Some("slingosgifeature")));
            f.bundles = bundles.into_iter().collect();
            f.configurations = configs.into_iter().collect();
            f
        })
}

proptest! {
    #[test]
    fn assemble_after_diff_reproduces_current(
        previous in feature_strategy("launch"),
        current in feature_strategy("running"),
    ) {
        let previous = Arc::new(previous);
        let delta = compare_features(
            &DiffRequest::new(&previous, &current)
                .include(DiffCategory::Bundles)
                .include(DiffCategory::Configurations),
        );
        let mut provider = BTreeMap::new();
        provider.insert(previous.id().clone(), Arc::clone(&previous));

        let target = ArtifactId::new("g", "app", "1", Some("runtime"), Some("slingosgifeature"));
        let merged = assemble(&target, &provider, &[&delta]).unwrap();
        prop_assert_eq!(&merged.bundles, &current.bundles);
        prop_assert_eq!(&merged.configurations, &current.configurations);
    }

    #[test]
    fn self_diff_is_empty(feature in feature_strategy("launch")) {
        let copy = feature.clone();
        let delta = compare_features(&DiffRequest::new(&feature, &copy));
        prop_assert!(delta.bundles.is_empty());
        prop_assert!(delta.configurations.is_empty());
        prop_assert!(delta.prototype.unwrap().removals.is_empty());
    }
}

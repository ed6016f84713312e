//! Property-based tests for the sampler and classifier.

use lineage::analyzers::classify;
use lineage::sample::sample;
use proptest::prelude::*;

proptest! {
    /// Sampling twice with the same input and target is identical.
    #[test]
    fn sampler_is_deterministic(items in prop::collection::vec(any::<u32>(), 0..400), target in 0usize..50) {
        prop_assert_eq!(sample(&items, target), sample(&items, target));
    }

    /// Inputs at or under the target come back unchanged.
    #[test]
    fn sampler_identity_under_target(len in 0usize..100) {
        let items: Vec<usize> = (0..len).collect();
        prop_assert_eq!(sample(&items, len), items.clone());
        prop_assert_eq!(sample(&items, len + 10), items);
    }

    /// Sampling down always keeps both endpoints (target >= 2).
    #[test]
    fn sampler_keeps_endpoints(len in 3usize..2000, target in 2usize..100) {
        prop_assume!(len > target);
        let items: Vec<usize> = (0..len).collect();
        let sampled = sample(&items, target);
        prop_assert_eq!(*sampled.first().unwrap(), 0);
        prop_assert_eq!(*sampled.last().unwrap(), len - 1);
    }

    /// Output length never exceeds the target and order is preserved.
    #[test]
    fn sampler_bounds_and_order(len in 0usize..2000, target in 0usize..150) {
        let items: Vec<usize> = (0..len).collect();
        let sampled = sample(&items, target);
        if items.len() <= target {
            prop_assert_eq!(sampled.len(), items.len());
        } else {
            prop_assert!(sampled.len() <= target);
        }
        prop_assert!(sampled.windows(2).all(|w| w[0] < w[1]));
    }

    /// Any message containing a fix keyword classifies as a fix, wherever
    /// the keyword sits.
    #[test]
    fn classifier_finds_embedded_keyword(prefix in "[a-z ]{0,20}", suffix in "[a-z ]{0,20}") {
        let message = format!("{prefix}fix{suffix}");
        prop_assert!(classify::is_bug_fix(&message));
    }
}

#[test]
fn sampler_scenario_fifteen_hundred_to_one_hundred() {
    let items: Vec<usize> = (0..1500).collect();
    let sampled = sample(&items, 100);
    assert_eq!(sampled.len(), 100);
    assert_eq!(sampled[0], 0);
    assert_eq!(*sampled.last().unwrap(), 1499);
}

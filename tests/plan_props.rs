//! Property tests for plan generation
//!
//! Random DAGs (edges always point from a lower to a higher feature index,
//! so acyclicity holds by construction) must always yield topologically
//! valid, deterministic plans.

use std::collections::BTreeSet;

use proptest::prelude::*;

use sprig_cli::domain::{generate, DependencyEdge, Feature, FeatureId};
use sprig_cli::{FeatureRegistry, StrategyConfig};

fn feature_id(index: usize) -> FeatureId {
    format!("f{}", index).parse().unwrap()
}

fn fixture(n: usize, edge_pairs: &[(usize, usize)]) -> (FeatureRegistry, BTreeSet<DependencyEdge>) {
    let features: Vec<Feature> = (0..n)
        .map(|i| Feature::new(feature_id(i), format!("Feature number {}", i)))
        .collect();
    let registry = FeatureRegistry::new(features).unwrap();

    let edges: BTreeSet<DependencyEdge> = edge_pairs
        .iter()
        .map(|(i, j)| DependencyEdge::new(feature_id(*i), feature_id(*j)))
        .collect();

    (registry, edges)
}

fn dag_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (2usize..10).prop_flat_map(|n| {
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .collect();
        let len = pairs.len();
        (Just(n), proptest::sample::subsequence(pairs, 0..=len))
    })
}

proptest! {
    #[test]
    fn creation_order_is_a_valid_topological_order((n, edge_pairs) in dag_strategy()) {
        let (registry, edges) = fixture(n, &edge_pairs);
        let plan = generate(&registry, &edges, &StrategyConfig::default()).unwrap();

        prop_assert_eq!(plan.len(), n);

        for (index, entry) in plan.entries.iter().enumerate() {
            prop_assert_eq!(entry.creation_order, index);
        }

        let pos = |id: &FeatureId| {
            plan.entries
                .iter()
                .position(|e| &e.feature_id == id)
                .unwrap()
        };
        for (i, j) in &edge_pairs {
            prop_assert!(pos(&feature_id(*i)) < pos(&feature_id(*j)));
        }
    }

    #[test]
    fn plans_are_deterministic((n, edge_pairs) in dag_strategy()) {
        let run = || {
            let (registry, edges) = fixture(n, &edge_pairs);
            let plan = generate(&registry, &edges, &StrategyConfig::default()).unwrap();
            serde_json::to_vec(&plan).unwrap()
        };

        prop_assert_eq!(run(), run());
    }

    #[test]
    fn parents_exist_before_their_children((n, edge_pairs) in dag_strategy()) {
        let (registry, edges) = fixture(n, &edge_pairs);
        let plan = generate(&registry, &edges, &StrategyConfig::default()).unwrap();

        let has_predecessor = |id: &FeatureId| edges.iter().any(|e| &e.to == id);

        for (index, entry) in plan.entries.iter().enumerate() {
            if has_predecessor(&entry.feature_id) {
                // Parent must be a branch that already exists in the plan
                let parent_pos = plan.entries[..index]
                    .iter()
                    .position(|e| e.branch_name == entry.parent_branch);
                prop_assert!(parent_pos.is_some());
            } else {
                prop_assert_eq!(entry.parent_branch.as_str(), "main");
            }
        }
    }
}

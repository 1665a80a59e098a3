//! Heuristic dependency inference
//!
//! Compares features pairwise to decide which must land before which.
//! Heuristics are pure functions of the two features, so inference is
//! deterministic: no randomness, no reliance on call order.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::feature::Feature;
use super::graph::{DependencyEdge, DependencyGraph, GraphError};
use super::registry::FeatureRegistry;

/// Verdict of a pairwise heuristic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The first feature must land before the second
    ABeforeB,
    /// The second feature must land before the first
    BBeforeA,
}

/// A pluggable pairwise dependency heuristic
///
/// Implementations must be commutative: `relate(a, b)` and `relate(b, a)`
/// describe the same ordering (or both abstain). This keeps the inferred
/// edge set independent of pair enumeration order.
pub trait Heuristic {
    /// Short name used when reporting edge provenance
    fn name(&self) -> &'static str;

    /// Relates two features, or `None` when the heuristic has no opinion
    fn relate(&self, a: &Feature, b: &Feature) -> Option<Direction>;
}

/// Rank table for well-known tags; lower rank lands first
///
/// Roughly: infrastructure before data, data before security, security
/// before service surfaces, service surfaces before user-facing features.
const TAG_RANKS: &[(&str, u8)] = &[
    ("infrastructure", 0),
    ("build", 0),
    ("ci", 0),
    ("tooling", 0),
    ("database", 1),
    ("storage", 1),
    ("persistence", 1),
    ("migration", 1),
    ("security", 2),
    ("authentication", 2),
    ("auth", 2),
    ("authorization", 3),
    ("api", 3),
    ("backend", 3),
    ("payments", 3),
    ("user-profile", 4),
    ("user", 4),
    ("ui", 4),
    ("frontend", 4),
    ("notifications", 4),
    ("reporting", 4),
    ("analytics", 4),
];

/// Orders features by the architectural layer their tags place them in
///
/// A feature tagged `authentication` is inferred as a prerequisite for one
/// tagged `authorization` or `user-profile`. Features whose tags rank
/// equally, or carry no ranked tag at all, get no verdict.
pub struct TagLayering;

impl TagLayering {
    fn rank(feature: &Feature) -> Option<u8> {
        feature
            .tags
            .iter()
            .filter_map(|tag| {
                TAG_RANKS
                    .iter()
                    .find(|(name, _)| *name == tag.as_str())
                    .map(|(_, rank)| *rank)
            })
            .min()
    }
}

impl Heuristic for TagLayering {
    fn name(&self) -> &'static str {
        "tag-layering"
    }

    fn relate(&self, a: &Feature, b: &Feature) -> Option<Direction> {
        let rank_a = Self::rank(a)?;
        let rank_b = Self::rank(b)?;

        match rank_a.cmp(&rank_b) {
            Ordering::Less => Some(Direction::ABeforeB),
            Ordering::Greater => Some(Direction::BBeforeA),
            Ordering::Equal => None,
        }
    }
}

/// Orders features by textual reference
///
/// If one feature's name or description mentions the other's id or name as
/// a whole word, the mentioned feature is inferred as the prerequisite.
/// Mutual mention is ambiguous and yields no verdict.
pub struct NameReference;

impl NameReference {
    fn mentions(feature: &Feature, other: &Feature) -> bool {
        let needles = [other.id.slug(), other.name.trim().to_ascii_lowercase()];

        [Some(feature.name.as_str()), feature.description.as_deref()]
            .iter()
            .flatten()
            .any(|text| {
                let text = text.to_ascii_lowercase();
                needles
                    .iter()
                    .filter(|needle| !needle.is_empty())
                    .any(|needle| contains_word(&text, needle))
            })
    }
}

impl Heuristic for NameReference {
    fn name(&self) -> &'static str {
        "name-reference"
    }

    fn relate(&self, a: &Feature, b: &Feature) -> Option<Direction> {
        let a_mentions_b = Self::mentions(a, b);
        let b_mentions_a = Self::mentions(b, a);

        match (a_mentions_b, b_mentions_a) {
            (true, false) => Some(Direction::BBeforeA),
            (false, true) => Some(Direction::ABeforeB),
            _ => None,
        }
    }
}

/// Whole-word substring match; `text` and `needle` must already be lowercase
fn contains_word(text: &str, needle: &str) -> bool {
    let bytes = text.as_bytes();
    let mut start = 0;

    while let Some(pos) = text[start..].find(needle) {
        let at = start + pos;
        let end = at + needle.len();

        let bounded_left = at == 0 || !bytes[at - 1].is_ascii_alphanumeric();
        let bounded_right = end >= text.len() || !bytes[end].is_ascii_alphanumeric();
        if bounded_left && bounded_right {
            return true;
        }

        start = end;
    }

    false
}

/// The built-in heuristics, in the order they are consulted
///
/// The first verdict per pair wins; appending a heuristic never changes the
/// verdicts of earlier ones.
pub fn default_heuristics() -> Vec<Box<dyn Heuristic>> {
    vec![Box::new(TagLayering), Box::new(NameReference)]
}

/// An inferred edge plus the heuristic that produced it
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct InferredEdge {
    pub edge: DependencyEdge,
    pub heuristic: &'static str,
}

/// Infers dependency edges over all feature pairs with explicit heuristics
pub fn infer_with(
    registry: &FeatureRegistry,
    heuristics: &[Box<dyn Heuristic>],
) -> BTreeSet<InferredEdge> {
    let features: Vec<&Feature> = registry.iter().collect();
    let mut edges = BTreeSet::new();

    for i in 0..features.len() {
        for j in (i + 1)..features.len() {
            let (a, b) = (features[i], features[j]);

            for heuristic in heuristics {
                if let Some(direction) = heuristic.relate(a, b) {
                    let edge = match direction {
                        Direction::ABeforeB => DependencyEdge::new(a.id.clone(), b.id.clone()),
                        Direction::BBeforeA => DependencyEdge::new(b.id.clone(), a.id.clone()),
                    };
                    edges.insert(InferredEdge {
                        edge,
                        heuristic: heuristic.name(),
                    });
                    break;
                }
            }
        }
    }

    edges
}

/// Infers dependency edges using the default heuristics
pub fn infer(registry: &FeatureRegistry) -> BTreeSet<DependencyEdge> {
    infer_with(registry, &default_heuristics())
        .into_iter()
        .map(|inferred| inferred.edge)
        .collect()
}

/// Inferred plus declared edges, checked for acyclicity
///
/// This is the edge set the generator consumes; a cycle anywhere in the
/// combined relation fails here with every member id.
pub fn infer_and_check(registry: &FeatureRegistry) -> Result<BTreeSet<DependencyEdge>, GraphError> {
    let mut edges = infer(registry);
    edges.extend(registry.declared_edges());

    let graph = DependencyGraph::from_edges(registry.ids(), &edges)?;
    graph.check_acyclic()?;

    Ok(edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::feature::FeatureId;

    fn feature(id: &str, tags: &[&str]) -> Feature {
        let mut f = Feature::new(id.parse().unwrap(), format!("Feature {}", id));
        for tag in tags {
            f.add_tag(*tag);
        }
        f
    }

    fn registry(features: Vec<Feature>) -> FeatureRegistry {
        FeatureRegistry::new(features).unwrap()
    }

    fn id(s: &str) -> FeatureId {
        s.parse().unwrap()
    }

    #[test]
    fn empty_input_yields_no_edges() {
        let edges = infer(&registry(vec![]));
        assert!(edges.is_empty());
    }

    #[test]
    fn single_feature_yields_no_edges() {
        let edges = infer(&registry(vec![feature("auth", &["security"])]));
        assert!(edges.is_empty());
    }

    #[test]
    fn tag_layering_orders_auth_before_profile() {
        let edges = infer(&registry(vec![
            feature("auth", &["security"]),
            feature("profile", &["user"]),
        ]));

        assert_eq!(edges.len(), 1);
        assert!(edges.contains(&DependencyEdge::new(id("auth"), id("profile"))));
    }

    #[test]
    fn tag_layering_orders_database_before_api() {
        let heuristic = TagLayering;
        let db = feature("schema", &["database"]);
        let api = feature("rest", &["api"]);

        assert_eq!(heuristic.relate(&db, &api), Some(Direction::ABeforeB));
        assert_eq!(heuristic.relate(&api, &db), Some(Direction::BBeforeA));
    }

    #[test]
    fn tag_layering_abstains_on_equal_rank() {
        let heuristic = TagLayering;
        let a = feature("login", &["authentication"]);
        let b = feature("audit", &["security"]);

        assert_eq!(heuristic.relate(&a, &b), None);
    }

    #[test]
    fn tag_layering_abstains_without_ranked_tags() {
        let heuristic = TagLayering;
        let a = feature("a", &["misc"]);
        let b = feature("b", &["database"]);

        assert_eq!(heuristic.relate(&a, &b), None);
        assert_eq!(heuristic.relate(&b, &a), None);
    }

    #[test]
    fn tag_layering_uses_lowest_rank() {
        // Feature tagged both user-facing and database-level counts as
        // database-level for ordering.
        let heuristic = TagLayering;
        let mixed = feature("orm", &["ui", "database"]);
        let api = feature("rest", &["api"]);

        assert_eq!(heuristic.relate(&mixed, &api), Some(Direction::ABeforeB));
    }

    #[test]
    fn name_reference_orders_mentioned_feature_first() {
        let heuristic = NameReference;
        let auth = feature("auth", &[]);
        let mut profile = feature("profile", &[]);
        profile.set_description("Profile pages shown after auth succeeds");

        assert_eq!(heuristic.relate(&auth, &profile), Some(Direction::ABeforeB));
        assert_eq!(heuristic.relate(&profile, &auth), Some(Direction::BBeforeA));
    }

    #[test]
    fn name_reference_requires_whole_word() {
        let heuristic = NameReference;
        let auth = feature("auth", &[]);
        let mut author_pages = feature("authors", &[]);
        author_pages.set_description("Author biography pages");

        // "author" contains "auth" but is not a whole-word mention
        assert_eq!(heuristic.relate(&auth, &author_pages), None);
    }

    #[test]
    fn name_reference_abstains_on_mutual_mention() {
        let heuristic = NameReference;
        let mut a = feature("billing", &[]);
        a.set_description("Billing for invoices");
        let mut b = feature("invoices", &[]);
        b.set_description("Invoices created by billing");

        assert_eq!(heuristic.relate(&a, &b), None);
    }

    #[test]
    fn name_reference_matches_case_insensitively() {
        let heuristic = NameReference;
        let auth = feature("auth", &[]);
        let mut profile = feature("profile", &[]);
        profile.set_description("Requires AUTH to be in place");

        assert_eq!(heuristic.relate(&auth, &profile), Some(Direction::ABeforeB));
    }

    #[test]
    fn first_heuristic_verdict_wins() {
        // Tags order db before api; the description mentions the other
        // direction, but tag-layering is consulted first.
        let db = feature("schema", &["database"]);
        let mut api = feature("rest", &["api"]);
        api.set_description("The schema is generated from rest handlers");

        let edges = infer(&registry(vec![db, api]));
        assert!(edges.contains(&DependencyEdge::new(id("schema"), id("rest"))));
        assert_eq!(edges.len(), 1);
    }

    #[test]
    fn inference_is_deterministic() {
        let build = || {
            registry(vec![
                feature("infra", &["infrastructure"]),
                feature("db", &["database"]),
                feature("auth", &["security"]),
                feature("profile", &["user"]),
            ])
        };

        let first = infer(&build());
        let second = infer(&build());
        assert_eq!(first, second);
    }

    #[test]
    fn inference_is_order_independent() {
        let forward = infer(&registry(vec![
            feature("auth", &["security"]),
            feature("profile", &["user"]),
        ]));
        let reversed = infer(&registry(vec![
            feature("profile", &["user"]),
            feature("auth", &["security"]),
        ]));

        assert_eq!(forward, reversed);
    }

    #[test]
    fn provenance_is_reported() {
        let inferred = infer_with(
            &registry(vec![
                feature("auth", &["security"]),
                feature("profile", &["user"]),
            ]),
            &default_heuristics(),
        );

        let edge = inferred.iter().next().unwrap();
        assert_eq!(edge.heuristic, "tag-layering");
    }

    #[test]
    fn isolated_feature_gets_no_edges() {
        let edges = infer(&registry(vec![
            feature("auth", &["security"]),
            feature("profile", &["user"]),
            feature("logging", &[]),
        ]));

        assert!(edges
            .iter()
            .all(|e| e.from.as_str() != "logging" && e.to.as_str() != "logging"));
    }

    #[test]
    fn infer_and_check_merges_declared_edges() {
        let auth = feature("auth", &[]);
        let mut profile = feature("profile", &[]);
        profile.add_dependency(id("auth"));

        let edges = infer_and_check(&registry(vec![auth, profile])).unwrap();
        assert!(edges.contains(&DependencyEdge::new(id("auth"), id("profile"))));
    }

    #[test]
    fn infer_and_check_reports_declared_cycle() {
        let mut a = feature("a", &[]);
        a.add_dependency(id("b"));
        let mut b = feature("b", &[]);
        b.add_dependency(id("a"));

        let result = infer_and_check(&registry(vec![a, b]));
        assert_eq!(
            result.unwrap_err(),
            GraphError::CycleDetected(vec![id("a"), id("b")])
        );
    }

    #[test]
    fn contains_word_boundaries() {
        assert!(contains_word("needs auth first", "auth"));
        assert!(contains_word("auth", "auth"));
        assert!(contains_word("(auth)", "auth"));
        assert!(!contains_word("author", "auth"));
        assert!(!contains_word("oauth", "auth"));
        assert!(contains_word("re-run the auth flow", "auth"));
    }
}

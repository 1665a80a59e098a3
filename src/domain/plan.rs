//! Branch plan generation
//!
//! Maps an ordered feature set onto proposed git branches under a chosen
//! strategy. Purely computes data; creating the branches is the caller's
//! business.

use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::feature::{Feature, FeatureId};
use super::graph::{DependencyEdge, DependencyGraph, GraphError};
use super::registry::FeatureRegistry;

/// Branch name for gitflow's staged merges
const GITFLOW_INTEGRATION: &str = "develop";

#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error("Invalid strategy configuration: {0}")]
    InvalidConfig(String),

    #[error("Branch name collision: '{branch}' is produced by both '{first}' and '{second}'")]
    BranchNameCollision {
        branch: String,
        first: FeatureId,
        second: FeatureId,
    },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Branching strategy families
///
/// Each strategy carries a fixed merge topology; nothing about the merge
/// targets is discovered from the features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Short-lived branches merging straight back to the base branch
    #[default]
    Trunk,
    /// Feature branches merging into a `develop` integration branch
    Gitflow,
    /// Long-lived feature branches merging to the base branch
    FeatureBranch,
}

impl StrategyKind {
    /// Merge target table for the strategy
    fn merge_target(&self, base_branch: &str) -> String {
        match self {
            StrategyKind::Trunk | StrategyKind::FeatureBranch => base_branch.to_string(),
            StrategyKind::Gitflow => GITFLOW_INTEGRATION.to_string(),
        }
    }

    /// Returns a display label for the strategy
    pub fn label(&self) -> &'static str {
        match self {
            StrategyKind::Trunk => "trunk",
            StrategyKind::Gitflow => "gitflow",
            StrategyKind::FeatureBranch => "feature-branch",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for StrategyKind {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "trunk" => Ok(StrategyKind::Trunk),
            "gitflow" => Ok(StrategyKind::Gitflow),
            "feature-branch" | "feature_branch" => Ok(StrategyKind::FeatureBranch),
            other => Err(PlanError::InvalidConfig(format!(
                "unknown strategy '{}' (expected trunk, gitflow or feature-branch)",
                other
            ))),
        }
    }
}

/// Caller-supplied strategy configuration; never mutated by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Branch to cut root features from
    pub base_branch: String,

    /// Branch naming template ({feature} and {name} placeholders)
    pub naming_convention: String,

    /// Strategy family
    pub kind: StrategyKind,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            base_branch: "main".to_string(),
            naming_convention: "feature/{feature}".to_string(),
            kind: StrategyKind::Trunk,
        }
    }
}

impl StrategyConfig {
    /// Checked before any computation
    fn validate(&self) -> Result<(), PlanError> {
        if self.base_branch.trim().is_empty() {
            return Err(PlanError::InvalidConfig(
                "base_branch must not be empty".to_string(),
            ));
        }
        if !self.naming_convention.contains("{feature}")
            && !self.naming_convention.contains("{name}")
        {
            // A placeholder-free template maps every feature to one branch
            return Err(PlanError::InvalidConfig(format!(
                "naming_convention '{}' has no {{feature}} or {{name}} placeholder",
                self.naming_convention
            )));
        }
        Ok(())
    }
}

/// One feature mapped to a proposed branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchPlanEntry {
    /// The feature this branch implements
    pub feature_id: FeatureId,

    /// Rendered branch name
    pub branch_name: String,

    /// Branch to cut from
    pub parent_branch: String,

    /// Position in the creation sequence (0-based, topological)
    pub creation_order: usize,

    /// Branch this one merges back into
    pub merge_target: String,
}

/// An ordered branch plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchPlan {
    pub strategy: StrategyKind,
    pub base_branch: String,
    pub entries: Vec<BranchPlanEntry>,
}

impl BranchPlan {
    /// Looks up the entry for a feature
    pub fn entry(&self, id: &FeatureId) -> Option<&BranchPlanEntry> {
        self.entries.iter().find(|e| &e.feature_id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Turns arbitrary text into a branch-name-safe slug
///
/// Lowercases and keeps `[a-z0-9._/-]`; runs of anything else collapse to a
/// single `-`.
pub fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut pending_dash = false;

    for c in raw.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '/' | '-') {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

fn branch_name(template: &str, feature: &Feature) -> String {
    template
        .replace("{feature}", &slugify(feature.id.as_str()))
        .replace("{name}", &slugify(&feature.name))
}

/// Generates an ordered branch plan for the features and edge set
///
/// The plan's `creation_order` is a topological order over `edges`, ties
/// broken by declaration order then id; identical inputs always yield an
/// identical plan. Fails before any computation on malformed config, and
/// with the offending cycle's ids when the edge set is cyclic.
pub fn generate(
    registry: &FeatureRegistry,
    edges: &BTreeSet<DependencyEdge>,
    config: &StrategyConfig,
) -> Result<BranchPlan, PlanError> {
    config.validate()?;

    let graph = DependencyGraph::from_edges(registry.ids(), edges)?;
    let order = graph.topological_order(|id| {
        (
            registry.declaration_index(id).unwrap_or(usize::MAX),
            id.clone(),
        )
    })?;

    // Render branch names up front so collisions fail the whole plan
    let mut branches: Vec<String> = Vec::with_capacity(order.len());
    let mut seen: HashMap<String, FeatureId> = HashMap::new();
    for id in &order {
        let feature = registry
            .get(id)
            .ok_or_else(|| GraphError::FeatureNotFound(id.clone()))?;
        let branch = branch_name(&config.naming_convention, feature);

        match seen.entry(branch.clone()) {
            Entry::Occupied(entry) => {
                return Err(PlanError::BranchNameCollision {
                    branch,
                    first: entry.get().clone(),
                    second: id.clone(),
                });
            }
            Entry::Vacant(entry) => {
                entry.insert(id.clone());
            }
        }
        branches.push(branch);
    }

    let position: HashMap<FeatureId, usize> = order
        .iter()
        .enumerate()
        .map(|(pos, id)| (id.clone(), pos))
        .collect();

    let mut entries = Vec::with_capacity(order.len());
    for (creation_order, id) in order.iter().enumerate() {
        // Cut from the prerequisite that lands latest; its branch already
        // exists in the plan by the time this one is created.
        let parent_branch = graph
            .predecessors(id)
            .into_iter()
            .filter_map(|pred| position.get(&pred).copied())
            .max()
            .map(|pos| branches[pos].clone())
            .unwrap_or_else(|| config.base_branch.clone());

        entries.push(BranchPlanEntry {
            feature_id: id.clone(),
            branch_name: branches[creation_order].clone(),
            parent_branch,
            creation_order,
            merge_target: config.kind.merge_target(&config.base_branch),
        });
    }

    Ok(BranchPlan {
        strategy: config.kind,
        base_branch: config.base_branch.clone(),
        entries,
    })
}

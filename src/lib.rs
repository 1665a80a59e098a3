//! sprig - suggests git branch structure for feature-driven development
//!
//! sprig consumes a feature manifest (produced by an upstream project
//! analyzer), infers dependency relationships between the features, and
//! emits an ordered branch plan: branch names, creation order, parents and
//! merge targets. It never runs git itself.

pub mod cli;
pub mod domain;
pub mod render;
pub mod storage;

pub use domain::{
    BranchPlan, BranchPlanEntry, Feature, FeatureId, FeatureRegistry, StrategyConfig, StrategyKind,
};

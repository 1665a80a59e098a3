//! Domain models for sprig
//!
//! Contains the core planning logic without any I/O concerns.

mod feature;
mod graph;
mod infer;
mod plan;
mod registry;

pub use feature::{Complexity, Feature, FeatureError, FeatureId, Tag};
pub use graph::{DependencyEdge, DependencyGraph, GraphError};
pub use infer::{
    default_heuristics, infer, infer_and_check, infer_with, Direction, Heuristic, InferredEdge,
    NameReference, TagLayering,
};
pub use plan::{
    generate, slugify, BranchPlan, BranchPlanEntry, PlanError, StrategyConfig, StrategyKind,
};
pub use registry::{FeatureRegistry, RegistryError};

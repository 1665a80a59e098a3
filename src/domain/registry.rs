//! Feature registry
//!
//! Validation boundary between raw manifest data and the engine. The
//! inference and planning layers rely on its invariants: unique ids,
//! non-empty fields, canonical tags, resolvable declared dependencies.

use std::collections::HashMap;
use thiserror::Error;

use super::feature::{Feature, FeatureError, FeatureId};
use super::graph::DependencyEdge;

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("Duplicate feature id: {0}")]
    DuplicateId(FeatureId),

    #[error("Feature '{feature}' depends on unknown feature '{depends_on}'")]
    UnknownDependency {
        feature: FeatureId,
        depends_on: FeatureId,
    },

    #[error(transparent)]
    Feature(#[from] FeatureError),
}

/// A validated collection of features, in declaration order
///
/// Declaration order is preserved because it is the secondary sort key for
/// the branch plan: ties in the topological order break on
/// `(declaration index, id)`.
#[derive(Debug, Clone, Default)]
pub struct FeatureRegistry {
    features: Vec<Feature>,
    index: HashMap<FeatureId, usize>,
}

impl FeatureRegistry {
    /// Validates and registers a feature list
    pub fn new(features: Vec<Feature>) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(features.len());

        for (pos, feature) in features.iter().enumerate() {
            feature.validate()?;
            if index.insert(feature.id.clone(), pos).is_some() {
                return Err(RegistryError::DuplicateId(feature.id.clone()));
            }
        }

        for feature in &features {
            for dep in &feature.depends_on {
                if !index.contains_key(dep) {
                    return Err(RegistryError::UnknownDependency {
                        feature: feature.id.clone(),
                        depends_on: dep.clone(),
                    });
                }
            }
        }

        Ok(Self { features, index })
    }

    /// Looks up a feature by id
    pub fn get(&self, id: &FeatureId) -> Option<&Feature> {
        self.index.get(id).and_then(|pos| self.features.get(*pos))
    }

    /// Returns the position a feature was declared at
    pub fn declaration_index(&self, id: &FeatureId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Iterates over features in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// Iterates over feature ids in declaration order
    pub fn ids(&self) -> impl Iterator<Item = &FeatureId> {
        self.features.iter().map(|f| &f.id)
    }

    /// Edges declared in the manifest via `depends_on`
    pub fn declared_edges(&self) -> Vec<DependencyEdge> {
        self.features
            .iter()
            .flat_map(|feature| {
                feature
                    .depends_on
                    .iter()
                    .map(|dep| DependencyEdge::new(dep.clone(), feature.id.clone()))
            })
            .collect()
    }

    /// Returns the number of features
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns true if no features are registered
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

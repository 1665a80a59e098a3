//! Feature domain model
//!
//! Features are the units of project functionality the planner branches
//! around. They arrive from an upstream analyzer via the manifest and are
//! immutable once registered.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FeatureError {
    #[error("Feature id must not be empty")]
    EmptyId,

    #[error("Invalid feature id '{0}': only ASCII letters, digits, '-', '_' and '.' are allowed")]
    InvalidId(String),

    #[error("Feature '{0}' has an empty name")]
    EmptyName(FeatureId),
}

/// Identifier for a feature, as assigned by the upstream analyzer
///
/// Ids are compared case-sensitively; [`FeatureId::slug`] gives the lowercase
/// form used in branch names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FeatureId(String);

impl FeatureId {
    pub fn new(raw: impl Into<String>) -> Result<Self, FeatureError> {
        let raw = raw.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(FeatureError::EmptyId);
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(FeatureError::InvalidId(trimmed.to_string()));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase form used for branch-name slugs and mention matching
    pub fn slug(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FeatureId {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for FeatureId {
    type Error = FeatureError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FeatureId> for String {
    fn from(id: FeatureId) -> Self {
        id.0
    }
}

/// A metadata tag, normalized to lowercase so comparison is canonical
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Tag(String);

impl Tag {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Tag {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.0
    }
}

/// Estimated implementation complexity of a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Low,
    #[default]
    Medium,
    High,
}

impl Complexity {
    /// Returns a display label for the complexity
    pub fn label(&self) -> &'static str {
        match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
        }
    }
}

/// A unit of project functionality identified for branching purposes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Unique identifier
    pub id: FeatureId,

    /// Human-readable name
    pub name: String,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Metadata tags (normalized to lowercase)
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<Tag>,

    /// Estimated implementation complexity
    #[serde(default)]
    pub complexity: Complexity,

    /// Explicitly declared prerequisites (features that must land first)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<FeatureId>,
}

impl Feature {
    /// Creates a new feature with the given id and name
    pub fn new(id: FeatureId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            tags: BTreeSet::new(),
            complexity: Complexity::default(),
            depends_on: Vec::new(),
        }
    }

    /// Adds a tag (normalized on insertion)
    pub fn add_tag(&mut self, tag: impl Into<Tag>) {
        self.tags.insert(tag.into());
    }

    /// Sets the description
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    /// Declares a prerequisite feature
    pub fn add_dependency(&mut self, id: FeatureId) {
        if !self.depends_on.contains(&id) {
            self.depends_on.push(id);
        }
    }

    /// Returns true if the feature carries the given tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(&Tag::new(tag))
    }

    /// Checks the invariants the registry relies on
    pub fn validate(&self) -> Result<(), FeatureError> {
        if self.name.trim().is_empty() {
            return Err(FeatureError::EmptyName(self.id.clone()));
        }
        Ok(())
    }
}

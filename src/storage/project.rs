//! Project management
//!
//! Handles project initialization and lookup of the `.sprig/` directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::{manifest, Config};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a sprig project. Run 'sprig init' first.")]
    NotInProject,
}

/// A sprig project
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(".sprig").is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let sprig_dir = root.join(".sprig");

        fs::create_dir_all(&sprig_dir).with_context(|| {
            format!("Failed to create .sprig directory: {}", sprig_dir.display())
        })?;

        let config_path = sprig_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# sprig configuration

# Path to the feature manifest, relative to the project root.
# When unset, sprig looks for .sprig/features.json, then features.{json,yaml,yml,toml}.
# manifest = "features.json"

[strategy]
# Branch that root features are cut from
base_branch = "main"

# Branch naming template; {feature} is the feature id slug, {name} the name slug
naming_convention = "feature/{feature}"

# Branching strategy: trunk, gitflow or feature_branch
kind = "trunk"
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let sample_path = sprig_dir.join("features.json");
        if !sample_path.exists() {
            manifest::write_sample(&sample_path)?;
        }

        Self::open(root)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .sprig directory path
    pub fn sprig_dir(&self) -> PathBuf {
        self.root.join(".sprig")
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_creates_structure() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert!(project.sprig_dir().is_dir());
        assert!(project.sprig_dir().join("config.toml").is_file());
        assert!(project.sprig_dir().join("features.json").is_file());
    }

    #[test]
    fn init_is_idempotent() {
        let dir = TempDir::new().unwrap();

        Project::init(dir.path()).unwrap();
        Project::init(dir.path()).unwrap();

        assert!(dir.path().join(".sprig").is_dir());
    }

    #[test]
    fn init_default_config_parses() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert_eq!(project.config().project.strategy.base_branch, "main");
        assert_eq!(
            project.config().project.strategy.naming_convention,
            "feature/{feature}"
        );
    }

    #[test]
    fn open_existing_project() {
        let dir = TempDir::new().unwrap();
        Project::init(dir.path()).unwrap();

        let project = Project::open(dir.path()).unwrap();
        assert_eq!(project.root(), dir.path());
    }

    #[test]
    fn open_non_project_fails() {
        let dir = TempDir::new().unwrap();
        let result = Project::open(dir.path());

        assert!(result.is_err());
    }
}

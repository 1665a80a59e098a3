//! Feature manifest loading
//!
//! The manifest is the hand-off format from the upstream analyzer: a plain
//! feature list in JSON, YAML or TOML. The registry owns validation; this
//! store only parses.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::Feature;

use super::Config;

/// Locations probed, in order, when no manifest path is given
const DEFAULT_LOCATIONS: &[&str] = &[
    ".sprig/features.json",
    "features.json",
    "features.yaml",
    "features.yml",
    "features.toml",
];

/// On-disk manifest shape; all formats use a top-level `features` list
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    pub features: Vec<Feature>,
}

/// Loads the manifest a command should operate on
///
/// Precedence: explicit `--manifest` flag, then the project config's
/// `manifest` entry, then the default locations under the project root (or
/// the current directory outside a project).
pub fn load_features(config: &Config, flag: Option<&Path>) -> Result<Vec<Feature>> {
    if let Some(path) = flag {
        return read(path);
    }

    let root = match &config.project_root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("Failed to resolve current directory")?,
    };

    if let Some(configured) = &config.project.manifest {
        return read(&root.join(configured));
    }

    for candidate in DEFAULT_LOCATIONS {
        let path = root.join(candidate);
        if path.is_file() {
            return read(&path);
        }
    }

    bail!(
        "No feature manifest found (looked for {}). Pass --manifest <file>.",
        DEFAULT_LOCATIONS.join(", ")
    )
}

/// Reads and parses a manifest file; format is chosen by extension
pub fn read(path: &Path) -> Result<Vec<Feature>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {}", path.display()))?;

    let manifest: Manifest = match extension(path).as_str() {
        "json" => serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON manifest: {}", path.display()))?,
        "yaml" | "yml" => serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML manifest: {}", path.display()))?,
        "toml" => toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML manifest: {}", path.display()))?,
        other => bail!(
            "Unsupported manifest format '.{}' for {} (expected .json, .yaml or .toml)",
            other,
            path.display()
        ),
    };

    Ok(manifest.features)
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Writes a manifest; used by `sprig init` to scaffold an example
pub fn write_sample(path: &Path) -> Result<()> {
    let sample = r#"{
  "features": [
    {
      "id": "auth",
      "name": "User authentication",
      "description": "Login, logout and session handling",
      "tags": ["security", "authentication"],
      "complexity": "high"
    },
    {
      "id": "profile",
      "name": "User profile",
      "description": "Profile pages, shown once auth succeeds",
      "tags": ["user-profile"],
      "complexity": "medium"
    }
  ]
}
"#;

    fs::write(path, sample)
        .with_context(|| format!("Failed to write sample manifest: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn reads_json_manifest() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "features.json",
            r#"{"features": [{"id": "auth", "name": "Auth"}]}"#,
        );

        let features = read(&path).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].id.as_str(), "auth");
    }

    #[test]
    fn reads_yaml_manifest() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "features.yaml",
            "features:\n  - id: auth\n    name: Auth\n    tags: [security]\n",
        );

        let features = read(&path).unwrap();
        assert_eq!(features.len(), 1);
        assert!(features[0].has_tag("security"));
    }

    #[test]
    fn reads_toml_manifest() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "features.toml",
            "[[features]]\nid = \"auth\"\nname = \"Auth\"\ncomplexity = \"low\"\n",
        );

        let features = read(&path).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].complexity.label(), "low");
    }

    #[test]
    fn unsupported_extension_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "features.xml", "<features/>");

        let result = read(&path);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Unsupported manifest format"));
    }

    #[test]
    fn missing_file_reports_path() {
        let result = read(Path::new("/nonexistent/features.json"));
        assert!(result.is_err());
    }

    #[test]
    fn malformed_json_reports_parse_failure() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "features.json", "{ not json");

        let result = read(&path);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to parse JSON manifest"));
    }

    #[test]
    fn sample_manifest_parses() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("features.json");
        write_sample(&path).unwrap();

        let features = read(&path).unwrap();
        assert_eq!(features.len(), 2);
    }
}

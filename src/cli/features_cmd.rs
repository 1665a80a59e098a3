//! Feature listing and validation

use std::path::Path;

use anyhow::Result;

use super::output::Output;
use crate::domain::FeatureRegistry;
use crate::storage::{manifest, Config};

/// Load, validate and list the manifest's features
pub fn run(output: &Output, config: &Config, manifest_path: Option<&Path>) -> Result<()> {
    let features = manifest::load_features(config, manifest_path)?;
    output.verbose_ctx(
        "features",
        &format!("Loaded {} features from manifest", features.len()),
    );

    let registry = FeatureRegistry::new(features)?;

    if output.is_json() {
        let items: Vec<_> = registry.iter().collect();
        output.data(&items);
    } else if registry.is_empty() {
        println!("No features in manifest.");
    } else {
        println!("Features ({}):", registry.len());
        println!("{:<20} {:<32} {:<10} TAGS", "ID", "NAME", "COMPLEXITY");
        println!("{}", "-".repeat(84));
        for feature in registry.iter() {
            let tags = feature
                .tags
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            println!(
                "{:<20} {:<32} {:<10} {}",
                feature.id.as_str(),
                feature.name,
                feature.complexity.label(),
                tags
            );
        }
    }

    Ok(())
}

//! Branch plan suggestion

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;

use super::output::Output;
use crate::domain::{generate, infer_and_check, FeatureRegistry, StrategyKind};
use crate::render;
use crate::storage::{manifest, Config};

/// Run the full pipeline: load, validate, infer, plan, render
pub fn run(
    output: &Output,
    config: &Config,
    manifest_path: Option<&Path>,
    strategy: Option<&str>,
    base: Option<&str>,
    naming: Option<&str>,
    out: Option<&Path>,
) -> Result<()> {
    // Flags override the project config's [strategy] table
    let mut strategy_config = config.project.strategy.clone();
    if let Some(kind) = strategy {
        strategy_config.kind = kind.parse::<StrategyKind>()?;
    }
    if let Some(base) = base {
        strategy_config.base_branch = base.to_string();
    }
    if let Some(naming) = naming {
        strategy_config.naming_convention = naming.to_string();
    }

    let features = manifest::load_features(config, manifest_path)?;
    output.verbose_ctx(
        "suggest",
        &format!(
            "Planning {} features with the {} strategy, base '{}'",
            features.len(),
            strategy_config.kind,
            strategy_config.base_branch
        ),
    );

    let registry = FeatureRegistry::new(features)?;
    let edges = infer_and_check(&registry)?;
    output.verbose_ctx(
        "suggest",
        &format!("Dependency relation has {} edges", edges.len()),
    );

    let plan = generate(&registry, &edges, &strategy_config)?;

    if let Some(out_path) = out {
        let doc = render::workflow_markdown(&plan, &registry, Utc::now());
        fs::write(out_path, doc)
            .with_context(|| format!("Failed to write workflow: {}", out_path.display()))?;
        output.success(&format!(
            "Wrote workflow for {} branches to {}",
            plan.len(),
            out_path.display()
        ));
    } else if output.is_json() {
        output.data(&plan);
    } else {
        print!("{}", render::plan_table(&plan));
    }

    Ok(())
}

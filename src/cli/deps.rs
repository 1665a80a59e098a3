//! Dependency edge inspection
//!
//! Shows the relation the planner would use, with per-edge provenance so
//! heuristic verdicts can be checked by eye.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Result;

use super::output::Output;
use crate::domain::{
    default_heuristics, infer_with, DependencyEdge, DependencyGraph, FeatureRegistry,
};
use crate::storage::{manifest, Config};

/// Show the declared and inferred dependency edges
pub fn run(output: &Output, config: &Config, manifest_path: Option<&Path>) -> Result<()> {
    let features = manifest::load_features(config, manifest_path)?;
    let registry = FeatureRegistry::new(features)?;

    let declared = registry.declared_edges();
    let inferred = infer_with(&registry, &default_heuristics());

    output.verbose_ctx(
        "deps",
        &format!(
            "{} declared, {} inferred edges over {} features",
            declared.len(),
            inferred.len(),
            registry.len()
        ),
    );

    // Declared edges win the provenance label when both channels agree
    let mut rows: Vec<(&DependencyEdge, &str)> = Vec::new();
    for edge in &declared {
        rows.push((edge, "declared"));
    }
    for inferred_edge in &inferred {
        if !declared.contains(&inferred_edge.edge) {
            rows.push((&inferred_edge.edge, inferred_edge.heuristic));
        }
    }
    rows.sort();

    let combined: BTreeSet<DependencyEdge> = rows.iter().map(|(edge, _)| (*edge).clone()).collect();
    let graph = DependencyGraph::from_edges(registry.ids(), &combined)?;
    if let Some(members) = graph.cycle() {
        output.warn(&format!(
            "dependency cycle: {}; 'sprig suggest' will refuse this relation",
            members
                .iter()
                .map(|id| id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }

    if output.is_json() {
        let items: Vec<_> = rows
            .iter()
            .map(|(edge, source)| {
                serde_json::json!({
                    "from": edge.from,
                    "to": edge.to,
                    "source": source,
                })
            })
            .collect();
        output.data(&items);
    } else if rows.is_empty() {
        println!("No dependency edges.");
    } else {
        println!("Dependency edges ({}):", rows.len());
        println!("{:<20} {:<20} SOURCE", "BEFORE", "AFTER");
        println!("{}", "-".repeat(60));
        for (edge, source) in rows {
            println!(
                "{:<20} {:<20} {}",
                edge.from.as_str(),
                edge.to.as_str(),
                source
            );
        }
    }

    Ok(())
}

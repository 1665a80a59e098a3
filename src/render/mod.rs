//! Plan rendering
//!
//! Turns structured plans into human-readable artifacts. This is the
//! template-renderer boundary: the engine hands data over and nothing here
//! feeds back into planning. Timestamps are supplied by the caller so the
//! core stays clock-free.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::domain::{BranchPlan, FeatureRegistry};

/// Renders the plan as an aligned text table
pub fn plan_table(plan: &BranchPlan) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Branch plan ({} strategy, base '{}')",
        plan.strategy.label(),
        plan.base_branch
    );

    if plan.is_empty() {
        let _ = writeln!(out, "No features to plan.");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<6} {:<32} {:<24} MERGES INTO",
        "ORDER", "BRANCH", "PARENT"
    );
    let _ = writeln!(out, "{}", "-".repeat(88));

    for entry in &plan.entries {
        let _ = writeln!(
            out,
            "{:<6} {:<32} {:<24} {}",
            entry.creation_order, entry.branch_name, entry.parent_branch, entry.merge_target
        );
    }

    out
}

/// Renders the plan as a markdown workflow document
///
/// One section per branch in creation order, with the feature summary and
/// the suggested git commands. The commands are text for the reader; sprig
/// never runs git itself.
pub fn workflow_markdown(
    plan: &BranchPlan,
    registry: &FeatureRegistry,
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Branch workflow");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Generated by sprig on {} ({} strategy, base `{}`).",
        generated_at.format("%Y-%m-%d"),
        plan.strategy.label(),
        plan.base_branch
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "The commands below are suggestions for you to review and run; sprig does not touch the repository."
    );

    for entry in &plan.entries {
        let _ = writeln!(out);
        let _ = writeln!(out, "## {}. `{}`", entry.creation_order + 1, entry.branch_name);
        let _ = writeln!(out);

        if let Some(feature) = registry.get(&entry.feature_id) {
            let _ = writeln!(
                out,
                "- Feature: {} (`{}`)",
                feature.name, entry.feature_id
            );
            let _ = writeln!(out, "- Complexity: {}", feature.complexity.label());
        } else {
            let _ = writeln!(out, "- Feature: `{}`", entry.feature_id);
        }
        let _ = writeln!(out, "- Cut from: `{}`", entry.parent_branch);
        let _ = writeln!(out, "- Merge into: `{}`", entry.merge_target);

        if let Some(description) = registry
            .get(&entry.feature_id)
            .and_then(|f| f.description.as_deref())
        {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", description);
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "```bash");
        let _ = writeln!(out, "git checkout {}", entry.parent_branch);
        let _ = writeln!(out, "git checkout -b {}", entry.branch_name);
        let _ = writeln!(out, "# ... implement, then:");
        let _ = writeln!(out, "git checkout {}", entry.merge_target);
        let _ = writeln!(out, "git merge --no-ff {}", entry.branch_name);
        let _ = writeln!(out, "```");
    }

    out
}

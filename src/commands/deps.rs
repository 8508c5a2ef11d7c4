// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Deps command - direct requirements and the locked dependency graph

use super::Output;
use crate::graph::build_dependency_graph;
use crate::types::Origin;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Run the deps command
pub fn run(path: &Path, out: Output) -> Result<()> {
    info!("Analyzing dependencies: {}", path.display());

    let report = build_dependency_graph(path)
        .with_context(|| format!("Failed to analyze {}", path.display()))?;

    if out.json {
        return out.print_json(&report);
    }

    println!(
        "{} ({} production, {} development)",
        out.heading("Direct requirements"),
        report.stats.production_count,
        report.stats.development_count
    );
    for (name, constraint) in &report.production {
        println!("  {} {}", name, out.dim(constraint));
    }
    for (name, constraint) in &report.development {
        println!("  {} {} {}", name, out.dim(constraint), out.dim("[dev]"));
    }
    println!();

    if report.nodes.is_empty() {
        println!("No locked packages. Run 'composer update' to create composer.lock.");
        return Ok(());
    }

    println!(
        "{} ({} production, {} development, fingerprint {})",
        out.heading("Locked packages"),
        report.stats.locked_production,
        report.stats.locked_development,
        report.fingerprint
    );

    let mut nodes: Vec<_> = report.nodes.iter().collect();
    nodes.sort_by(|a, b| a.name.cmp(&b.name).then(a.origin.cmp(&b.origin)));
    for node in nodes {
        let dev = if node.origin == Origin::Development { " [dev]" } else { "" };
        println!(
            "  {} {}{}",
            node.name,
            node.version,
            out.dim(dev)
        );
        if !node.depends_on.is_empty() {
            let deps: Vec<_> = node.depends_on.iter().map(String::as_str).collect();
            println!("    requires: {}", deps.join(", "));
        }
        if !node.used_by.is_empty() {
            println!("    used by:  {}", node.used_by.len());
        }
    }

    Ok(())
}

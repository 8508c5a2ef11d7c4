// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Shared command - compares requirements across repositories

use super::Output;
use crate::shared::analyze_repositories;
use anyhow::Result;
use std::path::PathBuf;

/// Run the shared command; `strict` turns any version conflict into an error
pub fn run(paths: &[PathBuf], strict: bool, out: Output) -> Result<()> {
    let report = analyze_repositories(paths);

    if out.json {
        out.print_json(&report)?;
    } else {
        println!(
            "{} ({} packages across {} repositories)",
            out.heading("Shared dependencies"),
            report.total_packages,
            report.repositories.len()
        );
        for (package, repos) in &report.shared_dependencies {
            println!("  {} {}", package, out.dim(repos.join(", ")));
        }

        if !report.version_conflicts.is_empty() {
            println!();
            println!("{}", out.heading("Version conflicts"));
            for conflict in &report.version_conflicts {
                println!("  {}", out.bad(&conflict.package));
                for site in &conflict.constraints {
                    println!("    {} {}", site.repo, out.dim(&site.constraint));
                }
            }
        }

        for path in &report.skipped {
            eprintln!("Warning: could not read {}", path.display());
        }
    }

    if strict && !report.version_conflicts.is_empty() {
        anyhow::bail!("{} version conflict(s) found", report.version_conflicts.len());
    }
    Ok(())
}

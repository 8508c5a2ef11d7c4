// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Compliance command - checks files against the PSR-4 mappings

use super::Output;
use crate::compliance::check_namespace_compliance_with;
use crate::scanner::ScanConfig;
use crate::types::ViolationKind;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Run the compliance command; `strict` turns any violation into an error
pub fn run(path: &Path, config: &ScanConfig, strict: bool, out: Output) -> Result<()> {
    info!("Checking namespace mappings: {}", path.display());

    let report = check_namespace_compliance_with(path, config)
        .with_context(|| format!("Failed to check {}", path.display()))?;

    if out.json {
        out.print_json(&report)?;
    } else {
        println!("{}", out.heading("Mappings"));
        for mapping in &report.mappings {
            let dev = if mapping.is_dev_only { " [dev]" } else { "" };
            println!(
                "  {} -> {}{}",
                mapping.prefix,
                mapping.directories.join(", "),
                out.dim(dev)
            );
        }
        println!();

        let stats = &report.stats;
        println!(
            "Scanned {} files: {} compliant, {} violations",
            stats.files_scanned,
            out.good(stats.compliant_files),
            if stats.violation_count == 0 {
                out.good(stats.violation_count)
            } else {
                out.bad(stats.violation_count)
            }
        );

        for v in &report.violations {
            match (v.kind, &v.actual_namespace) {
                (ViolationKind::Mismatch, Some(actual)) => println!(
                    "  {} expected {} found {}",
                    v.file,
                    v.expected_namespace,
                    out.bad(actual)
                ),
                _ => println!(
                    "  {} expected {} {}",
                    v.file,
                    v.expected_namespace,
                    out.bad("(no namespace declaration)")
                ),
            }
        }
    }

    if strict && !report.is_compliant() {
        anyhow::bail!("{} namespace violation(s) found", report.stats.violation_count);
    }
    Ok(())
}

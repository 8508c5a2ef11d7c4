// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Namespace commands - repository-wide catalog and usage of one namespace

use super::Output;
use crate::catalog::{analyze_namespace_usage_with, scan_namespaces_with};
use crate::scanner::ScanConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// Run the namespaces command
pub fn run(path: &Path, config: &ScanConfig, out: Output) -> Result<()> {
    let catalog = scan_namespaces_with(path, config)
        .with_context(|| format!("Failed to scan {}", path.display()))?;

    if out.json {
        return out.print_json(&catalog);
    }

    println!(
        "{} ({} files)",
        out.heading(&format!("{} namespaces", catalog.namespaces.len())),
        catalog.total_files
    );
    for entry in &catalog.namespaces {
        println!(
            "  {} {}",
            entry.namespace,
            out.dim(format!(
                "{} files, {} types",
                entry.files.len(),
                entry.declared_types().count()
            ))
        );
    }

    if !catalog.files_without_namespace.is_empty() {
        println!();
        println!(
            "{}",
            out.heading(&format!(
                "{} files without namespace",
                catalog.files_without_namespace.len()
            ))
        );
        for file in &catalog.files_without_namespace {
            println!("  {file}");
        }
    }

    Ok(())
}

/// Run the usage command
pub fn run_usage(path: &Path, namespace: &str, config: &ScanConfig, out: Output) -> Result<()> {
    let usage = analyze_namespace_usage_with(path, namespace, config)
        .with_context(|| format!("Failed to scan {}", path.display()))?;

    if out.json {
        return out.print_json(&usage);
    }

    println!(
        "{} {} ({} usages)",
        out.heading("Namespace"),
        usage.namespace,
        usage.total_usages
    );

    println!("  defined in:");
    if usage.defined_in.is_empty() {
        println!("    {}", out.dim("(none)"));
    }
    for file in &usage.defined_in {
        println!("    {file}");
    }

    println!("  imported by:");
    if usage.imported_by.is_empty() {
        println!("    {}", out.dim("(none)"));
    }
    for site in &usage.imported_by {
        println!("    {} {}", site.file, out.dim(site.imports.join(", ")));
    }

    Ok(())
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Requirements shared across several repositories
//!
//! Each repository's manifest is read on its own; the direct requirements
//! (production and development, platform packages removed) are then merged
//! to find packages several repositories depend on and packages they
//! constrain differently. A repository whose manifest cannot be read is
//! skipped and listed in the report.

use crate::manifest::{read_manifest, summarize_dependencies};
use crate::types::Manifest;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A repository taking part in the analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    /// Manifest `name`, else the directory name
    pub name: String,
    /// Repository root
    pub path: PathBuf,
}

/// One repository's constraint on a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementSite {
    /// Repository name
    pub repo: String,
    /// Version constraint as written
    pub constraint: String,
}

/// A package constrained differently by several repositories
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionConflict {
    /// Package name
    pub package: String,
    /// Every repository's constraint, in input order
    pub constraints: Vec<RequirementSite>,
}

/// Result of a multi-repository analysis
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedReport {
    /// Repositories whose manifest was read, in input order
    pub repositories: Vec<Repository>,
    /// Packages required by more than one repository, with those repositories
    pub shared_dependencies: BTreeMap<String, Vec<String>>,
    /// Shared packages with more than one distinct constraint
    pub version_conflicts: Vec<VersionConflict>,
    /// Distinct packages required across all repositories
    pub total_packages: usize,
    /// Repositories per declared license
    pub common_licenses: BTreeMap<String, usize>,
    /// Roots whose manifest could not be read
    pub skipped: Vec<PathBuf>,
}

fn repository_name(root: &Path, manifest: &Manifest) -> String {
    manifest.name.clone().unwrap_or_else(|| {
        root.file_name()
            .map_or_else(|| root.display().to_string(), |n| n.to_string_lossy().into_owned())
    })
}

/// Compare the direct requirements of several repositories
#[must_use]
pub fn analyze_repositories(roots: &[PathBuf]) -> SharedReport {
    let loaded: Vec<_> = roots
        .par_iter()
        .map(|root| (root, read_manifest(root)))
        .collect();

    let mut report = SharedReport::default();
    // package -> (repo, constraint), in input order
    let mut usage: BTreeMap<String, Vec<RequirementSite>> = BTreeMap::new();

    for (root, manifest) in loaded {
        let manifest = match manifest {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!("Skipping {}: {}", root.display(), e);
                report.skipped.push(root.clone());
                continue;
            }
        };

        let name = repository_name(root, &manifest);
        let summary = summarize_dependencies(&manifest);

        // `require` wins over `require-dev` for the same package
        let mut requirements = summary.development;
        requirements.extend(summary.production);
        for (package, constraint) in requirements {
            usage.entry(package).or_default().push(RequirementSite {
                repo: name.clone(),
                constraint,
            });
        }

        for license in &manifest.license {
            *report.common_licenses.entry(license.clone()).or_default() += 1;
        }
        report.repositories.push(Repository {
            name,
            path: root.clone(),
        });
    }

    report.total_packages = usage.len();
    for (package, sites) in usage {
        if sites.len() < 2 {
            continue;
        }
        let mut constraints: Vec<&str> = sites.iter().map(|s| s.constraint.as_str()).collect();
        constraints.sort_unstable();
        constraints.dedup();
        let conflicting = constraints.len() > 1;

        report
            .shared_dependencies
            .insert(package.clone(), sites.iter().map(|s| s.repo.clone()).collect());
        if conflicting {
            report.version_conflicts.push(VersionConflict {
                package,
                constraints: sites,
            });
        }
    }

    info!(
        "Compared {} repositories: {} shared packages, {} version conflicts",
        report.repositories.len(),
        report.shared_dependencies.len(),
        report.version_conflicts.len()
    );
    report
}

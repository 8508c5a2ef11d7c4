// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! PSR-4 compliance checking
//!
//! Every file under a mapped directory must declare the namespace derived
//! from its location. Directories and files are checked in parallel; each
//! task returns its own [`Outcome`] and the outcomes are merged once all
//! tasks have finished.

use crate::error::Result;
use crate::manifest::{expected_namespace, namespace_mappings, read_manifest};
use crate::scanner::{find_source_files_in, relative_path, scan_file, ScanConfig};
use crate::types::{ComplianceViolation, FileInfo, NamespaceMapping, ViolationKind};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Aggregate counts of a compliance run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceStats {
    /// Number of mappings checked
    pub mapping_count: usize,
    /// Files read under mapped directories
    pub files_scanned: usize,
    /// Files declaring their expected namespace
    pub compliant_files: usize,
    /// Number of violations
    pub violation_count: usize,
}

/// Result of a compliance run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComplianceReport {
    /// Mappings from the manifest
    pub mappings: Vec<NamespaceMapping>,
    /// Violations sorted by file
    pub violations: Vec<ComplianceViolation>,
    /// Counts
    pub stats: ComplianceStats,
}

impl ComplianceReport {
    /// True when no violation was found
    #[must_use]
    pub fn is_compliant(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Partial result of one task
#[derive(Debug, Default)]
struct Outcome {
    files_scanned: usize,
    compliant_files: usize,
    violations: Vec<ComplianceViolation>,
}

impl Outcome {
    fn merge(mut self, other: Self) -> Self {
        self.files_scanned += other.files_scanned;
        self.compliant_files += other.compliant_files;
        self.violations.extend(other.violations);
        self
    }

    fn judge(file: String, expected: String, info: FileInfo) -> Self {
        let violation = match info.namespace {
            Some(actual) if actual == expected => None,
            Some(actual) => Some(ComplianceViolation {
                file,
                expected_namespace: expected,
                actual_namespace: Some(actual),
                kind: ViolationKind::Mismatch,
            }),
            None => Some(ComplianceViolation {
                file,
                expected_namespace: expected,
                actual_namespace: None,
                kind: ViolationKind::MissingDeclaration,
            }),
        };

        Self {
            files_scanned: 1,
            compliant_files: usize::from(violation.is_none()),
            violations: violation.into_iter().collect(),
        }
    }
}

/// Check the manifest's namespace mappings with the default scan options
pub fn check_namespace_compliance(repo_root: &Path) -> Result<ComplianceReport> {
    check_namespace_compliance_with(repo_root, &ScanConfig::default())
}

/// Check the manifest's namespace mappings
pub fn check_namespace_compliance_with(
    repo_root: &Path,
    config: &ScanConfig,
) -> Result<ComplianceReport> {
    let manifest = read_manifest(repo_root)?;
    let mappings = namespace_mappings(&manifest);
    check_mappings(repo_root, mappings, config)
}

/// Check explicit mappings against the tree under `repo_root`
pub fn check_mappings(
    repo_root: &Path,
    mappings: Vec<NamespaceMapping>,
    config: &ScanConfig,
) -> Result<ComplianceReport> {
    let outcome = {
        let tasks: Vec<(&NamespaceMapping, &str)> = mappings
            .iter()
            .flat_map(|m| m.directories.iter().map(move |d| (m, d.as_str())))
            .collect();

        tasks
            .par_iter()
            .map(|&(mapping, dir)| check_directory(repo_root, mapping, dir, config))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .fold(Outcome::default(), Outcome::merge)
    };

    let mut violations = outcome.violations;
    violations.sort();

    info!(
        "Checked {} files across {} mappings: {} compliant, {} violations",
        outcome.files_scanned,
        mappings.len(),
        outcome.compliant_files,
        violations.len()
    );

    Ok(ComplianceReport {
        stats: ComplianceStats {
            mapping_count: mappings.len(),
            files_scanned: outcome.files_scanned,
            compliant_files: outcome.compliant_files,
            violation_count: violations.len(),
        },
        mappings,
        violations,
    })
}

fn check_directory(
    repo_root: &Path,
    mapping: &NamespaceMapping,
    dir: &str,
    config: &ScanConfig,
) -> Result<Outcome> {
    let base = repo_root.join(dir);
    if !base.is_dir() {
        debug!("Mapped directory {} does not exist, skipping", base.display());
        return Ok(Outcome::default());
    }

    let files = find_source_files_in(&base, repo_root, config)?;
    debug!("{} -> {}: {} files", mapping.prefix, dir, files.len());

    Ok(judge_files(repo_root, &base, &mapping.prefix, &files, config))
}

/// Judge discovered files; files that can no longer be read are left out
fn judge_files(
    repo_root: &Path,
    base: &Path,
    prefix: &str,
    files: &[PathBuf],
    config: &ScanConfig,
) -> Outcome {
    files
        .par_iter()
        .filter_map(|path| {
            let info = scan_file(path, base, config)?;
            let expected = expected_namespace(prefix, Path::new(&info.path));
            Some(Outcome::judge(relative_path(path, repo_root), expected, info))
        })
        .reduce(Outcome::default, Outcome::merge)
}

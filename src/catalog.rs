// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Namespace catalog and usage analysis

use crate::error::Result;
use crate::scanner::{scan_path, ScanConfig};
use crate::types::{FileInfo, NamespaceEntry};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Every namespace declared in a repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceCatalog {
    /// Entries ordered by namespace
    pub namespaces: Vec<NamespaceEntry>,
    /// Files scanned, with or without a namespace
    pub total_files: usize,
    /// Files with no namespace declaration, sorted
    pub files_without_namespace: Vec<String>,
}

impl NamespaceCatalog {
    /// Merge scanned files into a catalog
    #[must_use]
    pub fn from_files(files: Vec<FileInfo>) -> Self {
        let total_files = files.len();
        let mut by_namespace: BTreeMap<String, NamespaceEntry> = BTreeMap::new();
        let mut files_without_namespace = Vec::new();

        for file in files {
            let Some(namespace) = file.namespace else {
                files_without_namespace.push(file.path);
                continue;
            };
            let entry = by_namespace
                .entry(namespace)
                .or_insert_with_key(|ns| NamespaceEntry {
                    namespace: ns.clone(),
                    ..Default::default()
                });
            entry.files.insert(file.path);
            entry.classes.extend(file.classes);
            entry.interfaces.extend(file.interfaces);
            entry.traits.extend(file.traits);
        }

        files_without_namespace.sort();
        Self {
            namespaces: by_namespace.into_values().collect(),
            total_files,
            files_without_namespace,
        }
    }

    /// Look up one namespace
    #[must_use]
    pub fn get(&self, namespace: &str) -> Option<&NamespaceEntry> {
        self.namespaces
            .binary_search_by(|e| e.namespace.as_str().cmp(namespace))
            .ok()
            .map(|i| &self.namespaces[i])
    }
}

/// A file importing names from the analyzed namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSite {
    /// Path relative to the repository root
    pub file: String,
    /// Matching imports, in file order
    pub imports: Vec<String>,
}

/// Where a namespace is defined and imported
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceUsage {
    /// The analyzed namespace
    pub namespace: String,
    /// Files declaring exactly this namespace
    pub defined_in: Vec<String>,
    /// Files importing names prefixed by it
    pub imported_by: Vec<ImportSite>,
    /// `defined_in` plus `imported_by`
    pub total_usages: usize,
}

impl NamespaceUsage {
    /// Partition scanned files by their relation to `namespace`.
    ///
    /// Imports match on a literal string prefix.
    #[must_use]
    pub fn from_files(namespace: &str, files: &[FileInfo]) -> Self {
        let defined_in: Vec<String> = files
            .iter()
            .filter(|f| f.namespace.as_deref() == Some(namespace))
            .map(|f| f.path.clone())
            .collect();

        let imported_by: Vec<ImportSite> = files
            .iter()
            .filter_map(|f| {
                let imports: Vec<String> = f
                    .imports
                    .iter()
                    .filter(|i| i.starts_with(namespace))
                    .cloned()
                    .collect();
                (!imports.is_empty()).then(|| ImportSite {
                    file: f.path.clone(),
                    imports,
                })
            })
            .collect();

        Self {
            namespace: namespace.to_string(),
            total_usages: defined_in.len() + imported_by.len(),
            defined_in,
            imported_by,
        }
    }
}

/// Catalog every namespace under `repo_root` with the default scan options
pub fn scan_namespaces(repo_root: &Path) -> Result<NamespaceCatalog> {
    scan_namespaces_with(repo_root, &ScanConfig::default())
}

/// Catalog every namespace under `repo_root`, ignoring manifest mappings
pub fn scan_namespaces_with(repo_root: &Path, config: &ScanConfig) -> Result<NamespaceCatalog> {
    let catalog = NamespaceCatalog::from_files(scan_path(repo_root, config)?);
    info!(
        "Found {} namespaces in {} files ({} without namespace)",
        catalog.namespaces.len(),
        catalog.total_files,
        catalog.files_without_namespace.len()
    );
    Ok(catalog)
}

/// Analyze where `namespace` is defined and imported, default scan options
pub fn analyze_namespace_usage(repo_root: &Path, namespace: &str) -> Result<NamespaceUsage> {
    analyze_namespace_usage_with(repo_root, namespace, &ScanConfig::default())
}

/// Analyze where `namespace` is defined and imported
pub fn analyze_namespace_usage_with(
    repo_root: &Path,
    namespace: &str,
    config: &ScanConfig,
) -> Result<NamespaceUsage> {
    let files = scan_path(repo_root, config)?;
    Ok(NamespaceUsage::from_files(namespace, &files))
}

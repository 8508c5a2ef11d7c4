// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Manifest reading - `composer.json`, `composer.lock` and PSR-4 mappings

use crate::error::{AnalysisError, Result};
use crate::graph::DependencyGraph;
use crate::types::{LockEntry, LockedPackages, Manifest, NamespaceMapping};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path};
use tracing::{debug, info};

/// Primary manifest file name
pub const MANIFEST_FILE: &str = "composer.json";
/// Lock file name
pub const LOCK_FILE: &str = "composer.lock";
/// Separator between namespace segments
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Reserved platform package names
const PLATFORM_NAMES: &[&str] = &[
    "php",
    "hhvm",
    "composer",
    "composer-plugin-api",
    "composer-runtime-api",
];
/// Prefixes reserved for runtime variants, extensions and system libraries
const PLATFORM_PREFIXES: &[&str] = &["php-", "ext-", "lib-"];

#[derive(Deserialize)]
struct LockFile {
    #[serde(default)]
    packages: Option<Vec<LockEntry>>,
    #[serde(rename = "packages-dev", default)]
    packages_dev: Option<Vec<LockEntry>>,
}

/// Direct requirements declared by the manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencySummary {
    /// `require`, platform packages removed
    pub production: BTreeMap<String, String>,
    /// `require-dev`, platform packages removed
    pub development: BTreeMap<String, String>,
    /// Number of production requirements
    pub production_count: usize,
    /// Number of development requirements
    pub development_count: usize,
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| AnalysisError::from_io(path, e))
}

/// Decode manifest JSON; `origin` is only used for error context
pub fn parse_manifest(content: &str, origin: &Path) -> Result<Manifest> {
    serde_json::from_str(content).map_err(|e| AnalysisError::validation(origin, &e))
}

/// Decode lock file JSON; `origin` is only used for error context
pub fn parse_lock(content: &str, origin: &Path) -> Result<LockedPackages> {
    let lock: LockFile =
        serde_json::from_str(content).map_err(|e| AnalysisError::validation(origin, &e))?;
    Ok(LockedPackages {
        production: lock.packages.unwrap_or_default(),
        development: lock.packages_dev.unwrap_or_default(),
    })
}

/// Read `composer.json` from the repository root
pub fn read_manifest(repo_root: &Path) -> Result<Manifest> {
    let path = repo_root.join(MANIFEST_FILE);
    let manifest = parse_manifest(&read_file(&path)?, &path)?;
    debug!(
        "Loaded manifest {} ({} require, {} require-dev)",
        manifest.name.as_deref().unwrap_or("<unnamed>"),
        manifest.require.len(),
        manifest.require_dev.len()
    );
    Ok(manifest)
}

/// Read `composer.lock` from the repository root.
///
/// A missing lock file yields no packages.
pub fn read_lock(repo_root: &Path) -> Result<LockedPackages> {
    let path = repo_root.join(LOCK_FILE);
    let content = match read_file(&path) {
        Ok(content) => content,
        Err(e) if e.is_not_found() => {
            info!("No {} in {}, dependency graph will be empty", LOCK_FILE, repo_root.display());
            return Ok(LockedPackages::default());
        }
        Err(e) => return Err(e),
    };
    let locked = parse_lock(&content, &path)?;
    debug!(
        "Loaded {} locked packages ({} dev)",
        locked.len(),
        locked.development.len()
    );
    Ok(locked)
}

/// Load the manifest and build the graph from the lock file
pub fn load_manifest_and_graph(repo_root: &Path) -> Result<(Manifest, DependencyGraph)> {
    let manifest = read_manifest(repo_root)?;
    let locked = read_lock(repo_root)?;
    Ok((manifest, DependencyGraph::from_locked(&locked)))
}

/// PSR-4 mappings, production first, each group ordered by prefix
#[must_use]
pub fn namespace_mappings(manifest: &Manifest) -> Vec<NamespaceMapping> {
    let sections = [(&manifest.autoload, false), (&manifest.autoload_dev, true)];

    sections
        .into_iter()
        .filter_map(|(autoload, dev)| autoload.as_ref().map(|a| (a, dev)))
        .flat_map(|(autoload, is_dev_only)| {
            autoload.psr4.iter().map(move |(prefix, dirs)| NamespaceMapping {
                prefix: prefix.clone(),
                directories: dirs.clone(),
                is_dev_only,
            })
        })
        .collect()
}

/// Namespace a file is expected to declare under a mapping.
///
/// `relative` is the file path relative to the mapping directory; only its
/// directory components contribute.
#[must_use]
pub fn expected_namespace(prefix: &str, relative: &Path) -> String {
    let base = prefix.trim_end_matches(NAMESPACE_SEPARATOR);
    let dirs: Vec<_> = relative
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect();

    let mut namespace = base.to_string();
    for dir in dirs {
        if !namespace.is_empty() {
            namespace.push(NAMESPACE_SEPARATOR);
        }
        namespace.push_str(&dir);
    }
    namespace
}

/// True for runtime, extension and library pseudo-packages.
///
/// Platform names never carry a vendor, so `phpunit/phpunit` is a package.
#[must_use]
pub fn is_platform_package(name: &str) -> bool {
    if name.contains('/') {
        return false;
    }
    let lower = name.to_ascii_lowercase();
    PLATFORM_NAMES.contains(&lower.as_str())
        || PLATFORM_PREFIXES.iter().any(|p| lower.starts_with(p))
}

/// Drop platform packages from a requirement map
#[must_use]
pub fn without_platform_packages(requires: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    requires
        .iter()
        .filter(|(name, _)| !is_platform_package(name))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Summarize the manifest's direct requirements
#[must_use]
pub fn summarize_dependencies(manifest: &Manifest) -> DependencySummary {
    let production = without_platform_packages(&manifest.require);
    let development = without_platform_packages(&manifest.require_dev);
    DependencySummary {
        production_count: production.len(),
        development_count: development.len(),
        production,
        development,
    }
}

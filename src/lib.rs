// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Depscope library - dependency graph and namespace analysis for Composer projects
//!
//! This crate reads `composer.json` and `composer.lock`, rebuilds the package
//! dependency graph with forward and reverse edges, detects circular
//! dependencies, and checks PSR-4 namespace mappings against the namespaces
//! the PHP sources actually declare.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod commands;
pub mod compliance;
pub mod config;
pub mod cycles;
pub mod error;
pub mod graph;
pub mod manifest;
pub mod scanner;
pub mod shared;

pub use error::{AnalysisError, Result};

/// Core data types shared by the analysis components
pub mod types {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use std::collections::{BTreeMap, BTreeSet};

    // =========================================================================
    // Manifest (composer.json)
    // =========================================================================

    /// Autoload section of a manifest
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Autoload {
        /// PSR-4 mappings: namespace prefix to one or more directories
        #[serde(rename = "psr-4", default, deserialize_with = "de::one_or_many_map")]
        pub psr4: BTreeMap<String, Vec<String>>,
    }

    /// Canonical form of `composer.json`
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Manifest {
        /// Package name (vendor/name)
        #[serde(default)]
        pub name: Option<String>,
        /// Package description
        #[serde(default)]
        pub description: Option<String>,
        /// Package type (library, project, ...)
        #[serde(rename = "type", default)]
        pub package_type: Option<String>,
        /// Licenses, normalized from a string or a list
        #[serde(default, deserialize_with = "de::one_or_many")]
        pub license: Vec<String>,
        /// Production requirements: name to version constraint
        #[serde(default, deserialize_with = "de::string_map")]
        pub require: BTreeMap<String, String>,
        /// Development requirements
        #[serde(rename = "require-dev", default, deserialize_with = "de::string_map")]
        pub require_dev: BTreeMap<String, String>,
        /// Production autoload rules
        #[serde(default)]
        pub autoload: Option<Autoload>,
        /// Development autoload rules
        #[serde(rename = "autoload-dev", default)]
        pub autoload_dev: Option<Autoload>,
    }

    // =========================================================================
    // Lock File (composer.lock)
    // =========================================================================

    /// A resolved package from `composer.lock`
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct LockEntry {
        /// Package name, unique within one origin
        pub name: String,
        /// Resolved version
        pub version: String,
        /// Package description
        #[serde(default)]
        pub description: Option<String>,
        /// Package type
        #[serde(rename = "type", default)]
        pub package_type: Option<String>,
        /// Declared licenses
        #[serde(rename = "license", default, deserialize_with = "de::one_or_many")]
        pub licenses: Vec<String>,
        /// Requirements, possibly including platform packages
        #[serde(rename = "require", default, deserialize_with = "de::string_map")]
        pub requires: BTreeMap<String, String>,
        /// Release time of the resolved version
        #[serde(rename = "time", default, deserialize_with = "de::release_time")]
        pub released_at: Option<DateTime<Utc>>,
    }

    impl LockEntry {
        /// Minimal entry, used by tests and benchmarks
        #[must_use]
        pub fn new(name: &str, version: &str) -> Self {
            Self {
                name: name.into(),
                version: version.into(),
                description: None,
                package_type: None,
                licenses: Vec::new(),
                requires: BTreeMap::new(),
                released_at: None,
            }
        }

        /// Add a requirement with a wildcard constraint
        #[must_use]
        pub fn requiring(mut self, name: &str) -> Self {
            self.requires.insert(name.into(), "*".into());
            self
        }
    }

    /// Entries of a lock file, split by origin
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct LockedPackages {
        /// `packages`
        pub production: Vec<LockEntry>,
        /// `packages-dev`
        pub development: Vec<LockEntry>,
    }

    impl LockedPackages {
        /// Total number of entries in both origins
        #[must_use]
        pub fn len(&self) -> usize {
            self.production.len() + self.development.len()
        }

        /// True when the lock file was absent or empty
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.production.is_empty() && self.development.is_empty()
        }
    }

    // =========================================================================
    // Dependency Graph
    // =========================================================================

    /// Which lock section a package came from
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Origin {
        /// `packages`
        Production,
        /// `packages-dev`
        Development,
    }

    /// A package in the dependency graph
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DependencyNode {
        /// Package name
        pub name: String,
        /// Resolved version
        pub version: String,
        /// Lock section
        pub origin: Origin,
        /// Installable packages this one requires
        pub depends_on: BTreeSet<String>,
        /// Packages requiring this one
        pub used_by: BTreeSet<String>,
        /// First declared license
        #[serde(skip_serializing_if = "Option::is_none")]
        pub license: Option<String>,
    }

    /// A closed walk: the first name reappears at the end
    pub type Cycle = Vec<String>;

    // =========================================================================
    // Namespace Mappings & Compliance
    // =========================================================================

    /// A PSR-4 rule mapping a namespace prefix to directories
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct NamespaceMapping {
        /// Namespace prefix, usually ending in `\`
        pub prefix: String,
        /// Directories relative to the repository root, in declared order
        pub directories: Vec<String>,
        /// Declared under `autoload-dev`
        pub is_dev_only: bool,
    }

    /// Kind of compliance violation
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    pub enum ViolationKind {
        /// Declared namespace differs from the expected one
        Mismatch,
        /// No namespace declaration found
        MissingDeclaration,
    }

    /// A file whose namespace does not match its mapped location
    #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ComplianceViolation {
        /// Path relative to the repository root, `/`-separated
        pub file: String,
        /// Namespace computed from the path
        pub expected_namespace: String,
        /// Namespace found in the file
        #[serde(skip_serializing_if = "Option::is_none")]
        pub actual_namespace: Option<String>,
        /// Violation kind
        pub kind: ViolationKind,
    }

    // =========================================================================
    // Source Files & Namespaces
    // =========================================================================

    /// Declarations extracted from one source file
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FileInfo {
        /// Path relative to the scanned root, `/`-separated
        pub path: String,
        /// First namespace declaration
        pub namespace: Option<String>,
        /// Class names
        pub classes: Vec<String>,
        /// Interface names
        pub interfaces: Vec<String>,
        /// Trait names
        pub traits: Vec<String>,
        /// Imported names from `use` statements
        pub imports: Vec<String>,
    }

    /// Everything known about one namespace across the repository
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct NamespaceEntry {
        /// Namespace name
        pub namespace: String,
        /// Files declaring it
        pub files: BTreeSet<String>,
        /// Declared classes
        pub classes: BTreeSet<String>,
        /// Declared interfaces
        pub interfaces: BTreeSet<String>,
        /// Declared traits
        pub traits: BTreeSet<String>,
    }

    impl NamespaceEntry {
        /// All declared type names, every category
        #[must_use]
        pub fn declared_types(&self) -> impl Iterator<Item = &str> {
            self.classes
                .iter()
                .chain(&self.interfaces)
                .chain(&self.traits)
                .map(String::as_str)
        }
    }

    mod de {
        use chrono::{DateTime, NaiveDateTime, Utc};
        use serde::{Deserialize, Deserializer};
        use std::collections::BTreeMap;

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            One(String),
            Many(Vec<String>),
        }

        impl From<OneOrMany> for Vec<String> {
            fn from(value: OneOrMany) -> Self {
                match value {
                    OneOrMany::One(s) => vec![s],
                    OneOrMany::Many(v) => v,
                }
            }
        }

        // PHP encodes an empty object as `[]`
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum MapOrEmpty<V> {
            Map(BTreeMap<String, V>),
            Empty([(); 0]),
        }

        impl<V> From<MapOrEmpty<V>> for BTreeMap<String, V> {
            fn from(value: MapOrEmpty<V>) -> Self {
                match value {
                    MapOrEmpty::Map(m) => m,
                    MapOrEmpty::Empty(_) => BTreeMap::new(),
                }
            }
        }

        pub(super) fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Ok(OneOrMany::deserialize(deserializer)?.into())
        }

        pub(super) fn one_or_many_map<'de, D>(
            deserializer: D,
        ) -> Result<BTreeMap<String, Vec<String>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw: BTreeMap<String, OneOrMany> = MapOrEmpty::deserialize(deserializer)?.into();
            Ok(raw.into_iter().map(|(k, v)| (k, v.into())).collect())
        }

        pub(super) fn string_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Ok(MapOrEmpty::deserialize(deserializer)?.into())
        }

        pub(super) fn release_time<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw = Option::<String>::deserialize(deserializer)?;
            Ok(raw.and_then(|s| {
                let parsed = parse_release_time(&s);
                if parsed.is_none() {
                    tracing::debug!("Ignoring unparseable release time: {}", s);
                }
                parsed
            }))
        }

        pub(super) fn parse_release_time(s: &str) -> Option<DateTime<Utc>> {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .or_else(|_| {
                    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.and_utc())
                })
                .ok()
        }
    }

}

/// Prelude for common imports
pub mod prelude {
    pub use crate::error::{AnalysisError, Result};
    pub use crate::types::*;
}

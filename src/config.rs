// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Sources, lowest precedence first: built-in defaults, a TOML file
//! (`--config` or `depscope.toml` in the platform config directory), then
//! `DEPSCOPE_*` environment variables (`DEPSCOPE_THREADS=4`,
//! `DEPSCOPE_SCAN__EXCLUDE=tests/fixtures,build`).

use crate::scanner::ScanConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the config directory
pub const CONFIG_FILE: &str = "depscope.toml";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Worker threads for parallel scans (default: one per core)
    pub threads: Option<usize>,
    /// Source scanning options
    pub scan: ScanConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            threads: None,
            scan: ScanConfig::default(),
        }
    }
}

impl Config {
    /// Dedicated worker pool when `threads` is set
    pub fn thread_pool(&self) -> Result<Option<rayon::ThreadPool>> {
        self.threads
            .map(|n| {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .context("Failed to build worker pool")
            })
            .transpose()
    }
}

/// Default location of the configuration file
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("org", "hyperpolymath", "depscope")
        .map(|d| d.config_dir().join(CONFIG_FILE))
}

/// Load configuration; an explicit `path` must exist, the default one may not
pub fn load(path: Option<&Path>) -> Result<Config> {
    let mut builder = config::Config::builder();

    match path {
        Some(p) => {
            builder = builder.add_source(config::File::from(p).required(true));
        }
        None => {
            if let Some(p) = default_path() {
                builder = builder.add_source(config::File::from(p).required(false));
            }
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("DEPSCOPE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("scan.extensions")
            .with_list_parse_key("scan.skip_dirs")
            .with_list_parse_key("scan.exclude"),
    );

    builder
        .build()
        .context("Failed to read configuration")?
        .try_deserialize()
        .context("Invalid configuration")
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Export command - exports the dependency graph to various formats

use crate::manifest::load_manifest_and_graph;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Graphviz DOT format
    Dot,
    /// JSON format
    Json,
}

impl ExportFormat {
    /// Parse format from string
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dot" | "graphviz" => Some(Self::Dot),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Get file extension for format
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Json => "json",
        }
    }
}

/// Which part of the graph to export
#[derive(Debug, Clone, Default)]
pub struct View {
    /// Only packages reachable from this one
    pub focus: Option<String>,
    /// Hops from `focus` (0 = unlimited)
    pub depth: usize,
    /// Leave out `packages-dev`
    pub no_dev: bool,
}

/// Run the export command
pub fn run(path: &Path, format: &str, output: Option<PathBuf>, view: &View) -> Result<()> {
    let export_format = ExportFormat::parse(format)
        .ok_or_else(|| anyhow::anyhow!("Unknown export format: {}. Supported: dot, json", format))?;
    info!("Exporting to {}", export_format.extension());

    let (_, full) = load_manifest_and_graph(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;

    let graph = full
        .subgraph(view.focus.as_deref(), view.depth, !view.no_dev)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Package {} is not in the locked graph",
                view.focus.as_deref().unwrap_or_default()
            )
        })?;

    if graph.is_empty() {
        eprintln!("Warning: No locked packages in {}.", path.display());
    }

    let content = match export_format {
        ExportFormat::Dot => graph.to_dot(),
        ExportFormat::Json => graph.to_json()?,
    };

    match output {
        Some(path) => {
            fs::write(&path, &content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            println!("Exported to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }

    Ok(())
}

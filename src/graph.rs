// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Dependency graph built from the lock file

use crate::error::Result;
use crate::manifest::{self, is_platform_package};
use crate::types::{DependencyNode, LockEntry, LockedPackages, Origin};
use anyhow::Context;
use petgraph::graph::{DiGraph, NodeIndex};
use rayon::prelude::*;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt::Write as _;
use std::path::Path;
use tracing::debug;

/// The package dependency graph with petgraph backing for algorithms
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Nodes in lock order, production first
    nodes: Vec<DependencyNode>,
    /// One graph node per package name, edges follow `depends_on`
    graph: DiGraph<String, ()>,
    /// Map from package name to graph node index
    node_indices: HashMap<String, NodeIndex>,
}

/// Requirement and lock counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyStats {
    /// Direct production requirements in the manifest
    pub production_count: usize,
    /// Direct development requirements in the manifest
    pub development_count: usize,
    /// Locked production packages
    pub locked_production: usize,
    /// Locked development packages
    pub locked_development: usize,
}

/// Result of the dependency graph operation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyReport {
    /// Direct production requirements, platform packages removed
    pub production: BTreeMap<String, String>,
    /// Direct development requirements, platform packages removed
    pub development: BTreeMap<String, String>,
    /// Every locked package with its edges
    pub nodes: Vec<DependencyNode>,
    /// Counts
    pub stats: DependencyStats,
    /// Fingerprint of the locked package set
    pub fingerprint: String,
}

/// Read the manifest and lock file under `repo_root` and build the graph report
pub fn build_dependency_graph(repo_root: &Path) -> Result<DependencyReport> {
    let (manifest, graph) = manifest::load_manifest_and_graph(repo_root)?;
    let summary = manifest::summarize_dependencies(&manifest);

    Ok(DependencyReport {
        stats: DependencyStats {
            production_count: summary.production_count,
            development_count: summary.development_count,
            locked_production: graph.count(Origin::Production),
            locked_development: graph.count(Origin::Development),
        },
        fingerprint: graph.fingerprint(),
        production: summary.production,
        development: summary.development,
        nodes: graph.into_nodes(),
    })
}

fn build_node(entry: &LockEntry, origin: Origin) -> DependencyNode {
    DependencyNode {
        name: entry.name.clone(),
        version: entry.version.clone(),
        origin,
        depends_on: entry
            .requires
            .keys()
            .filter(|name| !is_platform_package(name))
            .cloned()
            .collect(),
        used_by: BTreeSet::new(),
        license: entry.licenses.first().cloned(),
    }
}

impl DependencyGraph {
    /// Create a new empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from locked packages.
    ///
    /// Nodes are built independently in parallel; reverse edges are derived
    /// afterwards through a name index, linear in the number of edges.
    #[must_use]
    pub fn from_locked(locked: &LockedPackages) -> Self {
        let entries: Vec<(&LockEntry, Origin)> = locked
            .production
            .iter()
            .map(|e| (e, Origin::Production))
            .chain(locked.development.iter().map(|e| (e, Origin::Development)))
            .collect();

        let mut nodes: Vec<DependencyNode> = entries
            .par_iter()
            .map(|&(entry, origin)| build_node(entry, origin))
            .collect();

        let mut positions: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, node) in nodes.iter().enumerate() {
            positions.entry(node.name.clone()).or_default().push(i);
        }

        let mut reverse = Vec::new();
        for (user, node) in nodes.iter().enumerate() {
            for dep in &node.depends_on {
                for &target in positions.get(dep).map_or(&[][..], Vec::as_slice) {
                    if target != user {
                        reverse.push((target, node.name.clone()));
                    }
                }
            }
        }
        for (target, user) in reverse {
            nodes[target].used_by.insert(user);
        }

        let mut graph = Self {
            nodes,
            graph: DiGraph::new(),
            node_indices: HashMap::new(),
        };
        graph.rebuild_graph();

        debug!(
            "Built dependency graph: {} nodes, {} edges",
            graph.len(),
            graph.graph.edge_count()
        );
        graph
    }

    /// Rebuild the petgraph from the nodes
    fn rebuild_graph(&mut self) {
        self.graph.clear();
        self.node_indices.clear();

        for node in &self.nodes {
            if !self.node_indices.contains_key(&node.name) {
                let idx = self.graph.add_node(node.name.clone());
                self.node_indices.insert(node.name.clone(), idx);
            }
        }

        // A name present in both origins gets the union of their edges
        for node in &self.nodes {
            let from_idx = self.node_indices[&node.name];
            for dep in &node.depends_on {
                if let Some(&to_idx) = self.node_indices.get(dep) {
                    self.graph.update_edge(from_idx, to_idx, ());
                }
            }
        }
    }

    /// All nodes in lock order
    #[must_use]
    pub fn nodes(&self) -> &[DependencyNode] {
        &self.nodes
    }

    /// Consume the graph, keeping its nodes
    #[must_use]
    pub fn into_nodes(self) -> Vec<DependencyNode> {
        self.nodes
    }

    /// Get a node by name, preferring the production entry
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DependencyNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Get the node for a name in one origin
    #[must_use]
    pub fn get_in(&self, name: &str, origin: Origin) -> Option<&DependencyNode> {
        self.nodes
            .iter()
            .find(|n| n.name == name && n.origin == origin)
    }

    /// Names a package depends on, merged across origins and sorted
    #[must_use]
    pub fn dependencies_of(&self, name: &str) -> BTreeSet<&str> {
        self.nodes
            .iter()
            .filter(|n| n.name == name)
            .flat_map(|n| n.depends_on.iter().map(String::as_str))
            .collect()
    }

    /// Number of nodes from one origin
    #[must_use]
    pub fn count(&self, origin: Origin) -> usize {
        self.nodes.iter().filter(|n| n.origin == origin).count()
    }

    /// Get node count
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the graph is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The name-level petgraph
    #[must_use]
    pub fn name_graph(&self) -> &DiGraph<String, ()> {
        &self.graph
    }

    /// A view of the graph restricted by origin and, optionally, to what one
    /// package reaches.
    ///
    /// With a `focus`, only packages within `depth` hops along `depends_on`
    /// are kept (`depth` 0 = unlimited). Without one, `depth` is ignored.
    /// Edges leaving the view are dropped. Returns `None` when `focus` is
    /// not part of the view.
    #[must_use]
    pub fn subgraph(&self, focus: Option<&str>, depth: usize, include_dev: bool) -> Option<Self> {
        let in_view = |n: &DependencyNode| include_dev || n.origin == Origin::Production;

        let kept: HashSet<&str> = match focus {
            None => self
                .nodes
                .iter()
                .filter(|n| in_view(n))
                .map(|n| n.name.as_str())
                .collect(),
            Some(focus) => {
                let candidates: HashSet<&str> = self
                    .nodes
                    .iter()
                    .filter(|n| in_view(n))
                    .map(|n| n.name.as_str())
                    .collect();
                let start = candidates.get(focus).copied()?;

                let mut reached = HashSet::from([start]);
                let mut queue = VecDeque::from([(start, 0usize)]);
                while let Some((name, hops)) = queue.pop_front() {
                    if depth > 0 && hops >= depth {
                        continue;
                    }
                    for node in self.nodes.iter().filter(|n| n.name == name && in_view(n)) {
                        for dep in &node.depends_on {
                            if let Some(&dep) = candidates.get(dep.as_str()) {
                                if reached.insert(dep) {
                                    queue.push_back((dep, hops + 1));
                                }
                            }
                        }
                    }
                }
                reached
            }
        };

        let nodes = self
            .nodes
            .iter()
            .filter(|n| in_view(n) && kept.contains(n.name.as_str()))
            .map(|n| DependencyNode {
                depends_on: n
                    .depends_on
                    .iter()
                    .filter(|d| kept.contains(d.as_str()))
                    .cloned()
                    .collect(),
                used_by: n
                    .used_by
                    .iter()
                    .filter(|u| kept.contains(u.as_str()))
                    .cloned()
                    .collect(),
                ..n.clone()
            })
            .collect();

        let mut view = Self {
            nodes,
            graph: DiGraph::new(),
            node_indices: HashMap::new(),
        };
        view.rebuild_graph();
        debug!(
            "Subgraph of {} packages (focus: {}, depth: {}, dev: {})",
            view.len(),
            focus.unwrap_or("<all>"),
            depth,
            include_dev
        );
        Some(view)
    }

    /// Fingerprint of the locked set: SHA-256 over sorted `name@version`
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut pairs: Vec<String> = self
            .nodes
            .iter()
            .map(|n| format!("{}@{}", n.name, n.version))
            .collect();
        pairs.sort();

        let mut hasher = Sha256::new();
        hasher.update(pairs.join("|"));
        let hash = hasher.finalize();
        hex::encode(&hash[..8])
    }

    /// Export to DOT format for Graphviz
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph dependencies {\n");
        dot.push_str("  rankdir=LR;\n");
        dot.push_str("  node [shape=box, style=rounded];\n\n");

        for node in &self.nodes {
            let style = match node.origin {
                Origin::Production => "",
                Origin::Development => ", style=\"rounded,dashed\"",
            };
            let name = dot_escape(&node.name);
            let _ = writeln!(
                dot,
                "  \"{}\" [label=\"{}\\n{}\"{}];",
                name,
                name,
                dot_escape(&node.version),
                style
            );
        }

        dot.push('\n');

        for edge in self.graph.edge_indices() {
            if let Some((from, to)) = self.graph.edge_endpoints(edge) {
                let _ = writeln!(
                    dot,
                    "  \"{}\" -> \"{}\";",
                    dot_escape(&self.graph[from]),
                    dot_escape(&self.graph[to])
                );
            }
        }

        dot.push_str("}\n");
        dot
    }

    /// Export nodes to JSON
    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(&self.nodes).context("Failed to serialize graph to JSON")
    }
}

/// Escape a value for a quoted DOT identifier
fn dot_escape(value: &str) -> Cow<'_, str> {
    if value.contains(['"', '\\']) {
        Cow::Owned(value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        Cow::Borrowed(value)
    }
}

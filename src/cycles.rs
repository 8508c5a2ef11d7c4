// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Circular dependency detection
//!
//! Depth-first search over the name graph. Every back edge met during one
//! traversal yields one witness cycle: the current path from the first
//! occurrence of the target, closed with the target again. Start nodes and
//! successors are visited in name order, so the output is deterministic.
//! Overlapping and non-elementary cycles are reported as found; rotations
//! are not merged.

use crate::error::Result;
use crate::graph::DependencyGraph;
use crate::manifest;
use crate::types::Cycle;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// Result of cycle detection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// Cycles in discovery order
    pub cycles: Vec<Cycle>,
    /// Number of cycles
    pub count: usize,
}

/// Read the repository's lock file and report its circular dependencies
pub fn find_cycles(repo_root: &Path) -> Result<CycleReport> {
    let (_, graph) = manifest::load_manifest_and_graph(repo_root)?;
    let cycles = detect_cycles(&graph);
    if cycles.is_empty() {
        debug!("No circular dependencies among {} packages", graph.len());
    } else {
        info!("Found {} circular dependency chain(s)", cycles.len());
    }
    Ok(CycleReport {
        count: cycles.len(),
        cycles,
    })
}

struct Frame {
    node: NodeIndex,
    successors: Vec<NodeIndex>,
    next: usize,
}

fn sorted_successors(graph: &DiGraph<String, ()>, node: NodeIndex) -> Vec<NodeIndex> {
    let mut successors: Vec<NodeIndex> = graph.neighbors(node).collect();
    successors.sort_by(|a, b| graph[*a].cmp(&graph[*b]));
    successors.dedup();
    successors
}

/// Enumerate cycles in a built graph
#[must_use]
pub fn detect_cycles(graph: &DependencyGraph) -> Vec<Cycle> {
    let g = graph.name_graph();
    if !is_cyclic_directed(g) {
        return Vec::new();
    }

    let mut starts: Vec<NodeIndex> = g.node_indices().collect();
    starts.sort_by(|a, b| g[*a].cmp(&g[*b]));

    let mut visited = vec![false; g.node_count()];
    let mut on_stack = vec![false; g.node_count()];
    let mut path: Vec<NodeIndex> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut cycles = Vec::new();

    for start in starts {
        if visited[start.index()] {
            continue;
        }
        visited[start.index()] = true;
        on_stack[start.index()] = true;
        path.push(start);
        stack.push(Frame {
            node: start,
            successors: sorted_successors(g, start),
            next: 0,
        });

        while let Some(frame) = stack.last_mut() {
            if let Some(&target) = frame.successors.get(frame.next) {
                frame.next += 1;

                if !visited[target.index()] {
                    visited[target.index()] = true;
                    on_stack[target.index()] = true;
                    path.push(target);
                    stack.push(Frame {
                        node: target,
                        successors: sorted_successors(g, target),
                        next: 0,
                    });
                } else if on_stack[target.index()] {
                    if let Some(pos) = path.iter().position(|&n| n == target) {
                        let mut cycle: Cycle = path[pos..].iter().map(|&n| g[n].clone()).collect();
                        cycle.push(g[target].clone());
                        cycles.push(cycle);
                    }
                }
            } else {
                let node = frame.node;
                on_stack[node.index()] = false;
                path.pop();
                stack.pop();
            }
        }
    }

    cycles
}

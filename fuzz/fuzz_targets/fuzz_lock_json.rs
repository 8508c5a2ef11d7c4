// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]

use depscope::cycles::detect_cycles;
use depscope::graph::DependencyGraph;
use depscope::manifest::parse_lock;
use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    let data = if data.len() > 64 * 1024 {
        &data[..64 * 1024]
    } else {
        data
    };
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(locked) = parse_lock(text, Path::new("composer.lock")) else {
        return;
    };

    let graph = DependencyGraph::from_locked(&locked);
    for cycle in detect_cycles(&graph) {
        assert_eq!(cycle.first(), cycle.last());
    }
});

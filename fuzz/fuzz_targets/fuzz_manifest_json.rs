// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]

use depscope::manifest::{namespace_mappings, parse_manifest, summarize_dependencies};
use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(manifest) = parse_manifest(text, Path::new("composer.json")) {
        let _ = summarize_dependencies(&manifest);
        let _ = namespace_mappings(&manifest);
    }
});

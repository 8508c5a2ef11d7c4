// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Cycles command - reports circular dependency chains

use super::Output;
use crate::cycles::find_cycles;
use anyhow::{Context, Result};
use std::path::Path;

/// Run the cycles command; `strict` turns any cycle into an error
pub fn run(path: &Path, strict: bool, out: Output) -> Result<()> {
    let report =
        find_cycles(path).with_context(|| format!("Failed to analyze {}", path.display()))?;

    if out.json {
        out.print_json(&report)?;
    } else if report.cycles.is_empty() {
        println!("{}", out.good("No circular dependencies found"));
    } else {
        println!(
            "{}",
            out.bad(format!("Found {} circular dependency chain(s):", report.count))
        );
        for cycle in &report.cycles {
            println!("  {}", cycle.join(" -> "));
        }
    }

    if strict && report.count > 0 {
        anyhow::bail!("{} circular dependency chain(s) found", report.count);
    }
    Ok(())
}

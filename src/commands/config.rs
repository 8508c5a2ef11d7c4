// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Config command - shows the effective configuration

use super::Output;
use crate::config::{self, Config};
use anyhow::{Context, Result};

/// Show the whole configuration, or one dotted key such as `scan.exclude`
pub fn run(config: &Config, key: Option<&str>, out: Output) -> Result<()> {
    let value = serde_json::to_value(config).context("Failed to serialize configuration")?;

    let Some(key) = key else {
        if !out.json {
            match config::default_path() {
                Some(p) => println!("# config file: {}", p.display()),
                None => println!("# config file: (no config directory)"),
            }
        }
        return out.print_json(&value);
    };

    let pointer = format!("/{}", key.replace('.', "/"));
    let found = value
        .pointer(&pointer)
        .ok_or_else(|| anyhow::anyhow!("Unknown configuration key: {}", key))?;

    match found {
        serde_json::Value::String(s) if !out.json => println!("{s}"),
        other => out.print_json(other)?,
    }
    Ok(())
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod completions;
pub mod compliance;
pub mod config;
pub mod cycles;
pub mod deps;
pub mod export;
pub mod namespaces;
pub mod shared;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::fmt::Display;

/// How command results are printed
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    /// Print pretty JSON instead of text
    pub json: bool,
    /// Use ANSI colors in text output
    pub color: bool,
}

impl Output {
    /// Print a value as pretty JSON
    pub fn print_json<T: Serialize>(&self, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
        println!("{json}");
        Ok(())
    }

    /// Section heading
    #[must_use]
    pub fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Something that passed
    #[must_use]
    pub fn good(&self, text: impl Display) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    /// Something that needs attention
    #[must_use]
    pub fn bad(&self, text: impl Display) -> String {
        if self.color {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }

    /// Secondary detail
    #[must_use]
    pub fn dim(&self, text: impl Display) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}

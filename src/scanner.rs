// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Source scanning
//!
//! Walks a source tree and extracts declarations from each file with a
//! line-by-line lexical scan. This is not a parser: a keyword inside a
//! string or a comment matches like any other text unless
//! [`ScanConfig::strip_comments`] is set.

use crate::error::{AnalysisError, Result};
use crate::types::FileInfo;
use globset::{Glob, GlobSet, GlobSetBuilder};
use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

static NAMESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"namespace\s+([\w\\]+)\s*;").expect("namespace pattern"));
static CLASS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:abstract\s+)?class\s+(\w+)").expect("class pattern"));
static INTERFACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"interface\s+(\w+)").expect("interface pattern"));
static TRAIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"trait\s+(\w+)").expect("trait pattern"));
static USE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"use\s+([\w\\]+)(?:\s+as\s+\w+)?;").expect("use pattern"));

/// Options controlling which files are scanned and how
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// File extensions to scan, without the dot
    pub extensions: Vec<String>,
    /// Directory names never descended into, besides hidden ones
    pub skip_dirs: Vec<String>,
    /// Glob patterns, relative to the scanned root, excluded from the scan
    pub exclude: Vec<String>,
    /// Follow symbolic links
    pub follow_symlinks: bool,
    /// Maximum walk depth (0 = unlimited)
    pub max_depth: usize,
    /// Remove `//`, `#` and `/* */` comments before matching
    pub strip_comments: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["php".into()],
            skip_dirs: vec!["vendor".into(), "node_modules".into()],
            exclude: Vec::new(),
            follow_symlinks: false,
            max_depth: 0,
            strip_comments: false,
        }
    }
}

impl ScanConfig {
    fn exclude_set(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude {
            let glob = Glob::new(pattern).map_err(|e| AnalysisError::Validation {
                path: PathBuf::from("scan.exclude"),
                message: e.to_string(),
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|e| AnalysisError::Validation {
            path: PathBuf::from("scan.exclude"),
            message: e.to_string(),
        })
    }

    fn is_source(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)))
    }

    fn is_pruned_dir(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        name.starts_with('.') || self.skip_dirs.iter().any(|d| *d == name)
    }
}

/// Path relative to `base`, `/`-separated
#[must_use]
pub fn relative_path(path: &Path, base: &Path) -> String {
    let rel = path.strip_prefix(base).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Find every eligible source file under `root`, sorted.
///
/// Hidden directories and the configured dependency caches are pruned; the
/// root itself is always entered.
pub fn find_source_files(root: &Path, config: &ScanConfig) -> Result<Vec<PathBuf>> {
    find_source_files_in(root, root, config)
}

/// Like [`find_source_files`], matching exclusion globs against paths
/// relative to `glob_base` (the repository root) instead of `root`
pub fn find_source_files_in(
    root: &Path,
    glob_base: &Path,
    config: &ScanConfig,
) -> Result<Vec<PathBuf>> {
    let meta = fs::metadata(root).map_err(|e| AnalysisError::from_io(root, e))?;
    if !meta.is_dir() {
        return Err(AnalysisError::NotFound {
            path: root.to_path_buf(),
        });
    }

    let excluded = config.exclude_set()?;
    let mut walker = WalkDir::new(root).follow_links(config.follow_symlinks);
    if config.max_depth > 0 {
        walker = walker.max_depth(config.max_depth);
    }

    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 {
                return true;
            }
            if e.file_type().is_dir() && config.is_pruned_dir(e) {
                trace!("Pruning {}", e.path().display());
                return false;
            }
            excluded.is_empty() || !excluded.is_match(relative_path(e.path(), glob_base))
        })
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|e| e.file_type().is_file() && config.is_source(e.path()))
        .map(DirEntry::into_path)
        .collect();

    files.sort();
    Ok(files)
}

/// Tracks `/* */` comments across lines
#[derive(Debug, Default)]
struct CommentStripper {
    in_block: bool,
}

impl CommentStripper {
    fn strip(&mut self, line: &str) -> String {
        let bytes = line.as_bytes();
        let mut out = String::with_capacity(line.len());
        let mut start = 0;
        let mut i = 0;

        // Only ASCII markers are matched, so every slice bound is a char boundary
        while i < bytes.len() {
            let rest = &bytes[i..];
            if self.in_block {
                if rest.starts_with(b"*/") {
                    self.in_block = false;
                    i += 2;
                    start = i;
                } else {
                    i += 1;
                }
            } else if rest.starts_with(b"/*") {
                out.push_str(&line[start..i]);
                out.push(' ');
                self.in_block = true;
                i += 2;
            } else if rest.starts_with(b"//") || (rest[0] == b'#' && rest.get(1) != Some(&b'[')) {
                out.push_str(&line[start..i]);
                return out;
            } else {
                i += 1;
            }
        }

        if !self.in_block {
            out.push_str(&line[start..]);
        }
        out
    }
}

fn capture_into(re: &Regex, line: &str, out: &mut Vec<String>) {
    if let Some(caps) = re.captures(line) {
        out.push(caps[1].to_string());
    }
}

/// Extract declarations from source text.
///
/// Each pattern contributes at most one match per line; the first namespace
/// declaration in the file wins. The returned `path` is empty.
#[must_use]
pub fn scan_source(content: &str, strip_comments: bool) -> FileInfo {
    let mut info = FileInfo::default();
    let mut stripper = CommentStripper::default();

    for raw in content.lines() {
        let line: Cow<'_, str> = if strip_comments {
            Cow::Owned(stripper.strip(raw))
        } else {
            Cow::Borrowed(raw)
        };

        if info.namespace.is_none() {
            if let Some(caps) = NAMESPACE_RE.captures(&line) {
                info.namespace = Some(caps[1].to_string());
            }
        }
        capture_into(&CLASS_RE, &line, &mut info.classes);
        capture_into(&INTERFACE_RE, &line, &mut info.interfaces);
        capture_into(&TRAIT_RE, &line, &mut info.traits);
        capture_into(&USE_RE, &line, &mut info.imports);
    }

    info
}

/// Scan one file; unreadable files yield `None`
#[must_use]
pub fn scan_file(path: &Path, base: &Path, config: &ScanConfig) -> Option<FileInfo> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("Skipping {}: {}", path.display(), e);
            return None;
        }
    };
    let mut info = scan_source(&String::from_utf8_lossy(&bytes), config.strip_comments);
    info.path = relative_path(path, base);
    Some(info)
}

/// Scan every source file under `root` in parallel, sorted by path.
///
/// Paths in the result are relative to `root`.
pub fn scan_path(root: &Path, config: &ScanConfig) -> Result<Vec<FileInfo>> {
    let files = find_source_files(root, config)?;
    debug!("Scanning {} source files under {}", files.len(), root.display());

    let mut infos: Vec<FileInfo> = files
        .par_iter()
        .filter_map(|f| scan_file(f, root, config))
        .collect();
    infos.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(infos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_scan_source_declarations() {
        let src = r"<?php
namespace App\Service;

use Psr\Log\LoggerInterface;
use App\Contracts\Mailer as MailerContract;

abstract class BaseMailer implements MailerContract
{
}
interface Transport {}
trait Loggable {}
";
        let info = scan_source(src, false);

        assert_eq!(info.namespace.as_deref(), Some("App\\Service"));
        assert_eq!(info.classes, vec!["BaseMailer"]);
        assert_eq!(info.interfaces, vec!["Transport"]);
        assert_eq!(info.traits, vec!["Loggable"]);
        assert_eq!(info.imports, vec!["Psr\\Log\\LoggerInterface", "App\\Contracts\\Mailer"]);
    }

    #[test]
    fn test_first_namespace_wins() {
        let info = scan_source("namespace First;\nnamespace Second;\n", false);
        assert_eq!(info.namespace.as_deref(), Some("First"));
    }

    #[test]
    fn test_comments_match_unless_stripped() {
        let src = "<?php\n// namespace Wrong;\n/* class Ghost\n   trait Phantom */\nnamespace Right;\n";

        let lenient = scan_source(src, false);
        assert_eq!(lenient.namespace.as_deref(), Some("Wrong"));
        assert_eq!(lenient.classes, vec!["Ghost"]);

        let strict = scan_source(src, true);
        assert_eq!(strict.namespace.as_deref(), Some("Right"));
        assert!(strict.classes.is_empty());
        assert!(strict.traits.is_empty());
    }

    #[test]
    fn test_strip_keeps_attributes_and_code() {
        let mut stripper = CommentStripper::default();
        assert_eq!(stripper.strip("#[Route('/')] class A {} # tail"), "#[Route('/')] class A {} ");
        assert_eq!(stripper.strip("class é /* x */ B"), "class é   B");
        assert!(!stripper.in_block);
    }

    #[test]
    fn test_walk_prunes_hidden_and_vendor() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "src/A.php", "<?php namespace App;");
        write(root, "src/readme.md", "namespace Nope;");
        write(root, "vendor/acme/lib/B.php", "<?php");
        write(root, "node_modules/x/C.php", "<?php");
        write(root, ".git/hooks/D.php", "<?php");
        write(root, "src/.cache/E.php", "<?php");

        let files = find_source_files(root, &ScanConfig::default()).unwrap();
        let rel: Vec<_> = files.iter().map(|f| relative_path(f, root)).collect();
        assert_eq!(rel, vec!["src/A.php"]);
    }

    #[test]
    fn test_exclude_globs_and_extensions() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "src/A.php", "<?php");
        write(root, "src/B.inc", "<?php");
        write(root, "tests/fixtures/Broken.php", "<?php");

        let config = ScanConfig {
            extensions: vec!["php".into(), "inc".into()],
            exclude: vec!["tests/fixtures".into()],
            ..Default::default()
        };
        let files = find_source_files(root, &config).unwrap();
        let rel: Vec<_> = files.iter().map(|f| relative_path(f, root)).collect();
        assert_eq!(rel, vec!["src/A.php", "src/B.inc"]);
    }

    #[test]
    fn test_exclude_relative_to_glob_base() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "tests/CartTest.php", "<?php");
        write(root, "tests/fixtures/Broken.php", "<?php");

        let config = ScanConfig {
            exclude: vec!["tests/fixtures".into()],
            ..Default::default()
        };
        let tests = root.join("tests");

        let from_root = find_source_files_in(&tests, root, &config).unwrap();
        let rel: Vec<_> = from_root.iter().map(|f| relative_path(f, root)).collect();
        assert_eq!(rel, vec!["tests/CartTest.php"]);

        assert_eq!(find_source_files(&tests, &config).unwrap().len(), 2);
    }

    #[test]
    fn test_scan_file_vanished() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "src/Gone.php", "<?php namespace App;");
        let files = find_source_files(root, &ScanConfig::default()).unwrap();
        fs::remove_file(&files[0]).unwrap();

        assert!(scan_file(&files[0], root, &ScanConfig::default()).is_none());
        assert!(scan_file(&root.join("src"), root, &ScanConfig::default()).is_none());
    }

    #[test]
    fn test_invalid_glob_is_validation() {
        let dir = TempDir::new().unwrap();
        let config = ScanConfig {
            exclude: vec!["src/[".into()],
            ..Default::default()
        };
        let err = find_source_files(dir.path(), &config).unwrap_err();
        assert!(matches!(err, AnalysisError::Validation { .. }));
    }

    #[test]
    fn test_missing_root_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = scan_path(&dir.path().join("absent"), &ScanConfig::default()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_scan_path_relative_and_sorted() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "b/Z.php", "<?php namespace B;");
        write(root, "a/Y.php", "<?php namespace A;");
        write(root, "Top.php", "<?php");

        let infos = scan_path(root, &ScanConfig::default()).unwrap();
        let paths: Vec<_> = infos.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["Top.php", "a/Y.php", "b/Z.php"]);
        assert_eq!(infos[1].namespace.as_deref(), Some("A"));
        assert!(infos[0].namespace.is_none());
    }
}

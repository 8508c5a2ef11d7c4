// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error taxonomy for the analysis core

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors surfaced by the analysis operations.
///
/// Partial inputs (a missing lock file, a missing mapping directory, an
/// unreadable source file) never produce one of these; they narrow the
/// result instead.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A required file or an explicitly requested path does not exist
    #[error("not found: {}", path.display())]
    NotFound {
        /// Missing path
        path: PathBuf,
    },

    /// A manifest could not be decoded into its canonical structure
    #[error("invalid {}: {message}", path.display())]
    Validation {
        /// File that failed to decode
        path: PathBuf,
        /// Decoder message, including line and column when available
        message: String,
    },

    /// Filesystem access was refused
    #[error("permission denied: {}", path.display())]
    PermissionDenied {
        /// Path that could not be accessed
        path: PathBuf,
    },

    /// Any other I/O failure
    #[error("failed to read {}", path.display())]
    Io {
        /// Path being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },
}

impl AnalysisError {
    /// Classify an I/O error raised while accessing `path`
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }

    /// Build a validation error from a JSON decoding failure
    pub fn validation(path: &Path, err: &serde_json::Error) -> Self {
        Self::Validation {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    /// True for [`AnalysisError::NotFound`]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result alias for the analysis core
pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_classifies_kinds() {
        let path = Path::new("composer.json");

        let err = AnalysisError::from_io(path, io::Error::from(io::ErrorKind::NotFound));
        assert!(err.is_not_found());

        let err = AnalysisError::from_io(path, io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, AnalysisError::PermissionDenied { .. }));

        let err = AnalysisError::from_io(path, io::Error::from(io::ErrorKind::InvalidData));
        assert!(matches!(err, AnalysisError::Io { .. }));
    }

    #[test]
    fn test_validation_message_carries_path() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = AnalysisError::validation(Path::new("repo/composer.json"), &json_err);

        let msg = err.to_string();
        assert!(msg.contains("repo/composer.json"));
        assert!(msg.contains("EOF"));
    }
}

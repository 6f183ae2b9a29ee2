//! Error types for listing, syncing and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while listing a tree.
#[derive(Debug, Error)]
pub enum ListError {
    /// Root path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Permission denied for the root.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ListError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Whether the root simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors that abort a whole sync cycle.
///
/// Failures of individual copy or remove actions never surface here; they are
/// recorded in the cycle's report instead.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The source tree could not be listed.
    #[error("Failed to list source: {0}")]
    Source(#[source] ListError),

    /// The replica tree could not be listed.
    #[error("Failed to list replica: {0}")]
    Replica(#[source] ListError),
}

/// Invalid configuration, detected before any cycle runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more settings are invalid.
    #[error("Invalid configuration: {}", problems.join("; "))]
    Invalid { problems: Vec<String> },
}

impl ConfigError {
    /// Create an error for a single problem.
    pub fn invalid(problem: impl Into<String>) -> Self {
        Self::Invalid {
            problems: vec![problem.into()],
        }
    }

    /// All problems found.
    pub fn problems(&self) -> &[String] {
        match self {
            Self::Invalid { problems } => problems,
        }
    }
}

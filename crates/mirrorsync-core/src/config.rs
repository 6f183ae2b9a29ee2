//! Sync configuration types.

use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_builder::{Builder, UninitializedFieldError};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Log file used when none is given.
pub const DEFAULT_LOG_FILE: &str = "replica.log";

/// Required suffix of the log file name.
const LOG_SUFFIX: &str = ".log";

/// Configuration for a mirroring process.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(
    setter(into),
    build_fn(validate = "Self::validate", error = "ConfigError")
)]
pub struct SyncConfig {
    /// Authoritative tree.
    pub source: PathBuf,

    /// Tree kept identical to the source's file set.
    pub replica: PathBuf,

    /// Delay between the end of one cycle and the start of the next.
    pub interval: Duration,

    /// Where replica log lines are appended.
    #[builder(default = "PathBuf::from(DEFAULT_LOG_FILE)")]
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Skip files whose name starts with `.`.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub exclude_hidden: bool,

    /// Walker threads (1 = serial, 0 = auto-detect).
    #[builder(default = "1")]
    #[serde(default = "default_threads")]
    pub threads: usize,
}

/// What to list and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    /// Root of the tree to list.
    pub root: PathBuf,

    /// Skip files whose name starts with `.`.
    #[serde(default)]
    pub exclude_hidden: bool,
}

impl ListOptions {
    /// List every regular file under `root`, hidden ones included.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exclude_hidden: false,
        }
    }

    /// Set whether hidden files are skipped.
    pub fn with_exclude_hidden(mut self, exclude_hidden: bool) -> Self {
        self.exclude_hidden = exclude_hidden;
        self
    }
}

fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}

fn default_true() -> bool {
    true
}

fn default_threads() -> usize {
    1
}

impl From<UninitializedFieldError> for ConfigError {
    fn from(e: UninitializedFieldError) -> Self {
        ConfigError::invalid(format!("Field {} is required", e.field_name()))
    }
}

impl SyncConfigBuilder {
    fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        match (&self.source, &self.replica) {
            (Some(source), Some(replica)) => problems.extend(check_roots(source, replica)),
            (None, _) => problems.push("Source folder is required".to_string()),
            (_, None) => problems.push("Replica folder is required".to_string()),
        }

        match self.interval {
            Some(interval) => problems.extend(check_interval(interval)),
            None => problems.push("Backup interval is required".to_string()),
        }

        if let Some(ref log_file) = self.log_file {
            problems.extend(check_log_file(log_file));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid { problems })
        }
    }
}

impl SyncConfig {
    /// Create a new sync config builder.
    pub fn builder() -> SyncConfigBuilder {
        SyncConfigBuilder::default()
    }

    /// Create a simple config with default log file and hidden-file handling.
    pub fn new(
        source: impl Into<PathBuf>,
        replica: impl Into<PathBuf>,
        interval: Duration,
    ) -> Self {
        Self {
            source: source.into(),
            replica: replica.into(),
            interval,
            log_file: default_log_file(),
            exclude_hidden: true,
            threads: 1,
        }
    }

    /// Check every setting, including that the source exists on disk and
    /// that neither folder contains the other.
    ///
    /// All problems are collected so they can be reported together.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = check_roots(&self.source, &self.replica);
        if problems.is_empty() {
            problems.extend(check_nesting(&self.source, &self.replica));
        }
        problems.extend(check_interval(self.interval));
        problems.extend(check_log_file(&self.log_file));

        if !self.source.as_os_str().is_empty() {
            if !self.source.exists() {
                problems.push(format!(
                    "Provided source folder {} does not exist",
                    self.source.display()
                ));
            } else if !self.source.is_dir() {
                problems.push(format!(
                    "Provided source folder {} is not a directory",
                    self.source.display()
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid { problems })
        }
    }
}

fn check_roots(source: &Path, replica: &Path) -> Vec<String> {
    let mut problems = Vec::new();
    if source.as_os_str().is_empty() {
        problems.push("Source folder cannot be empty".to_string());
    }
    if replica.as_os_str().is_empty() {
        problems.push("Replica folder cannot be empty".to_string());
    }
    if !source.as_os_str().is_empty() && source == replica {
        problems.push("Source and replica folders must differ".to_string());
    }
    problems
}

/// Reject folders that resolve to the same place or contain one another.
///
/// Each tree would otherwise list the other's files as its own, and every
/// cycle would mirror the replica into itself.
fn check_nesting(source: &Path, replica: &Path) -> Option<String> {
    let (Some(source_abs), Some(replica_abs)) = (resolve(source), resolve(replica)) else {
        return None;
    };

    if source_abs == replica_abs {
        Some("Source and replica folders must differ".to_string())
    } else if replica_abs.starts_with(&source_abs) {
        Some(format!(
            "Replica folder {} is inside source folder {}",
            replica.display(),
            source.display()
        ))
    } else if source_abs.starts_with(&replica_abs) {
        Some(format!(
            "Source folder {} is inside replica folder {}",
            source.display(),
            replica.display()
        ))
    } else {
        None
    }
}

/// Absolute form of `path` with symlinks resolved in its existing prefix.
///
/// The replica may not exist yet, so only the longest existing ancestor is
/// canonicalized and the remaining components are appended unchanged.
fn resolve(path: &Path) -> Option<PathBuf> {
    let absolute = std::path::absolute(path).ok()?;
    let mut existing = absolute.as_path();
    let mut tail = Vec::new();

    loop {
        if let Ok(canonical) = existing.canonicalize() {
            return Some(tail.iter().rev().fold(canonical, |acc, part| acc.join(part)));
        }
        tail.push(existing.file_name()?);
        existing = existing.parent()?;
    }
}

fn check_interval(interval: Duration) -> Option<String> {
    interval
        .is_zero()
        .then(|| "Backup interval must be at least one second".to_string())
}

fn check_log_file(log_file: &Path) -> Option<String> {
    if log_file.to_string_lossy().ends_with(LOG_SUFFIX) {
        None
    } else {
        Some(format!(
            "Incorrect log file name: {} (should have {LOG_SUFFIX} extension)",
            log_file.display()
        ))
    }
}

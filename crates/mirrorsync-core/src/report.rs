//! Result of a single sync cycle.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ActionKind, ActionRecord};

/// Everything a sync cycle did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    /// When the cycle started.
    pub started_at: DateTime<Utc>,
    /// How long the cycle took.
    pub duration: Duration,
    /// Files found in the source.
    pub source_files: usize,
    /// Files found in the replica before any action was applied.
    pub replica_files: usize,
    /// One record per path in the symmetric difference.
    pub records: Vec<ActionRecord>,
}

impl SyncReport {
    /// Create an empty report for a cycle starting now.
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            duration: Duration::ZERO,
            source_files: 0,
            replica_files: 0,
            records: Vec::new(),
        }
    }

    /// Number of files copied into the replica.
    pub fn created(&self) -> usize {
        self.count_applied(ActionKind::Created)
    }

    /// Number of files removed from the replica.
    pub fn removed(&self) -> usize {
        self.count_applied(ActionKind::Removed)
    }

    /// Number of actions that failed.
    pub fn failed(&self) -> usize {
        self.records.iter().filter(|r| !r.is_applied()).count()
    }

    /// Total bytes copied.
    pub fn bytes_copied(&self) -> u64 {
        self.records.iter().map(ActionRecord::bytes).sum()
    }

    /// Whether every planned action succeeded.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Whether the replica was already in sync.
    pub fn is_noop(&self) -> bool {
        self.records.is_empty()
    }

    /// Get a human-readable summary of the cycle.
    pub fn summary(&self) -> String {
        if self.is_noop() {
            return format!("Replica up to date ({} files)", self.source_files);
        }

        let base = format!(
            "Created {} files, removed {} files",
            self.created(),
            self.removed()
        );
        match self.failed() {
            0 => base,
            n => format!("{base}, {n} failed"),
        }
    }

    fn count_applied(&self, kind: ActionKind) -> usize {
        self.records
            .iter()
            .filter(|r| r.is_applied() && r.action.kind == kind)
            .count()
    }
}

impl Default for SyncReport {
    fn default() -> Self {
        Self::new()
    }
}

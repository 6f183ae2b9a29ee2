//! Reconciliation engine for mirrorsync.
//!
//! This crate turns two file sets into the minimal list of copy and remove
//! actions, applies them to the replica, and reports each applied action
//! through an [`ActionReporter`]. The [`Scheduler`] repeats that cycle on a
//! fixed delay until cancelled.

mod copy;
mod reconcile;
mod reporter;
mod scheduler;

pub use reconcile::Reconciler;
pub use reporter::{ActionReporter, CapturedAction, CapturingReporter, TracingReporter};
pub use scheduler::{CycleError, Scheduler, SchedulerStats};

pub use mirrorsync_scan::TreeLister;

pub use mirrorsync_core::{
    ActionKind, ActionOutcome, ActionRecord, FileSet, ListError, ListOptions, RelativePath,
    SyncAction, SyncError, SyncReport,
};

/// Tracing target for the per-file replica log lines.
pub const REPLICA_LOG_TARGET: &str = "mirrorsync::replica";

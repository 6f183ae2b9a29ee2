//! One-way reconciliation of a replica tree against a source tree.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use mirrorsync_core::{
    ActionKind, ActionRecord, FileSet, ListOptions, SyncAction, SyncError, SyncReport,
};
use mirrorsync_scan::TreeLister;

use crate::copy::{copy_file, remove_file, symlink_below};
use crate::reporter::ActionReporter;

/// Brings a replica's file set in line with a source's.
///
/// Only presence is compared: a path that exists in both trees is left
/// alone even if the contents differ. Empty directories left behind after
/// removals are not cleaned up.
pub struct Reconciler {
    lister: TreeLister,
    reporter: Arc<dyn ActionReporter>,
    exclude_hidden: bool,
}

impl Reconciler {
    /// Create a reconciler that reports through `reporter`.
    pub fn new(reporter: Arc<dyn ActionReporter>) -> Self {
        Self {
            lister: TreeLister::new(),
            reporter,
            exclude_hidden: true,
        }
    }

    /// Use a specific lister.
    pub fn with_lister(mut self, lister: TreeLister) -> Self {
        self.lister = lister;
        self
    }

    /// Set whether hidden files are skipped in both trees.
    pub fn with_exclude_hidden(mut self, exclude_hidden: bool) -> Self {
        self.exclude_hidden = exclude_hidden;
        self
    }

    /// Compute the actions that make `replica` match `source`.
    ///
    /// Every path in exactly one of the two sets gets exactly one action:
    /// a copy if the source has it, a removal otherwise. Removals are
    /// ordered before copies so a replica file can make way for a source
    /// directory of the same name; within a kind, paths are sorted.
    pub fn plan(source: &FileSet, replica: &FileSet) -> Vec<SyncAction> {
        let mut actions: Vec<SyncAction> = source
            .symmetric_difference(replica)
            .map(|path| {
                if source.contains(path) {
                    SyncAction::create(path.clone())
                } else {
                    SyncAction::remove(path.clone())
                }
            })
            .collect();

        actions.sort_by(|a, b| {
            (a.kind == ActionKind::Created)
                .cmp(&(b.kind == ActionKind::Created))
                .then_with(|| a.path.cmp(&b.path))
        });
        actions
    }

    /// Run one sync cycle.
    ///
    /// Fails only if a tree cannot be listed. A replica root that does not
    /// exist yet counts as empty. Individual action failures are reported
    /// and recorded, and the remaining actions still run.
    pub fn sync(
        &self,
        source: impl AsRef<Path>,
        replica: impl AsRef<Path>,
    ) -> Result<SyncReport, SyncError> {
        let source = source.as_ref();
        let replica = replica.as_ref();
        let start = Instant::now();
        let mut report = SyncReport::new();

        let source_options = ListOptions::new(source).with_exclude_hidden(self.exclude_hidden);
        let source_files = self
            .lister
            .list_with(&source_options)
            .map_err(SyncError::Source)?;

        let replica_options = ListOptions::new(replica).with_exclude_hidden(self.exclude_hidden);
        let replica_files = match self.lister.list_with(&replica_options) {
            Ok(files) => files,
            Err(e) if e.is_not_found() && !replica.exists() => {
                debug!(replica = %replica.display(), "Replica root missing, treating as empty");
                FileSet::new()
            }
            Err(e) => return Err(SyncError::Replica(e)),
        };

        report.source_files = source_files.len();
        report.replica_files = replica_files.len();

        for action in Self::plan(&source_files, &replica_files) {
            let record = self.apply(source, replica, action);
            report.records.push(record);
        }

        report.duration = start.elapsed();
        Ok(report)
    }

    /// Apply a single action and report its outcome.
    ///
    /// Copies never write through a symbolic link inside the replica; the
    /// action fails instead and the link's target is left untouched.
    fn apply(&self, source: &Path, replica: &Path, action: SyncAction) -> ActionRecord {
        let destination = action.path.to_native(replica);

        let result = match action.kind {
            ActionKind::Created => match symlink_below(replica, &action.path) {
                Some(link) => Err(format!("Failed to copy: {} is a symbolic link", link.display())),
                None => copy_file(&action.path.to_native(source), &destination),
            },
            ActionKind::Removed => remove_file(&destination).map(|()| 0),
        };

        match result {
            Ok(bytes) => {
                self.reporter.record(&destination, action.kind);
                ActionRecord::applied(action, destination, bytes)
            }
            Err(message) => {
                self.reporter.failed(&destination, action.kind, &message);
                ActionRecord::failed(action, destination, message)
            }
        }
    }
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("lister", &self.lister)
            .field("exclude_hidden", &self.exclude_hidden)
            .finish_non_exhaustive()
    }
}

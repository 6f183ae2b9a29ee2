//! Fixed-delay scheduler that repeats sync cycles until cancelled.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use mirrorsync_core::{SyncError, SyncReport};

use crate::reconcile::Reconciler;

/// Why a cycle produced no report.
#[derive(Debug, Error)]
pub enum CycleError {
    /// A tree could not be listed.
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// The blocking task running the cycle panicked or was cancelled.
    #[error("Sync task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Counters accumulated over the scheduler's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Cycles started.
    pub cycles: u64,
    /// Cycles that ended without a report.
    pub aborted_cycles: u64,
    /// Actions applied across all cycles.
    pub actions_applied: u64,
    /// Actions that failed across all cycles.
    pub actions_failed: u64,
}

impl SchedulerStats {
    fn record(&mut self, outcome: &Result<SyncReport, CycleError>) {
        self.cycles += 1;
        match outcome {
            Ok(report) => {
                let failed = report.failed();
                self.actions_failed += failed as u64;
                self.actions_applied += (report.records.len() - failed) as u64;
            }
            Err(_) => self.aborted_cycles += 1,
        }
    }
}

/// Runs the reconciler for one source/replica pair on a fixed delay.
///
/// Each cycle runs to completion on a blocking thread; the next one starts
/// `interval` after the previous one finished. Cycles never overlap.
#[derive(Debug)]
pub struct Scheduler {
    reconciler: Arc<Reconciler>,
    source: PathBuf,
    replica: PathBuf,
    interval: Duration,
}

impl Scheduler {
    /// Create a scheduler.
    pub fn new(
        reconciler: Reconciler,
        source: impl Into<PathBuf>,
        replica: impl Into<PathBuf>,
        interval: Duration,
    ) -> Self {
        Self {
            reconciler: Arc::new(reconciler),
            source: source.into(),
            replica: replica.into(),
            interval,
        }
    }

    /// Run exactly one cycle and log its summary.
    pub async fn run_once(&self) -> Result<SyncReport, CycleError> {
        let outcome = self.cycle().await;
        log_cycle(&outcome);
        outcome
    }

    async fn cycle(&self) -> Result<SyncReport, CycleError> {
        let reconciler = Arc::clone(&self.reconciler);
        let source = self.source.clone();
        let replica = self.replica.clone();

        let report = tokio::task::spawn_blocking(move || reconciler.sync(&source, &replica))
            .await??;
        Ok(report)
    }

    /// Run cycles until `cancel` fires.
    ///
    /// A cycle in progress is never interrupted; cancellation is observed
    /// between cycles and while waiting for the next one. Aborted cycles
    /// are logged and retried after the usual interval.
    pub async fn run(&self, cancel: CancellationToken) -> SchedulerStats {
        let mut stats = SchedulerStats::default();

        info!(
            source = %self.source.display(),
            replica = %self.replica.display(),
            interval_secs = self.interval.as_secs(),
            "Starting mirror"
        );

        while !cancel.is_cancelled() {
            let outcome = self.run_once().await;
            stats.record(&outcome);

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        info!(cycles = stats.cycles, "Mirror stopped");
        stats
    }
}

fn log_cycle(outcome: &Result<SyncReport, CycleError>) {
    match outcome {
        Ok(report) if report.is_success() => info!(
            "{} ({} copied in {:.2}s)",
            report.summary(),
            humansize::format_size(report.bytes_copied(), humansize::BINARY),
            report.duration.as_secs_f64()
        ),
        Ok(report) => warn!("{}", report.summary()),
        Err(e) => error!(error = %e, "Sync cycle aborted"),
    }
}

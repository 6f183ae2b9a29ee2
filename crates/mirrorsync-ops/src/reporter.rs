//! Reporting of applied sync actions.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{info, warn};

use mirrorsync_core::ActionKind;

use crate::REPLICA_LOG_TARGET;

/// Receives every action the reconciler applies.
///
/// Passed to the [`Reconciler`](crate::Reconciler) at construction so the
/// engine holds no global logging state and can be tested with a
/// [`CapturingReporter`].
pub trait ActionReporter: Send + Sync {
    /// A replica file was created or removed.
    fn record(&self, destination: &Path, kind: ActionKind);

    /// An action could not be applied.
    fn failed(&self, destination: &Path, kind: ActionKind, message: &str) {
        warn!(
            destination = %destination.display(),
            action = %kind,
            "{message}"
        );
    }
}

/// Writes `<destination> <ACTION>` lines through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl TracingReporter {
    /// Create a new tracing reporter.
    pub fn new() -> Self {
        Self
    }
}

impl ActionReporter for TracingReporter {
    fn record(&self, destination: &Path, kind: ActionKind) {
        info!(target: REPLICA_LOG_TARGET, "{} {}", destination.display(), kind);
    }
}

/// An action seen by a [`CapturingReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedAction {
    /// Replica path acted on.
    pub destination: PathBuf,
    /// What was done.
    pub kind: ActionKind,
    /// Failure message, if the action failed.
    pub error: Option<String>,
}

/// Keeps every reported action in memory.
#[derive(Debug, Default)]
pub struct CapturingReporter {
    actions: Mutex<Vec<CapturedAction>>,
}

impl CapturingReporter {
    /// Create an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// All actions reported so far, in reporting order.
    pub fn actions(&self) -> Vec<CapturedAction> {
        self.lock().clone()
    }

    /// Successfully applied actions of the given kind.
    pub fn applied(&self, kind: ActionKind) -> Vec<PathBuf> {
        self.lock()
            .iter()
            .filter(|a| a.kind == kind && a.error.is_none())
            .map(|a| a.destination.clone())
            .collect()
    }

    /// Actions that failed.
    pub fn failures(&self) -> Vec<CapturedAction> {
        self.lock()
            .iter()
            .filter(|a| a.error.is_some())
            .cloned()
            .collect()
    }

    /// Forget everything captured so far.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<CapturedAction>> {
        self.actions.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ActionReporter for CapturingReporter {
    fn record(&self, destination: &Path, kind: ActionKind) {
        self.lock().push(CapturedAction {
            destination: destination.to_path_buf(),
            kind,
            error: None,
        });
    }

    fn failed(&self, destination: &Path, kind: ActionKind, message: &str) {
        self.lock().push(CapturedAction {
            destination: destination.to_path_buf(),
            kind,
            error: Some(message.to_string()),
        });
    }
}

//! Sync action types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::RelativePath;

/// What a sync action does to the replica.
///
/// Displays as the label written to the replica log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    /// A source file was copied into the replica.
    Created,
    /// A replica file without a source counterpart was deleted.
    Removed,
}

/// A single planned change to the replica.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyncAction {
    /// The change to make.
    pub kind: ActionKind,
    /// The file it applies to.
    pub path: RelativePath,
}

impl SyncAction {
    /// Plan a copy of `path` from source to replica.
    pub fn create(path: RelativePath) -> Self {
        Self {
            kind: ActionKind::Created,
            path,
        }
    }

    /// Plan removal of `path` from the replica.
    pub fn remove(path: RelativePath) -> Self {
        Self {
            kind: ActionKind::Removed,
            path,
        }
    }
}

/// How an applied action ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOutcome {
    /// The action took effect. `bytes` is the copied size (0 for removals).
    Applied { bytes: u64 },
    /// The action failed; the replica file is unchanged.
    Failed { message: String },
}

/// An action together with its destination and outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The planned action.
    pub action: SyncAction,
    /// Absolute path of the replica file acted on.
    pub destination: PathBuf,
    /// What happened.
    pub outcome: ActionOutcome,
}

impl ActionRecord {
    /// Record a successful action.
    pub fn applied(action: SyncAction, destination: PathBuf, bytes: u64) -> Self {
        Self {
            action,
            destination,
            outcome: ActionOutcome::Applied { bytes },
        }
    }

    /// Record a failed action.
    pub fn failed(action: SyncAction, destination: PathBuf, message: impl Into<String>) -> Self {
        Self {
            action,
            destination,
            outcome: ActionOutcome::Failed {
                message: message.into(),
            },
        }
    }

    /// Whether the action took effect.
    pub fn is_applied(&self) -> bool {
        matches!(self.outcome, ActionOutcome::Applied { .. })
    }

    /// Bytes copied by this action.
    pub fn bytes(&self) -> u64 {
        match self.outcome {
            ActionOutcome::Applied { bytes } => bytes,
            ActionOutcome::Failed { .. } => 0,
        }
    }
}

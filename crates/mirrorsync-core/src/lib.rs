//! Core types and traits for mirrorsync.
//!
//! This crate provides the fundamental data structures shared by the lister,
//! the reconciler and the CLI: relative paths, file sets, sync actions,
//! cycle reports and configuration.

mod action;
mod config;
mod error;
mod path;
mod report;

pub use action::{ActionKind, ActionOutcome, ActionRecord, SyncAction};
pub use config::{DEFAULT_LOG_FILE, ListOptions, SyncConfig, SyncConfigBuilder};
pub use error::{ConfigError, ListError, SyncError};
pub use path::{FileSet, HIDDEN_MARKER, RelativePath, is_hidden_name};
pub use report::SyncReport;

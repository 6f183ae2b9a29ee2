//! Directory tree listing for mirrorsync.
//!
//! This crate walks a tree with jwalk and produces the [`FileSet`] of
//! regular files under it, keyed by [`RelativePath`].
//!
//! # Example
//!
//! ```rust,no_run
//! use mirrorsync_scan::TreeLister;
//!
//! let lister = TreeLister::new();
//! let files = lister.list("/path/to/source", true).unwrap();
//!
//! for path in files.sorted() {
//!     println!("{path}");
//! }
//! ```
//!
//! Hidden files (names starting with `.`) are skipped when requested, but
//! hidden directories are still descended into.

mod lister;

pub use lister::TreeLister;

// Re-export core types for convenience
pub use mirrorsync_core::{FileSet, HIDDEN_MARKER, ListError, ListOptions, RelativePath};

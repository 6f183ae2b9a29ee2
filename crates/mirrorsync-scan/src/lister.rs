//! JWalk-based tree lister.

use std::io;
use std::path::Path;
use std::time::Duration;

use jwalk::{Parallelism, WalkDir};
use tracing::debug;

use mirrorsync_core::{FileSet, ListError, ListOptions, RelativePath, is_hidden_name};

/// Lists the regular files under a root.
#[derive(Debug, Clone, Copy)]
pub struct TreeLister {
    threads: usize,
}

impl TreeLister {
    /// Create a lister that walks serially.
    pub fn new() -> Self {
        Self { threads: 1 }
    }

    /// Create a lister with a given walker thread count (0 = auto-detect).
    pub fn with_threads(threads: usize) -> Self {
        Self { threads }
    }

    /// List every regular file under `root` as a relative path.
    ///
    /// Shorthand for [`TreeLister::list_with`].
    pub fn list(
        &self,
        root: impl AsRef<Path>,
        exclude_hidden: bool,
    ) -> Result<FileSet, ListError> {
        let options = ListOptions::new(root.as_ref()).with_exclude_hidden(exclude_hidden);
        self.list_with(&options)
    }

    /// List every regular file under `options.root` as a relative path.
    ///
    /// With `exclude_hidden`, files whose name starts with `.` are skipped.
    /// Directories are always descended into, hidden or not.
    ///
    /// The listing is all or nothing: if the root or any directory below it
    /// cannot be read, the whole listing fails. A partial set would make the
    /// reconciler treat the unread files as missing.
    pub fn list_with(&self, options: &ListOptions) -> Result<FileSet, ListError> {
        let root = options.root.as_path();
        let root_path = root.canonicalize().map_err(|e| ListError::io(root, e))?;

        // Verify root is a directory
        let root_metadata =
            std::fs::metadata(&root_path).map_err(|e| ListError::io(&root_path, e))?;
        if !root_metadata.is_dir() {
            return Err(ListError::NotADirectory { path: root_path });
        }

        // jwalk reports an unreadable root as an entry error; fail up front
        std::fs::read_dir(&root_path).map_err(|e| ListError::io(&root_path, e))?;

        let walker = WalkDir::new(&root_path)
            .parallelism(self.parallelism())
            .skip_hidden(false)
            .follow_links(false)
            .sort(false)
            .min_depth(1);

        let mut files = FileSet::new();

        for entry_result in walker {
            let entry = entry_result.map_err(|err| walk_error(&root_path, err))?;

            // Only regular files are members; symlinks are not followed.
            if !entry.file_type().is_file() {
                continue;
            }

            if options.exclude_hidden && is_hidden_name(entry.file_name()) {
                continue;
            }

            if let Some(rel) = RelativePath::from_root(&root_path, &entry.path()) {
                files.insert(rel);
            }
        }

        debug!(root = %root_path.display(), files = files.len(), "Listed tree");
        Ok(files)
    }

    fn parallelism(&self) -> Parallelism {
        match self.threads {
            0 => Parallelism::RayonDefaultPool {
                busy_timeout: Duration::from_millis(100),
            },
            1 => Parallelism::Serial,
            n => Parallelism::RayonNewPool(n),
        }
    }
}

impl Default for TreeLister {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a jwalk error into a [`ListError`] for the path it occurred on.
fn walk_error(root: &Path, err: jwalk::Error) -> ListError {
    let path = err.path().unwrap_or(root).to_path_buf();
    let message = err.to_string();
    match err.into_io_error() {
        Some(source) => ListError::io(path, source),
        None => ListError::Io {
            path,
            source: io::Error::other(message),
        },
    }
}

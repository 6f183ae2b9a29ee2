//! File-level copy and remove primitives.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use tracing::debug;

use mirrorsync_core::RelativePath;

/// Copy a single file, creating missing parent directories.
///
/// The copy is attempted once; if it fails and the destination's parent
/// directory is missing, the parent chain is created and the copy retried
/// exactly once. Content and permissions come from [`fs::copy`]; access and
/// modification times are carried over on a best-effort basis.
pub(crate) fn copy_file(source: &Path, dest: &Path) -> Result<u64, String> {
    let bytes = match fs::copy(source, dest) {
        Ok(bytes) => bytes,
        Err(first) => match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
                fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create directory: {}", e))?;
                fs::copy(source, dest).map_err(|e| format!("Failed to copy: {}", e))?
            }
            _ => return Err(format!("Failed to copy: {}", first)),
        },
    };

    if let Err(e) = preserve_times(source, dest) {
        debug!(path = %dest.display(), error = %e, "Could not preserve timestamps");
    }

    Ok(bytes)
}

/// Remove a single file.
pub(crate) fn remove_file(path: &Path) -> Result<(), String> {
    fs::remove_file(path).map_err(|e| format!("Failed to remove: {}", e))
}

/// First symbolic link met while descending from `root` along `rel`.
///
/// `root` itself is not checked. Stops at the first component that does
/// not exist, since nothing below it can be a link.
pub(crate) fn symlink_below(root: &Path, rel: &RelativePath) -> Option<PathBuf> {
    let mut current = root.to_path_buf();
    for part in Path::new(rel.as_os_str()).components() {
        current.push(part);
        match fs::symlink_metadata(&current) {
            Ok(metadata) if metadata.file_type().is_symlink() => return Some(current),
            Ok(_) => {}
            Err(_) => return None,
        }
    }
    None
}

fn preserve_times(source: &Path, dest: &Path) -> io::Result<()> {
    let metadata = fs::metadata(source)?;
    let atime = FileTime::from_last_access_time(&metadata);
    let mtime = FileTime::from_last_modification_time(&metadata);
    filetime::set_file_times(dest, atime, mtime)
}

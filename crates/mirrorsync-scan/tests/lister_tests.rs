use mirrorsync_scan::{FileSet, ListError, ListOptions, RelativePath, TreeLister};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn names(files: &FileSet) -> Vec<String> {
    files.sorted().into_iter().map(|p| p.to_string()).collect()
}

#[test]
fn test_hidden_files_excluded_on_request() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join(".hidden"), "secret").unwrap();
    fs::write(root.join("visible.txt"), "hi").unwrap();

    let lister = TreeLister::new();

    let excluded = lister.list(root, true).unwrap();
    assert_eq!(names(&excluded), vec!["visible.txt"]);

    let included = lister.list(root, false).unwrap();
    assert_eq!(names(&included), vec![".hidden", "visible.txt"]);
}

#[test]
fn test_hidden_directories_are_still_walked() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join(".config/app")).unwrap();
    fs::write(root.join(".config/app/settings.toml"), "a = 1").unwrap();
    fs::write(root.join(".config/app/.lock"), "").unwrap();

    let files = TreeLister::new().list(root, true).unwrap();

    // Non-hidden file inside a hidden directory is listed; the hidden file is not
    assert_eq!(names(&files), vec![".config/app/settings.toml"]);
}

#[test]
fn test_empty_root_yields_empty_set() {
    let temp = TempDir::new().unwrap();
    let files = TreeLister::new().list(temp.path(), true).unwrap();
    assert!(files.is_empty());
}

#[test]
fn test_missing_root_is_an_error() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nope");

    let err = TreeLister::new().list(&missing, true).unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err}");
}

#[test]
fn test_file_root_is_an_error() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("file.txt");
    fs::write(&file, "content").unwrap();

    let err = TreeLister::new().list(&file, true).unwrap_err();
    assert!(matches!(err, ListError::NotADirectory { .. }));
}

#[test]
fn test_relative_paths_match_across_roots() {
    let source = TempDir::new().unwrap();
    let replica = TempDir::new().unwrap();
    for root in [source.path(), replica.path()] {
        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::write(root.join("a/b/c.txt"), "same").unwrap();
    }

    let lister = TreeLister::new();
    let source_files = lister.list(source.path(), true).unwrap();
    let replica_files = lister.list(replica.path(), true).unwrap();

    assert_eq!(source_files, replica_files);
    assert!(source_files.contains(&RelativePath::new("a/b/c.txt")));
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_not_members() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("target.txt"), "data").unwrap();
    std::os::unix::fs::symlink(root.join("target.txt"), root.join("link.txt")).unwrap();

    let files = TreeLister::new().list(root, true).unwrap();
    assert_eq!(names(&files), vec!["target.txt"]);
}

#[test]
fn test_list_with_matches_list() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(root.join("sub/.env"), "KEY=1").unwrap();
    fs::write(root.join("sub/a.txt"), "a").unwrap();

    let lister = TreeLister::new();
    let options = ListOptions::new(root).with_exclude_hidden(true);

    assert_eq!(lister.list_with(&options).unwrap(), lister.list(root, true).unwrap());
    assert_eq!(names(&lister.list_with(&options).unwrap()), vec!["sub/a.txt"]);
}

/// Set `mode` on `path` and report whether it actually locks us out.
///
/// Privileged users read through permission bits, in which case the
/// calling test has nothing to check.
#[cfg(unix)]
fn lock(path: &Path, mode: u32) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
    fs::read_dir(path).is_err()
}

#[cfg(unix)]
fn unlock(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(unix)]
#[test]
fn test_unreadable_root_is_an_error() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("locked");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("a.txt"), "a").unwrap();

    if !lock(&root, 0o000) {
        unlock(&root);
        return;
    }
    let result = TreeLister::new().list(&root, true);
    unlock(&root);

    assert!(matches!(result, Err(ListError::PermissionDenied { .. })));
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_fails_whole_listing() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("top.txt"), "top").unwrap();
    fs::create_dir(root.join("private")).unwrap();
    fs::write(root.join("private/secret.txt"), "s").unwrap();

    let private = root.join("private");
    if !lock(&private, 0o000) {
        unlock(&private);
        return;
    }
    let serial = TreeLister::new().list(root, true);
    let parallel = TreeLister::with_threads(2).list(root, true);
    unlock(&private);

    assert!(matches!(serial, Err(ListError::PermissionDenied { .. })));
    assert!(matches!(parallel, Err(ListError::PermissionDenied { .. })));
}

#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_file_names_are_listed() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let name = OsStr::from_bytes(b"caf\xe9.txt");
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(root.join("sub").join(name), "latin-1").unwrap();
    fs::write(root.join("plain.txt"), "ascii").unwrap();

    let files = TreeLister::new().list(root, true).unwrap();

    assert_eq!(files.len(), 2);
    assert!(files.contains(&RelativePath::new(OsStr::from_bytes(b"sub/caf\xe9.txt"))));
}

use mirrorsync_core::{
    ActionKind, ActionOutcome, ActionRecord, FileSet, ListOptions, RelativePath, SyncAction,
    SyncConfig, SyncReport,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_relative_path_from_native_tree() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let file = root.join("docs").join("notes").join("todo.md");

    let rel = RelativePath::from_root(root, &file).unwrap();
    assert_eq!(rel.to_string(), "docs/notes/todo.md");
    assert_eq!(rel.file_name(), "todo.md");
    assert!(!rel.is_hidden());

    // Same relative path re-anchored under a different root
    let other = Path::new("/mnt/replica");
    assert_eq!(
        rel.to_native(other),
        other.join("docs").join("notes").join("todo.md")
    );
}

#[test]
fn test_file_set_operations() {
    let mut set = FileSet::new();
    assert!(set.is_empty());

    assert!(set.insert("a.txt".into()));
    assert!(set.insert("sub/b.txt".into()));
    assert!(!set.insert("a.txt".into()));

    assert_eq!(set.len(), 2);
    assert!(set.contains(&RelativePath::new("sub/b.txt")));
    assert!(!set.contains(&RelativePath::new("b.txt")));

    let sorted: Vec<_> = set.sorted().into_iter().map(RelativePath::to_string).collect();
    assert_eq!(sorted, vec!["a.txt", "sub/b.txt"]);
}

#[test]
fn test_symmetric_difference_of_equal_sets_is_empty() {
    let a: FileSet = ["x", "y/z"].into_iter().collect();
    let b: FileSet = ["y/z", "x"].into_iter().collect();
    assert_eq!(a, b);
    assert_eq!(a.symmetric_difference(&b).count(), 0);
}

#[test]
fn test_sync_action_constructors() {
    let create = SyncAction::create("a.txt".into());
    assert_eq!(create.kind, ActionKind::Created);

    let remove = SyncAction::remove("a.txt".into());
    assert_eq!(remove.kind, ActionKind::Removed);
    assert_eq!(remove.path, create.path);
}

#[test]
fn test_report_aggregates_records() {
    let mut report = SyncReport::new();
    report.source_files = 2;
    report.replica_files = 1;
    report.records = vec![
        ActionRecord::applied(
            SyncAction::create("a.txt".into()),
            PathBuf::from("/r/a.txt"),
            2048,
        ),
        ActionRecord::applied(
            SyncAction::create("b.txt".into()),
            PathBuf::from("/r/b.txt"),
            1024,
        ),
    ];

    assert_eq!(report.created(), 2);
    assert_eq!(report.removed(), 0);
    assert_eq!(report.bytes_copied(), 3072);
    assert!(report.is_success());
    assert!(!report.is_noop());
    assert_eq!(report.summary(), "Created 2 files, removed 0 files");
    assert_eq!(report.records[0].outcome, ActionOutcome::Applied { bytes: 2048 });
}

#[test]
fn test_sync_config_validate_existing_source() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source");
    std::fs::create_dir(&source).unwrap();

    let config = SyncConfig::builder()
        .source(&source)
        .replica(temp.path().join("replica"))
        .interval(Duration::from_secs(5))
        .log_file(temp.path().join("sync.log"))
        .threads(0usize)
        .build()
        .unwrap();

    assert!(config.validate().is_ok());
    assert_eq!(config.threads, 0);
}

#[test]
fn test_sync_config_validate_source_is_file() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("plain.txt");
    std::fs::write(&file, "not a dir").unwrap();

    let config = SyncConfig::new(&file, temp.path().join("replica"), Duration::from_secs(1));
    let err = config.validate().unwrap_err();
    assert_eq!(err.problems().len(), 1);
    assert!(err.problems()[0].contains("not a directory"));
}

#[test]
fn test_sync_config_rejects_replica_inside_source() {
    let temp = TempDir::new().unwrap();
    let config = SyncConfig::new(
        temp.path(),
        temp.path().join("backup"),
        Duration::from_secs(1),
    );

    let err = config.validate().unwrap_err();
    assert_eq!(err.problems().len(), 1);
    assert!(err.problems()[0].contains("is inside source folder"));
}

#[test]
fn test_sync_config_rejects_source_inside_replica() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("data").join("current");
    std::fs::create_dir_all(&source).unwrap();

    let config = SyncConfig::new(&source, temp.path(), Duration::from_secs(1));
    let err = config.validate().unwrap_err();
    assert_eq!(err.problems().len(), 1);
    assert!(err.problems()[0].contains("is inside replica folder"));
}

#[test]
fn test_sync_config_rejects_same_folder_spelled_differently() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source");
    std::fs::create_dir(&source).unwrap();

    let config = SyncConfig::new(
        &source,
        source.join("..").join("source"),
        Duration::from_secs(1),
    );
    let err = config.validate().unwrap_err();
    assert!(err.problems()[0].contains("must differ"));
}

#[test]
fn test_sync_config_allows_sibling_with_common_prefix() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("data");
    std::fs::create_dir(&source).unwrap();

    let replica = temp.path().join("data-backup");
    let config = SyncConfig::new(&source, replica, Duration::from_secs(1));
    assert!(config.validate().is_ok());
}

#[test]
fn test_list_options_defaults() {
    let options = ListOptions::new("/data/source");
    assert_eq!(options.root, PathBuf::from("/data/source"));
    assert!(!options.exclude_hidden);
    assert!(options.with_exclude_hidden(true).exclude_hidden);
}

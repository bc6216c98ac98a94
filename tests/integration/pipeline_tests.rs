use super::common::{records, ModuloHasher, TableHasher};
use dupfind::duplicates::{DuplicateFinder, FinderConfig, FinderError, ScanStats, WorkerPool};
use dupfind::scanner::FileRecord;
use dupfind::signal::CancellationToken;
use std::sync::Arc;

fn finder(workers: usize, hasher: impl dupfind::scanner::ContentHasher + 'static) -> DuplicateFinder {
    DuplicateFinder::new(FinderConfig::default().with_workers(workers)).with_hasher(Arc::new(hasher))
}

#[test]
fn test_one_group_and_one_unique() {
    let hasher = TableHasher::new([("/f1", "a"), ("/f2", "a"), ("/f3", "b")]);
    let files = records(&[("/f1", 10), ("/f2", 10), ("/f3", 10)]);

    let (groups, stats) = finder(4, hasher).find_duplicates_from_files(files).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups["a"], records(&[("/f1", 10), ("/f2", 10)]));
    assert!(!groups.contains_key("b"));
    assert_eq!(stats.total_files, 3);
    assert_eq!(stats.processed_files, 3);
    assert_eq!(stats.duplicate_groups, 1);
    assert_eq!(stats.total_wasted_space, 10);
}

#[test]
fn test_zero_files() {
    let hasher = TableHasher::new([]);
    let (groups, stats) = finder(4, hasher).find_duplicates_from_files(Vec::new()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(stats, ScanStats::default());
}

#[test]
fn test_failed_file_excluded() {
    // "/f1" is missing from the table, so hashing it fails
    let hasher = TableHasher::new([("/f2", "x"), ("/f3", "x")]);
    let files = records(&[("/f1", 5), ("/f2", 5), ("/f3", 5)]);

    let (groups, stats) = finder(2, hasher).find_duplicates_from_files(files).unwrap();

    assert_eq!(stats.total_files, 3);
    assert_eq!(stats.processed_files, 2);
    assert_eq!(stats.failed_files, 1);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups["x"].len(), 2);
    assert!(groups
        .values()
        .flatten()
        .all(|r| r.path != std::path::Path::new("/f1")));
}

#[test]
fn test_worker_count_does_not_change_result() {
    let files: Vec<FileRecord> = (0..50)
        .map(|i| FileRecord::new(format!("/data/file{i}"), 100))
        .collect();

    let single = finder(1, ModuloHasher { modulo: 7 })
        .find_duplicates_from_files(files.clone())
        .unwrap();
    let many = finder(8, ModuloHasher { modulo: 7 })
        .find_duplicates_from_files(files)
        .unwrap();

    assert_eq!(single.0, many.0);
    assert_eq!(single.1, many.1);
    assert_eq!(single.0.len(), 7);
    assert_eq!(single.1.duplicate_files, 50 - 7);
}

#[test]
fn test_every_file_in_at_most_one_group() {
    let files: Vec<FileRecord> = (0..120)
        .map(|i| FileRecord::new(format!("/data/file{i}"), 1))
        .collect();

    let (groups, _) = finder(6, ModuloHasher { modulo: 11 })
        .find_duplicates_from_files(files)
        .unwrap();

    let mut seen = std::collections::HashSet::new();
    for member in groups.values().flatten() {
        assert!(seen.insert(member.path.clone()), "{:?} in two groups", member.path);
    }
    assert_eq!(seen.len(), 120);
}

#[test]
fn test_pool_reports_failures_and_successes() {
    let pool = WorkerPool::new(3, Arc::new(TableHasher::new([("/ok", "d")])));
    let report = pool
        .process(
            &CancellationToken::new(),
            records(&[("/ok", 1), ("/missing", 1)]),
            None,
        )
        .unwrap();

    assert!(report.is_complete());
    assert_eq!(report.hashed.len(), 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].record.path, std::path::Path::new("/missing"));
}

#[test]
fn test_cancelled_before_start() {
    let token = CancellationToken::new();
    token.cancel();
    let finder = DuplicateFinder::new(
        FinderConfig::default()
            .with_workers(4)
            .with_cancellation(token),
    )
    .with_hasher(Arc::new(ModuloHasher { modulo: 2 }));

    let files = (0..10)
        .map(|i| FileRecord::new(format!("/data/file{i}"), 1))
        .collect();

    assert!(matches!(
        finder.find_duplicates_from_files(files),
        Err(FinderError::Interrupted)
    ));
}

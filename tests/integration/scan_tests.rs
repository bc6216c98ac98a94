use super::common::write_file;
use clap::Parser;
use dupfind::cli::Cli;
use dupfind::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use dupfind::config::{Config, Settings};
use dupfind::error::{ConfigError, ExitCode};
use dupfind::output::OutputFormat;
use dupfind::scanner::{FileRecord, HashAlgorithm};
use dupfind::signal::CancellationToken;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[test]
fn test_scan_finds_duplicates_every_algorithm() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "a.txt", b"hello duplicate");
    write_file(dir.path(), "nested/b.txt", b"hello duplicate");
    write_file(dir.path(), "nested/deeper/c.txt", b"hello duplicate");
    write_file(dir.path(), "unique.txt", b"nothing like it");

    for algorithm in HashAlgorithm::ALL {
        let finder = DuplicateFinder::new(
            FinderConfig::default()
                .with_workers(3)
                .with_algorithm(algorithm),
        );
        let (groups, stats) = finder.find_duplicates(dir.path()).unwrap();

        assert_eq!(groups.len(), 1, "{algorithm}");
        let (digest, members) = groups.iter().next().unwrap();
        assert_eq!(digest.len(), algorithm.hex_len());
        assert_eq!(members.len(), 3);
        assert_eq!(stats.total_files, 4);
        assert_eq!(stats.duplicate_files, 2);
        assert_eq!(stats.total_wasted_space, 2 * 15);
    }
}

#[test]
fn test_scan_ignores_empty_files() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "empty1", b"");
    write_file(dir.path(), "empty2", b"");

    let (groups, stats) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(stats.total_files, 0);
}

#[test]
fn test_scan_md5_digest_value() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "a", b"abc");
    write_file(dir.path(), "b", b"abc");

    let (groups, _) = DuplicateFinder::new(FinderConfig::default().with_algorithm(HashAlgorithm::Md5))
        .find_duplicates(dir.path())
        .unwrap();

    assert!(groups.contains_key("900150983cd24fb0d6963f7d28e17f72"));
}

#[test]
fn test_scan_members_in_path_order() {
    let dir = TempDir::new().unwrap();
    for name in ["c.bin", "a.bin", "b.bin"] {
        write_file(dir.path(), name, b"same bytes");
    }

    let (groups, _) = DuplicateFinder::new(FinderConfig::default().with_workers(8))
        .find_duplicates(dir.path())
        .unwrap();

    let names: Vec<_> = groups
        .values()
        .next()
        .unwrap()
        .iter()
        .map(|r| r.path.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a.bin", "b.bin", "c.bin"]);
}

#[test]
fn test_scan_missing_directory() {
    let dir = TempDir::new().unwrap();
    let err = DuplicateFinder::with_defaults()
        .find_duplicates(&dir.path().join("missing"))
        .unwrap_err();
    assert!(matches!(err, FinderError::PathNotFound(_)));
}

#[test]
fn test_scan_continues_past_vanished_file() {
    let dir = TempDir::new().unwrap();
    let a = write_file(dir.path(), "a", b"dup");
    let b = write_file(dir.path(), "b", b"dup");
    let gone = write_file(dir.path(), "gone", b"dup");
    fs::remove_file(&gone).unwrap();

    // Listed, then deleted before hashing
    let source = vec![
        FileRecord::new(a.clone(), 3),
        FileRecord::new(gone, 3),
        FileRecord::new(b.clone(), 3),
    ];

    let (groups, stats) = DuplicateFinder::with_defaults()
        .find_duplicates_in(&source)
        .unwrap();

    assert_eq!(stats.total_files, 3);
    assert_eq!(stats.processed_files, 2);
    assert_eq!(stats.failed_files, 1);
    assert_eq!(groups.len(), 1);
    let members: Vec<_> = groups.values().next().unwrap().iter().map(|r| r.path.clone()).collect();
    assert_eq!(members, vec![a, b]);
}

fn settings(path: &Path, output_file: Option<PathBuf>) -> Settings {
    Settings {
        path: path.to_path_buf(),
        algorithm: HashAlgorithm::Md5,
        workers: 2,
        format: OutputFormat::Json,
        output_file,
        show_progress: false,
        quiet: true,
    }
}

#[test]
fn test_run_scan_bad_output_fails_before_scanning() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "a.txt", b"dup");
    let report = dir.path().join("no").join("such").join("report.json");

    // A cancelled token would surface as Interrupted if the scan ran first
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = dupfind::run_scan(&settings(dir.path(), Some(report.clone())), cancel).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::OutputFile { .. })
    ));
    assert_eq!(ExitCode::for_error(&err), ExitCode::ConfigError);
    assert!(err.to_string().contains("Cannot create output file"));
    assert!(!report.exists());
}

#[test]
fn test_run_scan_interrupted_with_valid_output() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "a.txt", b"dup");
    let report = dir.path().join("report.json");

    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = dupfind::run_scan(&settings(dir.path(), Some(report)), cancel).unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::Interrupted);
}

#[test]
fn test_run_app_writes_json_report() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    write_file(&data, "a.txt", b"dup");
    write_file(&data, "b.txt", b"dup");
    let report = dir.path().join("report.json");

    let cli = Cli::try_parse_from([
        "dupfind",
        data.to_str().unwrap(),
        "--format",
        "json",
        "--output-file",
        report.to_str().unwrap(),
        "--quiet",
    ])
    .unwrap();

    assert_eq!(dupfind::run_app(cli).unwrap(), ExitCode::Success);

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(value["duplicates"].as_array().unwrap().len(), 1);
    assert_eq!(value["duplicates"][0]["count"], 2);
    assert_eq!(value["stats"]["total_files"], 2);
    assert_eq!(value["stats"]["total_wasted_space"], 3);
}

#[test]
fn test_run_app_writes_csv_report() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    write_file(&data, "a.txt", b"dup");
    write_file(&data, "b.txt", b"dup");
    let report = dir.path().join("report.csv");

    let cli = Cli::try_parse_from([
        "dupfind",
        data.to_str().unwrap(),
        "-f",
        "csv",
        "-o",
        report.to_str().unwrap(),
        "-q",
    ])
    .unwrap();

    assert_eq!(dupfind::run_app(cli).unwrap(), ExitCode::Success);

    let csv = fs::read_to_string(&report).unwrap();
    assert!(csv.starts_with("hash,path,size,group_size\n"));
    assert_eq!(csv.lines().count(), 3);
}

#[test]
fn test_run_app_no_duplicates_text() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    write_file(&data, "a.txt", b"one");
    write_file(&data, "b.txt", b"two");
    let report = dir.path().join("report.txt");

    let cli = Cli::try_parse_from([
        "dupfind",
        data.to_str().unwrap(),
        "-o",
        report.to_str().unwrap(),
        "-q",
    ])
    .unwrap();

    assert_eq!(dupfind::run_app(cli).unwrap(), ExitCode::Success);
    assert_eq!(fs::read_to_string(&report).unwrap(), "No duplicates found!\n");
}

#[test]
fn test_run_app_missing_path_is_config_error() {
    let dir = TempDir::new().unwrap();
    let cli = Cli::try_parse_from([
        "dupfind",
        dir.path().join("missing").to_str().unwrap(),
        "-q",
    ])
    .unwrap();

    let err = dupfind::run_app(cli).unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::ConfigError);
}

#[test]
fn test_run_app_unknown_algorithm_is_config_error() {
    let dir = TempDir::new().unwrap();
    let cli = Cli::try_parse_from(["dupfind", dir.path().to_str().unwrap(), "-a", "crc32", "-q"])
        .unwrap();

    let err = dupfind::run_app(cli).unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::ConfigError);
    assert!(err.to_string().contains("crc32"));
}

#[test]
fn test_run_app_save_config_creates_file() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    write_file(&data, "a.txt", b"one");
    let config_path = dir.path().join("conf").join("dupfind.toml");
    let report = dir.path().join("report.csv");

    let cli = Cli::try_parse_from([
        "dupfind",
        data.to_str().unwrap(),
        "-a",
        "blake3",
        "-w",
        "3",
        "-f",
        "csv",
        "-o",
        report.to_str().unwrap(),
        "-q",
        "--config",
        config_path.to_str().unwrap(),
        "--save-config",
    ])
    .unwrap();

    assert_eq!(dupfind::run_app(cli).unwrap(), ExitCode::Success);

    let saved = Config::extract(Config::file_layers(Some(&config_path)).unwrap()).unwrap();
    assert_eq!(saved.algorithm, "blake3");
    assert_eq!(saved.workers, 3);
    assert_eq!(saved.format, "csv");
    assert!(report.exists());
}

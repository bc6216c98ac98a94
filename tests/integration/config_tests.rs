use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use dupfind::config::{Config, ENV_PREFIX};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_load_from_env() {
    std::env::set_var("DUPFIND_ALGORITHM", "sha256");
    std::env::set_var("DUPFIND_WORKERS", "16");

    let figment =
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed(ENV_PREFIX));
    let config: Config = figment.extract().unwrap();

    assert_eq!(config.algorithm, "sha256");
    assert_eq!(config.workers, 16);

    std::env::remove_var("DUPFIND_ALGORITHM");
    std::env::remove_var("DUPFIND_WORKERS");
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let toml_content = r#"
algorithm = "blake3"
workers = 8
format = "csv"
show_progress = false
"#;
    fs::write(&config_path, toml_content).unwrap();

    let figment =
        Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(&config_path));
    let config: Config = figment.extract().unwrap();

    assert_eq!(config.algorithm, "blake3");
    assert_eq!(config.workers, 8);
    assert_eq!(config.format, "csv");
    assert!(!config.show_progress);
}

#[test]
fn test_config_save_toml_roundtrip_keys() {
    let config = Config {
        workers: 2,
        ..Config::default()
    };

    let content = toml::to_string_pretty(&config).unwrap();
    assert!(content.contains("workers = 2"));
    assert!(content.contains("algorithm = \"md5\""));
}

#[test]
fn test_config_invalid_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "workers = [").unwrap();

    let result = Config::extract(Config::file_layers(Some(&config_path)).unwrap());
    assert!(result.is_err());
}

#[test]
fn test_config_explicit_file_used_by_load() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("custom.toml");
    fs::write(&config_path, "format = \"json\"\n").unwrap();

    let config = Config::load(Some(&config_path)).unwrap();
    assert_eq!(config.format, "json");
}

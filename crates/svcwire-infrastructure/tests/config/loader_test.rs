//! Configuration Loader Tests

use std::fs;

use svcwire_infrastructure::config::{ConfigBuilder, ConfigLoader, LoggingConfig, RegistryConfig};
use svcwire_infrastructure::constants::DEFAULT_LOG_LEVEL;
use tempfile::TempDir;

#[test]
fn test_missing_config_file_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = ConfigLoader::new()
        .with_config_path(temp_dir.path().join("absent.toml"))
        .load()
        .unwrap();

    assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
    assert!(config.registry.use_default_factories);
    assert!(config.registry.eager_initialization);
}

#[test]
fn test_partial_file_overrides_only_its_keys() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("svcwire.toml");
    fs::write(
        &config_path,
        "[registry]\neager_initialization = false\n\n[logging]\nlevel = \"debug\"\n",
    )
    .unwrap();

    let loader = ConfigLoader::new().with_config_path(&config_path);
    let config = loader.load().unwrap();

    assert_eq!(loader.config_path(), Some(config_path.as_path()));
    assert_eq!(config.logging.level, "debug");
    assert!(!config.registry.eager_initialization);
    assert!(config.registry.use_default_factories);
}

#[test]
fn test_invalid_log_level_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("svcwire.toml");
    fs::write(&config_path, "[logging]\nlevel = \"chatty\"\n").unwrap();

    let err = ConfigLoader::new()
        .with_config_path(&config_path)
        .load()
        .unwrap_err();

    assert!(err.to_string().contains("chatty"));
}

#[test]
fn test_malformed_file_is_a_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("svcwire.toml");
    fs::write(&config_path, "[registry]\neager_initialization = \"sometimes\"\n").unwrap();

    let err = ConfigLoader::new()
        .with_config_path(&config_path)
        .load()
        .unwrap_err();

    assert!(err.to_string().contains("Failed to extract configuration"));
}

#[test]
fn test_config_save_load() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("saved.toml");

    let original = ConfigBuilder::new()
        .with_logging(LoggingConfig {
            level: "warn".to_string(),
            json_format: true,
        })
        .with_registry(RegistryConfig {
            use_default_factories: false,
            eager_initialization: true,
        })
        .build();

    let loader = ConfigLoader::new();
    loader.save_to_file(&original, &config_path).unwrap();

    let loaded = ConfigLoader::new()
        .with_config_path(&config_path)
        .load()
        .unwrap();

    assert_eq!(loaded, original);
}

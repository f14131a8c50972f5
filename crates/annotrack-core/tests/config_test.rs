use std::io::Write;
use std::path::PathBuf;

use annotrack_core::config::storage_config::MAX_READ_POOL_SIZE;
use annotrack_core::config::StorageConfig;
use annotrack_core::tracing_setup::init_tracing;
use annotrack_core::{AnnotrackConfig, AnnotrackError};

#[test]
fn defaults_are_in_memory_with_bounded_waits() {
    let config = AnnotrackConfig::default();
    assert!(config.storage.db_path.is_none());
    assert_eq!(config.storage.read_pool_size, 4);
    assert_eq!(config.storage.write_lock_timeout_ms, 5_000);
    assert_eq!(config.storage.busy_timeout_ms, 5_000);
    assert_eq!(config.observability.log_level, "info");
    assert!(!config.observability.json_logs);
}

#[test]
fn partial_toml_keeps_other_defaults() {
    let config = AnnotrackConfig::from_toml(
        r#"
        [storage]
        db_path = "/var/lib/annotrack/store.db"
        write_lock_timeout_ms = 250

        [observability]
        json_logs = true
        "#,
    )
    .unwrap();
    assert_eq!(
        config.storage.db_path,
        Some(PathBuf::from("/var/lib/annotrack/store.db"))
    );
    assert_eq!(config.storage.write_lock_timeout().as_millis(), 250);
    assert_eq!(config.storage.read_pool_size, 4);
    assert_eq!(config.observability.log_level, "info");
    assert!(config.observability.json_logs);
}

#[test]
fn empty_toml_is_all_defaults() {
    let config = AnnotrackConfig::from_toml("").unwrap();
    assert!(config.storage.db_path.is_none());
    assert_eq!(config.storage.busy_timeout().as_secs(), 5);
}

#[test]
fn read_pool_size_is_clamped() {
    let huge = StorageConfig {
        read_pool_size: 100,
        ..StorageConfig::default()
    };
    assert_eq!(huge.effective_read_pool_size(), MAX_READ_POOL_SIZE);
    let zero = StorageConfig {
        read_pool_size: 0,
        ..StorageConfig::default()
    };
    assert_eq!(zero.effective_read_pool_size(), 1);
}

#[test]
fn config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("annotrack.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "[storage]\nread_pool_size = 2").unwrap();
    drop(file);

    let config = AnnotrackConfig::from_file(&path).unwrap();
    assert_eq!(config.storage.read_pool_size, 2);
}

#[test]
fn missing_or_malformed_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = AnnotrackConfig::from_file(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(missing, AnnotrackError::ConfigError(_)));

    let bad = dir.path().join("bad.toml");
    std::fs::write(&bad, "[storage]\nread_pool_size = \"many\"").unwrap();
    let err = AnnotrackConfig::from_file(&bad).unwrap_err();
    assert!(matches!(err, AnnotrackError::ConfigError(_)));
}

#[test]
fn tracing_init_is_idempotent() {
    let config = AnnotrackConfig::default();
    init_tracing(&config.observability);
    assert!(!init_tracing(&config.observability));
}

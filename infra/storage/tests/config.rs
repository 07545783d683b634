use std::path::PathBuf;
use stow_storage::{BackendKind, FsConfig, StorageConfig, StorageError};
use tempfile::TempDir;

#[test]
fn test_deserializes_filesystem_section() {
    let config: StorageConfig = serde_json::from_str(
        r#"{ "type": "filesystem", "filesystem": { "path": "/var/backups/cluster" } }"#,
    )
    .unwrap();

    assert_eq!(config.kind, BackendKind::Filesystem);
    assert_eq!(config.filesystem, Some(FsConfig::new(PathBuf::from("/var/backups/cluster"))));
}

#[test]
fn test_defaults_to_filesystem_kind() {
    let config: StorageConfig =
        serde_json::from_str(r#"{ "filesystem": { "path": "data" } }"#).unwrap();

    assert_eq!(config.kind, BackendKind::Filesystem);
}

#[test]
fn test_serializes_type_tag() {
    let value = serde_json::to_value(StorageConfig::filesystem("data")).unwrap();

    assert_eq!(value, serde_json::json!({ "type": "filesystem", "filesystem": { "path": "data" } }));
}

#[test]
fn test_unsupported_kind_is_rejected() {
    let config: StorageConfig = serde_json::from_str(r#"{ "type": "s3" }"#).unwrap();

    let err = config.open().unwrap_err();
    assert!(matches!(err, StorageError::InvalidConfig { .. }), "{err:?}");
    assert!(err.to_string().contains("s3"), "{err}");
}

#[test]
fn test_unknown_kind_fails_to_parse() {
    assert!(serde_json::from_str::<StorageConfig>(r#"{ "type": "ftp" }"#).is_err());
}

#[test]
fn test_missing_section_is_rejected() {
    let config = StorageConfig { kind: BackendKind::Filesystem, filesystem: None };

    assert!(matches!(config.validate().unwrap_err(), StorageError::InvalidConfig { .. }));
    assert!(matches!(config.open().unwrap_err(), StorageError::InvalidConfig { .. }));
}

#[test]
fn test_empty_path_is_rejected_before_disk_access() {
    let config = StorageConfig::filesystem("");

    let err = config.open_filesystem().unwrap_err();
    assert!(matches!(err, StorageError::InvalidConfig { .. }), "{err:?}");
}

#[test]
fn test_root_that_is_a_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("plain");
    std::fs::write(&file, b"not a dir").unwrap();

    let err = FsConfig::new(&file).open().unwrap_err();
    assert!(matches!(err, StorageError::InvalidConfig { .. }), "{err:?}");
}

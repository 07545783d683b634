use crate::backend::{Backend, BackendKind};
use crate::engine::FsBackend;
use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Filesystem backend options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FsConfig {
    /// Base directory holding every object.
    pub path: PathBuf,
}

impl FsConfig {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Rejects unusable settings before any filesystem access.
    ///
    /// # Errors
    /// [`StorageError::InvalidConfig`] if the path is empty.
    pub fn validate(&self) -> Result<(), StorageError> {
        if self.path.as_os_str().is_empty() {
            return Err(StorageError::InvalidConfig {
                message: "path can't be empty".into(),
                context: Some("filesystem".into()),
            });
        }
        Ok(())
    }

    /// Validates the options and resolves the storage root.
    ///
    /// # Errors
    /// See [`FsConfig::validate`] and [`FsBackendBuilder::open`](crate::FsBackendBuilder::open).
    pub fn open(&self) -> Result<FsBackend, StorageError> {
        self.validate()?;
        FsBackend::builder().root(&self.path).open()
    }
}

/// Backend selection as read from configuration files.
///
/// ```toml
/// type = "filesystem"
///
/// [filesystem]
/// path = "/var/backups/cluster"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    #[serde(rename = "type")]
    pub kind: BackendKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filesystem: Option<FsConfig>,
}

impl StorageConfig {
    /// Filesystem storage rooted at `path`.
    #[must_use]
    pub fn filesystem(path: impl Into<PathBuf>) -> Self {
        Self { kind: BackendKind::Filesystem, filesystem: Some(FsConfig::new(path)) }
    }

    /// # Errors
    /// [`StorageError::InvalidConfig`] if the selected kind has no usable section.
    pub fn validate(&self) -> Result<(), StorageError> {
        self.fs_section()?.validate()
    }

    /// Builds the backend selected by `type`.
    ///
    /// # Errors
    /// [`StorageError::InvalidConfig`] for kinds this crate cannot build or a
    /// missing/invalid section; root resolution errors otherwise.
    pub fn open(&self) -> Result<Box<dyn Backend>, StorageError> {
        Ok(Box::new(self.open_filesystem()?))
    }

    /// Builds the concrete filesystem backend, for callers that need its extra
    /// maintenance operations.
    ///
    /// # Errors
    /// As [`StorageConfig::open`].
    pub fn open_filesystem(&self) -> Result<FsBackend, StorageError> {
        self.fs_section()?.open()
    }

    fn fs_section(&self) -> Result<&FsConfig, StorageError> {
        if self.kind != BackendKind::Filesystem {
            return Err(StorageError::InvalidConfig {
                message: format!("backend type '{}' is not supported", self.kind).into(),
                context: None,
            });
        }
        self.filesystem.as_ref().ok_or_else(|| StorageError::InvalidConfig {
            message: "missing [filesystem] section".into(),
            context: Some("type = \"filesystem\"".into()),
        })
    }
}

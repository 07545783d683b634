//! The object-storage contract shared by every backend variant.
//!
//! The orchestration layer only ever holds a `dyn Backend`; concrete types such as
//! [`FsBackend`](crate::FsBackend) are chosen once, from configuration.

use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;

/// Tag identifying a backend variant.
///
/// Only [`BackendKind::Filesystem`] can be constructed by this crate; the other
/// tags exist so configuration can name them and reject them explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Filesystem,
    S3,
    Azure,
    Gcs,
    Blackhole,
}

impl BackendKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Filesystem => "filesystem",
            Self::S3 => "s3",
            Self::Azure => "azure",
            Self::Gcs => "gcs",
            Self::Blackhole => "blackhole",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata projection of a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileInfo {
    /// Slash-separated object name.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
}

/// Uniform object-storage capability set.
///
/// All calls block. Implementations provide no locking: concurrent writers to one
/// name race, and the last successful publish wins.
pub trait Backend: Send + Sync + fmt::Debug {
    /// Identifies the backend variant.
    fn kind(&self) -> BackendKind;

    /// Stores the whole of `data` under `name`, replacing any previous content.
    ///
    /// `size_hint` is advisory and never enforced. On failure the previous content
    /// (or absence) of `name` is preserved.
    fn save(&self, name: &str, data: &mut dyn Read, size_hint: u64) -> Result<(), StorageError>;

    /// Opens `name` for sequential reading; the handle is released on drop.
    ///
    /// # Errors
    /// [`StorageError::NotFound`] if the object does not exist.
    fn open_reader(&self, name: &str) -> Result<Box<dyn Read + Send>, StorageError>;

    /// Returns name and size of `name`.
    ///
    /// # Errors
    /// [`StorageError::NotFound`] if absent, [`StorageError::Empty`] if it holds zero bytes.
    fn stat(&self, name: &str) -> Result<FileInfo, StorageError>;

    /// Lists objects under `prefix` whose prefix-relative name ends with `suffix`.
    ///
    /// A missing prefix yields an empty list. Order is unspecified.
    fn list(&self, prefix: &str, suffix: &str) -> Result<Vec<FileInfo>, StorageError>;

    /// Streams `src` into `dst` with the same guarantees as [`Backend::save`].
    fn copy(&self, src: &str, dst: &str) -> Result<(), StorageError>;

    /// Removes `name`, recursively when it denotes a directory.
    ///
    /// # Errors
    /// [`StorageError::NotFound`] if nothing exists at `name`.
    fn delete(&self, name: &str) -> Result<(), StorageError>;

    /// Convenience wrapper around [`Backend::save`] for in-memory payloads.
    fn save_bytes(&self, name: &str, data: &[u8]) -> Result<(), StorageError> {
        let mut reader = data;
        self.save(name, &mut reader, data.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_serde() {
        for kind in [
            BackendKind::Filesystem,
            BackendKind::S3,
            BackendKind::Azure,
            BackendKind::Gcs,
            BackendKind::Blackhole,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
            assert_eq!(serde_json::from_str::<BackendKind>(&json).unwrap(), kind);
        }
    }

    #[test]
    fn file_info_serializes_as_flat_object() {
        let info = FileInfo { name: "db/coll.bson".to_owned(), size: 11 };
        assert_eq!(
            serde_json::to_value(&info).unwrap(),
            serde_json::json!({ "name": "db/coll.bson", "size": 11 })
        );
    }
}

//! Filesystem implementation of the [`Backend`] contract.
//!
//! Every object is one regular file below the resolved root. Writes go through the
//! stage-then-publish primitive in [`crate::writer`]; reads, listing, stat and delete
//! touch the filesystem directly.

use crate::backend::{Backend, BackendKind, FileInfo};
use crate::builder::FsBackendBuilder;
use crate::error::StorageError;
use crate::maintenance::{self, PurgeReport};
use crate::security;
use crate::writer;
use std::fs;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use walkdir::WalkDir;

/// The internal shared state of an [`FsBackend`].
#[derive(Debug)]
pub(crate) struct FsBackendInner {
    /// Resolved storage root; never changes after construction.
    pub(crate) root: PathBuf,
}

/// A thread-safe handle to a directory-backed object store.
///
/// Cloning is cheap: clones share one resolved root.
///
/// # Example
///
/// ```rust
/// use stow_storage::{Backend, FsBackend, StorageError};
/// use std::io::Read;
///
/// # fn main() -> Result<(), StorageError> {
/// # let tmp = tempfile::tempdir().unwrap();
/// let backend = FsBackend::builder().root(tmp.path().join("backups")).open()?;
///
/// backend.save("db/coll.bson", &mut &b"hello world"[..], 11)?;
///
/// let info = backend.stat("db/coll.bson")?;
/// assert_eq!(info.size, 11);
///
/// let mut content = String::new();
/// backend.open_reader("db/coll.bson")?.read_to_string(&mut content).unwrap();
/// assert_eq!(content, "hello world");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FsBackend {
    pub(crate) inner: Arc<FsBackendInner>,
}

impl FsBackend {
    #[must_use = "The backend is not initialized until you call .open()"]
    pub fn builder() -> FsBackendBuilder {
        FsBackendBuilder::new()
    }

    /// The resolved storage root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    /// Maps an object name to its physical path below the root.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidName`] if the name is empty, absolute, climbs
    /// above the root, or ends in the reserved staging suffix.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, StorageError> {
        Ok(self.inner.root.join(security::object_path(name)?))
    }

    /// Removes `*.tmp` staging artifacts older than `max_age`.
    ///
    /// Artifacts younger than `max_age` may belong to a write still in progress
    /// and are kept. Individual removal failures are counted, not returned.
    pub fn purge_staging(&self, max_age: Duration) -> PurgeReport {
        maintenance::purge_staging(&self.inner.root, max_age)
    }

    fn open_object(path: &Path, op: &'static str) -> Result<fs::File, StorageError> {
        match fs::File::open(path) {
            Ok(file) => Ok(file),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(StorageError::not_found(path, op)),
            Err(err) => Err(StorageError::io(err, format!("open file '{}'", path.display()))),
        }
    }
}

impl Backend for FsBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Filesystem
    }

    fn save(&self, name: &str, data: &mut dyn Read, size_hint: u64) -> Result<(), StorageError> {
        let path = self.resolve(name)?;
        let written = writer::stage_and_publish(&path, data)?;

        if written != size_hint {
            debug!(name, size_hint, written, "Size hint differs from bytes written");
        }
        Ok(())
    }

    fn open_reader(&self, name: &str) -> Result<Box<dyn Read + Send>, StorageError> {
        let path = self.resolve(name)?;
        Ok(Box::new(Self::open_object(&path, "open reader")?))
    }

    fn stat(&self, name: &str) -> Result<FileInfo, StorageError> {
        let path = self.resolve(name)?;

        let meta = match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => return Err(StorageError::not_found(&path, "stat")),
            Ok(meta) => meta,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(StorageError::not_found(&path, "stat"));
            },
            Err(err) => return Err(StorageError::io(err, format!("stat {}", path.display()))),
        };

        if meta.len() == 0 {
            return Err(StorageError::Empty {
                message: path.display().to_string().into(),
                context: Some("stat".into()),
            });
        }

        Ok(FileInfo { name: name.to_owned(), size: meta.len() })
    }

    fn list(&self, prefix: &str, suffix: &str) -> Result<Vec<FileInfo>, StorageError> {
        let base = self.inner.root.join(security::prefix_path(prefix)?);
        let mut files = Vec::new();

        for entry in WalkDir::new(&base) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if is_missing(&err) => continue,
                Err(err) => {
                    return Err(StorageError::io(
                        err.into(),
                        format!("walking the path {}", base.display()),
                    ));
                },
            };

            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(&base) else {
                continue;
            };
            if rel.as_os_str().is_empty() {
                continue;
            }
            let Some(name) = slash_name(rel) else {
                debug!(path = %entry.path().display(), "Skipping non-UTF-8 object name");
                continue;
            };
            if !name.ends_with(suffix) {
                continue;
            }

            let size = match entry.metadata() {
                Ok(meta) => meta.len(),
                Err(err) if is_missing(&err) => continue,
                Err(err) => {
                    return Err(StorageError::io(
                        err.into(),
                        format!("stat {}", entry.path().display()),
                    ));
                },
            };

            files.push(FileInfo { name, size });
        }

        Ok(files)
    }

    fn copy(&self, src: &str, dst: &str) -> Result<(), StorageError> {
        let from_path = self.resolve(src)?;
        let to_path = self.resolve(dst)?;

        let mut from = Self::open_object(&from_path, "open src")?;
        let written = writer::stage_and_publish(&to_path, &mut from)?;

        debug!(src, dst, bytes = written, "Object copied");
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<(), StorageError> {
        let path = self.resolve(name)?;

        let meta = match fs::symlink_metadata(&path) {
            Ok(meta) => meta,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(StorageError::not_found(&path, "delete"));
            },
            Err(err) => return Err(StorageError::io(err, format!("stat {}", path.display()))),
        };

        let removed =
            if meta.is_dir() { fs::remove_dir_all(&path) } else { fs::remove_file(&path) };

        match removed {
            Ok(()) => {
                debug!(path = %path.display(), "Object deleted");
                Ok(())
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(StorageError::not_found(&path, "delete"))
            },
            Err(err) => Err(StorageError::io(err, format!("delete {}", path.display()))),
        }
    }
}

fn is_missing(err: &walkdir::Error) -> bool {
    err.io_error().is_some_and(|e| e.kind() == ErrorKind::NotFound)
}

/// Slash-joined form of a relative path; `None` if any segment is not UTF-8.
fn slash_name(rel: &Path) -> Option<String> {
    let segments =
        rel.components().map(|c| c.as_os_str().to_str()).collect::<Option<Vec<_>>>()?;
    Some(segments.join("/"))
}

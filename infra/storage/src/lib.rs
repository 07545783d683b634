//! Object storage for backup and restore pipelines.
//!
//! The crate exposes one capability set, [`Backend`], and one implementation of it,
//! [`FsBackend`], which keeps every object as a plain file below a root directory.
//! All calls block; callers that need concurrency run them on their own threads.
//!
//! # Core Features
//!
//! - **Atomic Publish**: Objects are staged as `<name>.tmp`, fsynced and renamed into
//!   place, so a reader sees either the previous content or the complete new content.
//! - **Root Resolution**: The root is created on demand and symlinked roots are resolved
//!   once, at construction.
//! - **Name Sandboxing**: Absolute names and names climbing above the root are rejected.
//! - **Explicit Maintenance**: Stale staging artifacts are only removed by
//!   [`FsBackend::purge_staging`].
//!
//! # Examples
//!
//! ```rust
//! use stow_storage::{Backend, StorageConfig, StorageError};
//!
//! # fn main() -> Result<(), StorageError> {
//! # let tmp = tempfile::tempdir().unwrap();
//! let backend = StorageConfig::filesystem(tmp.path().join("cluster")).open()?;
//!
//! backend.save_bytes("rs0/oplog.bson", b"oplog")?;
//! backend.copy("rs0/oplog.bson", "rs0/oplog.bson.bak")?;
//!
//! let files = backend.list("rs0", ".bak")?;
//! assert_eq!(files.len(), 1);
//! assert_eq!(files[0].name, "oplog.bson.bak");
//! # Ok(())
//! # }
//! ```

mod backend;
mod builder;
mod config;
mod engine;
mod error;
mod maintenance;
mod root;
mod security;
mod writer;

pub use backend::{Backend, BackendKind, FileInfo};
pub use builder::{FsBackendBuilder, NoRoot, WithRoot};
pub use config::{FsConfig, StorageConfig};
pub use engine::FsBackend;
pub use error::{StorageError, StorageErrorExt};
pub use maintenance::PurgeReport;
pub use writer::STAGING_SUFFIX;

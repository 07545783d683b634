//! Storage root resolution, run once per backend instance.

use crate::error::{StorageError, StorageErrorExt};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

#[cfg(unix)]
const ROOT_DIR_MODE: u32 = 0o755;

/// Turns a configured base directory into a usable storage root.
///
/// 1. A missing path is created with all of its ancestors (unless `create` is off).
/// 2. A symbolic link is replaced by its fully resolved target.
/// 3. The result must be a directory.
///
/// # Errors
///
/// [`StorageError::InvalidConfig`] for an empty path, a missing path with `create`
/// disabled, or a non-directory target. [`StorageError::Io`] when creation or link
/// resolution fails (permissions, broken or cyclic links).
pub(crate) fn resolve_root(path: &Path, create: bool) -> Result<PathBuf, StorageError> {
    if path.as_os_str().is_empty() {
        return Err(StorageError::InvalidConfig {
            message: "path can't be empty".into(),
            context: Some("filesystem backend".into()),
        });
    }

    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            if !create {
                return Err(StorageError::InvalidConfig {
                    message: format!("{} does not exist", path.display()).into(),
                    context: Some("root creation is disabled".into()),
                });
            }
            create_root(path)?;
            info!(path = %path.display(), "Created storage root directory");
            return absolute(path);
        },
        Err(err) => return Err(StorageError::io(err, format!("stat {}", path.display()))),
    };

    let (root, meta) = if meta.file_type().is_symlink() {
        let target =
            fs::canonicalize(path).context(format!("resolve link: {}", path.display()))?;
        let meta = fs::symlink_metadata(&target).context(format!("stat {}", target.display()))?;
        (target, meta)
    } else {
        (absolute(path)?, meta)
    };

    if !meta.is_dir() {
        return Err(StorageError::InvalidConfig {
            message: format!("{} is not directory", root.display()).into(),
            context: None,
        });
    }

    Ok(root)
}

fn create_root(path: &Path) -> Result<(), StorageError> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(ROOT_DIR_MODE);
    }
    builder.create(path).context(format!("mkdir {}", path.display()))
}

fn absolute(path: &Path) -> Result<PathBuf, StorageError> {
    std::path::absolute(path).context(format!("absolute path of {}", path.display()))
}

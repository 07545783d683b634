//! Stage-then-publish write primitive shared by `save` and `copy`.

use crate::error::{StorageError, StorageErrorExt};
use std::ffi::OsString;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Suffix of the staging artifact written next to its object.
pub const STAGING_SUFFIX: &str = ".tmp";

#[cfg(unix)]
const OBJECT_MODE: u32 = 0o644;
#[cfg(unix)]
const DIR_MODE: u32 = 0o755;

/// `<target>.tmp`, a sibling of the final object.
pub(crate) fn staging_path(target: &Path) -> PathBuf {
    let mut name = OsString::from(target.as_os_str());
    name.push(STAGING_SUFFIX);
    PathBuf::from(name)
}

/// Writes `data` to `<target>.tmp`, fsyncs it, and renames it over `target`.
///
/// The final name only ever switches from its previous state (absent or old
/// content) to the complete new content. On any failure the staging artifact is
/// removed best-effort and `target` is left untouched.
///
/// Returns the number of bytes published.
pub(crate) fn stage_and_publish(target: &Path, data: &mut dyn Read) -> Result<u64, StorageError> {
    let staging = staging_path(target);

    let written = match write_synced(&staging, data) {
        Ok(written) => written,
        Err(err) => {
            discard(&staging);
            return Err(err);
        },
    };

    if let Err(err) = fs::rename(&staging, target) {
        discard(&staging);
        return Err(StorageError::io(
            err,
            format!("rename <{}> to <{}>", staging.display(), target.display()),
        ));
    }

    if let Some(parent) = target.parent() {
        sync_dir(parent);
    }

    debug!(path = %target.display(), bytes = written, "Object published atomically");
    Ok(written)
}

fn write_synced(staging: &Path, data: &mut dyn Read) -> Result<u64, StorageError> {
    if let Some(parent) = staging.parent() {
        create_parents(parent).context(format!("create path {}", parent.display()))?;
    }

    let mut file = fs::File::create(staging)
        .context(format!("create destination file <{}>", staging.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(OBJECT_MODE))
            .context(format!("change permissions for file <{}>", staging.display()))?;
    }

    let written =
        io::copy(data, &mut file).context(format!("copy file <{}>", staging.display()))?;
    file.sync_all().context(format!("sync file <{}>", staging.display()))?;

    Ok(written)
}

fn create_parents(dir: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder.create(dir)
}

fn discard(staging: &Path) {
    match fs::remove_file(staging) {
        Ok(()) => debug!(path = %staging.display(), "Staging artifact discarded"),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {},
        Err(err) => debug!(path = %staging.display(), error = %err, "Staging artifact left behind"),
    }
}

/// Persists the rename itself; failures are logged, never returned.
#[cfg(unix)]
fn sync_dir(dir: &Path) {
    match fs::File::open(dir) {
        Ok(handle) => {
            if let Err(err) = handle.sync_all() {
                tracing::warn!(path = %dir.display(), error = %err, "Directory sync failed");
            }
        },
        Err(err) => {
            tracing::warn!(path = %dir.display(), error = %err, "Directory open failed");
        },
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Interrupted {
        sent: bool,
    }

    impl Read for Interrupted {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.sent {
                return Err(io::Error::other("stream interrupted"));
            }
            self.sent = true;
            let n = buf.len().min(7);
            buf[..n].copy_from_slice(&b"partial"[..n]);
            Ok(n)
        }
    }

    #[test]
    fn staging_name_appends_suffix() {
        assert_eq!(
            staging_path(Path::new("/data/db/coll.bson")),
            Path::new("/data/db/coll.bson.tmp")
        );
    }

    #[test]
    fn publish_creates_parents_and_leaves_no_artifact() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("db").join("coll.bson");

        let written = stage_and_publish(&target, &mut &b"hello world"[..]).unwrap();

        assert_eq!(written, 11);
        assert_eq!(fs::read(&target).unwrap(), b"hello world");
        assert!(!staging_path(&target).exists());
    }

    #[cfg(unix)]
    #[test]
    fn published_object_has_fixed_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let target = temp.path().join("mode.bin");
        stage_and_publish(&target, &mut &b"x"[..]).unwrap();

        let mode = fs::metadata(&target).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, OBJECT_MODE);
    }

    #[test]
    fn failed_stream_keeps_previous_content() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("obj");
        fs::write(&target, b"previous").unwrap();

        let err = stage_and_publish(&target, &mut Interrupted { sent: false }).unwrap_err();

        assert!(matches!(err, StorageError::Io { .. }), "{err:?}");
        assert_eq!(fs::read(&target).unwrap(), b"previous");
        assert!(!staging_path(&target).exists());
    }

    #[test]
    fn failed_stream_on_new_object_leaves_it_absent() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("fresh");

        stage_and_publish(&target, &mut Interrupted { sent: false }).unwrap_err();

        assert!(!target.exists());
        assert!(!staging_path(&target).exists());
    }

    #[test]
    fn publish_failure_discards_staging() {
        let temp = TempDir::new().unwrap();
        // A non-empty directory cannot be replaced by a file rename.
        let target = temp.path().join("occupied");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("child"), b"x").unwrap();

        let err = stage_and_publish(&target, &mut &b"data"[..]).unwrap_err();

        assert!(matches!(err, StorageError::Io { .. }), "{err:?}");
        assert!(target.join("child").exists());
        assert!(!staging_path(&target).exists());
    }
}

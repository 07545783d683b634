use crate::writer::STAGING_SUFFIX;
use serde::Serialize;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::info;
use walkdir::{DirEntry, WalkDir};

/// Outcome of a staging purge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PurgeReport {
    pub removed: usize,
    pub failed: usize,
}

pub(crate) fn purge_staging(root: &Path, max_age: Duration) -> PurgeReport {
    let now = SystemTime::now();
    let mut report = PurgeReport::default();

    WalkDir::new(root)
        .into_iter()
        .flatten()
        .filter(|entry| is_staging(entry) && is_stale(entry, now, max_age))
        .for_each(|entry| match std::fs::remove_file(entry.path()) {
            Ok(()) => report.removed += 1,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {},
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "Staging purge failed");
                report.failed += 1;
            },
        });

    if report.removed > 0 || report.failed > 0 {
        info!(removed = report.removed, failed = report.failed, "Purged stale staging artifacts");
    }

    report
}

fn is_staging(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        && entry.file_name().to_str().is_some_and(|name| name.ends_with(STAGING_SUFFIX))
}

/// Unknown modification times count as stale.
fn is_stale(entry: &DirEntry, now: SystemTime, max_age: Duration) -> bool {
    entry
        .metadata()
        .ok()
        .and_then(|m| m.modified().ok())
        .and_then(|modified| now.duration_since(modified).ok())
        .map_or(true, |age| age >= max_age)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn removes_only_staging_artifacts() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("db")).unwrap();
        fs::write(temp.path().join("db/coll.bson"), b"data").unwrap();
        fs::write(temp.path().join("db/coll.bson.tmp"), b"orphan").unwrap();
        fs::write(temp.path().join("top.tmp"), b"orphan").unwrap();

        let report = purge_staging(temp.path(), Duration::ZERO);

        assert_eq!(report, PurgeReport { removed: 2, failed: 0 });
        assert!(temp.path().join("db/coll.bson").exists());
        assert!(!temp.path().join("db/coll.bson.tmp").exists());
        assert!(!temp.path().join("top.tmp").exists());
    }

    #[test]
    fn fresh_artifacts_survive() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("inflight.tmp"), b"writing").unwrap();

        let report = purge_staging(temp.path(), Duration::from_secs(3600));

        assert_eq!(report, PurgeReport::default());
        assert!(temp.path().join("inflight.tmp").exists());
    }
}

use crate::error::StorageError;
use crate::writer::STAGING_SUFFIX;
use std::path::{Component, Path, PathBuf};

/// Normalizes an object name into a root-relative path.
///
/// Empty names are rejected: every object is a file below the root. Names whose
/// last segment ends in [`STAGING_SUFFIX`] are reserved for staging artifacts.
pub(crate) fn object_path(name: &str) -> Result<PathBuf, StorageError> {
    let rel = normalize_relative(Path::new(name))?;
    if rel.as_os_str().is_empty() {
        return Err(StorageError::InvalidName {
            message: format!("'{name}'").into(),
            context: Some("Object name cannot be empty".into()),
        });
    }
    if is_staging_name(&rel) {
        return Err(StorageError::InvalidName {
            message: format!("'{name}'").into(),
            context: Some("Names ending in '.tmp' are reserved for staging".into()),
        });
    }
    Ok(rel)
}

fn is_staging_name(rel: &Path) -> bool {
    rel.file_name()
        .is_some_and(|leaf| leaf.as_encoded_bytes().ends_with(STAGING_SUFFIX.as_bytes()))
}

/// Normalizes a list prefix; an empty prefix addresses the whole root.
pub(crate) fn prefix_path(prefix: &str) -> Result<PathBuf, StorageError> {
    normalize_relative(Path::new(prefix))
}

/// Collapse `.` / `..` lexically while ensuring the path never climbs above the root.
fn normalize_relative(path: &Path) -> Result<PathBuf, StorageError> {
    let mut out = PathBuf::new();

    for c in path.components() {
        match c {
            Component::CurDir => {},
            Component::Normal(seg) => out.push(seg),
            Component::ParentDir => {
                if !out.pop() {
                    return Err(StorageError::InvalidName {
                        message: path.display().to_string().into(),
                        context: Some("Name escapes the storage root via '..'".into()),
                    });
                }
            },
            Component::RootDir | Component::Prefix(_) => {
                return Err(StorageError::InvalidName {
                    message: path.display().to_string().into(),
                    context: Some("Absolute names are not allowed".into()),
                });
            },
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_names_are_kept() {
        assert_eq!(object_path("db/coll.bson").unwrap(), Path::new("db/coll.bson"));
        assert_eq!(object_path("db//coll.bson").unwrap(), Path::new("db/coll.bson"));
    }

    #[test]
    fn dot_segments_collapse_inside_root() {
        assert_eq!(object_path("./a/b/../c.bin").unwrap(), Path::new("a/c.bin"));
    }

    #[test]
    fn escaping_and_absolute_names_are_rejected() {
        for name in ["../etc/passwd", "a/../../b", "/etc/passwd"] {
            assert!(
                matches!(object_path(name), Err(StorageError::InvalidName { .. })),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn staging_suffix_is_reserved_for_the_last_segment() {
        for name in ["a.tmp", "db/coll.bson.tmp", "x/./.tmp"] {
            assert!(
                matches!(object_path(name), Err(StorageError::InvalidName { .. })),
                "{name} should be rejected"
            );
        }
        assert_eq!(object_path("a.tmp/b").unwrap(), Path::new("a.tmp/b"));
        assert_eq!(object_path("a.tmpx").unwrap(), Path::new("a.tmpx"));
        assert_eq!(prefix_path("a.tmp").unwrap(), Path::new("a.tmp"));
    }

    #[test]
    fn empty_names_are_rejected_but_empty_prefix_is_root() {
        assert!(matches!(object_path(""), Err(StorageError::InvalidName { .. })));
        assert!(matches!(object_path("a/.."), Err(StorageError::InvalidName { .. })));
        assert_eq!(prefix_path("").unwrap(), PathBuf::new());
        assert_eq!(prefix_path("a/").unwrap(), Path::new("a"));
    }
}

use anyhow::Context;
use config::{Config, Environment, File};
use std::path::Path;
use stow_storage::StorageConfig;
use tracing::info;

/// Prefix of environment overrides; nesting uses `__` (`STOW__FILESYSTEM__PATH`).
const ENV_PREFIX: &str = "STOW";

/// Loads the storage configuration in layers, later sources winning:
/// 1. **File**: `file`, when given (format picked from its extension).
/// 2. **Environment**: variables prefixed with `STOW__`.
/// 3. **Flag**: `root`, which forces a filesystem backend at that directory.
///
/// # Errors
/// Fails if the file is missing or malformed, or the merged values do not
/// deserialize into a [`StorageConfig`].
pub(crate) fn load_config(
    file: Option<&Path>,
    root: Option<&Path>,
) -> anyhow::Result<StorageConfig> {
    let mut builder = Config::builder();

    if let Some(path) = file {
        info!("Loading config from {}", path.display());
        builder = builder.add_source(File::from(path).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    if let Some(root) = root {
        builder = builder
            .set_override("type", "filesystem")?
            .set_override("filesystem.path", root.to_string_lossy().into_owned())?;
    }

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<StorageConfig>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use stow_storage::{BackendKind, FsConfig};
    use tempfile::TempDir;

    #[test]
    fn file_is_loaded() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("stow.toml");
        fs::write(&file, "type = \"filesystem\"\n\n[filesystem]\npath = \"/srv/backups\"\n").unwrap();

        let config = load_config(Some(&file), None).unwrap();

        assert_eq!(config.kind, BackendKind::Filesystem);
        assert_eq!(config.filesystem, Some(FsConfig::new("/srv/backups")));
    }

    #[test]
    fn root_flag_overrides_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("stow.json");
        fs::write(&file, r#"{ "type": "s3" }"#).unwrap();

        let config = load_config(Some(&file), Some(Path::new("/tmp/override"))).unwrap();

        assert_eq!(config, StorageConfig::filesystem("/tmp/override"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();

        assert!(load_config(Some(&temp.path().join("absent.toml")), None).is_err());
    }
}

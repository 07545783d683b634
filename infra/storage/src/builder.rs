use crate::config::FsConfig;
use crate::engine::{FsBackend, FsBackendInner};
use crate::error::StorageError;
use crate::root;
use private::Sealed;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
struct BuilderConfig {
    create: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self { create: true }
    }
}

#[derive(Debug, Default)]
pub struct NoRoot;
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoRoot {}
impl Sealed for WithRoot {}

#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct FsBackendBuilder<S: Sealed = NoRoot> {
    state: S,
    config: BuilderConfig,
}

#[allow(private_bounds)]
impl<S: Sealed> FsBackendBuilder<S> {
    #[must_use = "Sets whether a missing root directory is created"]
    pub const fn create(mut self, enable: bool) -> Self {
        self.config.create = enable;
        self
    }

    fn transition<N: Sealed>(self, state: N) -> FsBackendBuilder<N> {
        FsBackendBuilder { state, config: self.config }
    }
}

impl FsBackendBuilder<NoRoot> {
    #[must_use = "Creates a new filesystem backend builder with default configuration"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the base directory of the filesystem backend"]
    pub fn root(self, path: impl Into<PathBuf>) -> FsBackendBuilder<WithRoot> {
        self.transition(WithRoot(path.into()))
    }

    #[must_use = "Sets the base directory of the filesystem backend"]
    pub fn config(self, config: FsConfig) -> FsBackendBuilder<WithRoot> {
        self.root(config.path)
    }
}

impl FsBackendBuilder<WithRoot> {
    /// Resolves the storage root and returns a ready backend.
    ///
    /// Resolution runs exactly once here:
    /// 1. An empty path is rejected before touching the disk.
    /// 2. A missing directory is created with its ancestors (when `create(true)`, the default).
    /// 3. A symlinked root is replaced by its real target.
    /// 4. The final path must be a directory.
    ///
    /// Nothing else on disk is modified; stale staging artifacts are kept until
    /// [`FsBackend::purge_staging`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidConfig`] for an empty, missing (with `create(false)`)
    /// or non-directory root, and [`StorageError::Io`] when creation or link resolution fails.
    pub fn open(self) -> Result<FsBackend, StorageError> {
        let root = root::resolve_root(&self.state.0, self.config.create)?;
        debug!(root = %root.display(), "Filesystem backend ready");

        Ok(FsBackend { inner: Arc::new(FsBackendInner { root }) })
    }
}

use std::borrow::Cow;
use std::path::Path;

/// A specialized [`StorageError`] enum of this crate.
#[stow_derive::stow_error]
pub enum StorageError {
    #[error("Invalid configuration{}: {message}", format_context(.context))]
    InvalidConfig { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid object name{}: {message}", format_context(.context))]
    InvalidName { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Object not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Object is empty{}: {message}", format_context(.context))]
    Empty { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },
}

impl StorageError {
    /// `true` when the requested object does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// `true` when the object exists but holds zero bytes.
    #[must_use]
    pub const fn is_empty_object(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }

    pub(crate) fn not_found(path: &Path, op: &'static str) -> Self {
        Self::NotFound { message: path.display().to_string().into(), context: Some(op.into()) }
    }

    pub(crate) fn io(source: std::io::Error, context: String) -> Self {
        Self::Io { source, context: Some(context.into()) }
    }
}

use std::borrow::Cow;
use stow_derive::stow_error;

#[stow_error]
pub enum ChainError {
    #[error("Not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Unit-like variant without context")]
    Closed {},
}

fn lookup() -> Result<(), ChainError> {
    Err(ChainError::NotFound { message: "key".into(), context: None })
}

fn main() {
    let err = lookup().context("lookup").unwrap_err();
    assert_eq!(err.to_string(), "Not found (lookup): key");
    let closed: Result<(), ChainError> = Err(ChainError::Closed {});
    assert!(closed.context("ignored").is_err());
}

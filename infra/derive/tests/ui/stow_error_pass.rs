use std::borrow::Cow;
use stow_derive::stow_error;

#[stow_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Missing{}: {message}", format_context(.context))]
    Missing { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<Vec<u8>, DemoError> {
    let data = std::fs::read("/definitely/not/here").context("read fixture")?;
    Ok(data)
}

fn main() {
    let _ = read();
    let _: DemoError = "boom".into();
    let _: DemoError = String::from("boom").into();
}

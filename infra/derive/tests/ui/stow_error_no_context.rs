use stow_derive::stow_error;

#[stow_error]
pub enum NoContextError {
    Io { source: std::io::Error },
}

fn main() {}

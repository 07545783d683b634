use stow_derive::stow_error;

#[stow_error]
pub enum TupleError {
    Io(std::io::Error),
}

fn main() {}

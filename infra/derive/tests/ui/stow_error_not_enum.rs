use stow_derive::stow_error;

#[stow_error]
pub struct NotAnEnum {
    message: String,
}

fn main() {}

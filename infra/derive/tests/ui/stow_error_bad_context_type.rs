use stow_derive::stow_error;

#[stow_error]
pub enum BadContextError {
    Missing { message: String, context: Option<String> },
}

fn main() {}

//! `char` cannot be returned either.

#[stackbind::function]
fn letter(index: u32) -> char {
    char::from_digit(index, 10).unwrap_or('?')
}

fn main() {}

//! `char` has no conversion contract.

#[stackbind::function]
fn initial(c: char) -> bool {
    c.is_alphabetic()
}

fn main() {}

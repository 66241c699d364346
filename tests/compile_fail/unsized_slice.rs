//! Only byte slices borrow from a script string.

#[stackbind::function]
fn total(values: &[i64]) -> i64 {
    values.iter().sum()
}

fn main() {}

//! `impl Trait` parameters are generic in disguise.

#[stackbind::function]
fn total(values: impl Iterator<Item = i64>) -> i64 {
    values.sum()
}

fn main() {}

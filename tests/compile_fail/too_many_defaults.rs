//! More defaults than parameters.

#[stackbind::function(defaults(1, 2))]
fn single(a: i32) -> i32 {
    a
}

fn main() {}

//! Generic parameters cannot be monomorphized from a script call.

#[stackbind::function]
fn first<T: Clone>(items: Vec<T>) -> Option<T> {
    items.first().cloned()
}

fn main() {}

//! Native calls complete before returning to the script.

#[stackbind::function]
async fn load() -> i32 {
    1
}

fn main() {}

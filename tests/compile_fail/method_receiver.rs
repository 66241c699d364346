//! Methods have no script-side receiver.

#[allow(dead_code)]
struct Counter(i64);

impl Counter {
    #[stackbind::function]
    fn bump(&mut self) -> i64 {
        self.0 += 1;
        self.0
    }
}

fn main() {}

//! The install target for registered functions and constants.

use crate::value::Value;

/// A global namespace visible to scripts.
///
/// The registration layer validates a whole batch against this trait before
/// calling [`define`](Namespace::define) for any entry.
pub trait Namespace {
    /// Whether `name` is an identifier the engine reserves for itself.
    fn is_reserved(&self, name: &str) -> bool;

    /// Whether `name` is already bound.
    fn contains(&self, name: &str) -> bool;

    /// Bind `name` to `value`, replacing any previous binding.
    fn define(&mut self, name: &str, value: Value);
}

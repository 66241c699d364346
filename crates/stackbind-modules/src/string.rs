//! String module: byte strings and text.
//!
//! Lengths and positions are in bytes, and positions are 1-based the way
//! scripts count.

use stackbind_core::{ArrayView, ConversionError, Embedded, Table, TableRef, Value};
use stackbind_macros::{entry, function};
use stackbind_registry::{RegistrationTable, Registry};
use thiserror::Error;

/// Longest string `rep` will build, in bytes.
pub const MAX_STRING_LEN: usize = 1 << 28;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StringError {
    #[error("resulting string too large")]
    TooLarge,
}

/// Byte length, embedded NULs included.
#[function]
pub fn len(s: &[u8]) -> usize {
    s.len()
}

#[function]
pub fn upper(s: &str) -> String {
    s.to_uppercase()
}

#[function]
pub fn lower(s: &str) -> String {
    s.to_lowercase()
}

#[function]
pub fn trim(s: &str) -> &str {
    s.trim()
}

/// `s` repeated `count` times, joined by `separator`.
#[function(defaults(1, ""))]
pub fn rep(s: &str, count: usize, separator: &str) -> Result<String, StringError> {
    if count == 0 {
        return Ok(String::new());
    }
    let total = s
        .len()
        .checked_mul(count)
        .zip(separator.len().checked_mul(count - 1))
        .and_then(|(body, gaps)| body.checked_add(gaps))
        .filter(|&total| total <= MAX_STRING_LEN)
        .ok_or(StringError::TooLarge)?;

    let mut out = String::with_capacity(total);
    for i in 0..count {
        if i > 0 {
            out.push_str(separator);
        }
        out.push_str(s);
    }
    Ok(out)
}

/// First occurrence of `needle` at or after byte `init`, as a start and end
/// position pair, or nil when absent.
#[function(defaults(1))]
pub fn find(haystack: &str, needle: &str, init: usize) -> Option<Embedded<(usize, usize)>> {
    let start = init.max(1) - 1;
    let rest = haystack.get(start..)?;
    let found = rest.find(needle)? + start;
    Some(Embedded((found + 1, found + needle.len())))
}

/// Split on `separator` into a sequence table.
#[function(defaults(","))]
pub fn split(s: &str, separator: &str) -> TableRef {
    let parts: Vec<Value> = if separator.is_empty() {
        s.chars().map(|c| Value::string(c.to_string())).collect()
    } else {
        s.split(separator).map(Value::string).collect()
    };
    TableRef::from(Table::sequence(parts))
}

/// Join a sequence of strings.
#[function(defaults(""))]
pub fn join(parts: ArrayView<String>, separator: &str) -> Result<String, ConversionError> {
    Ok(parts.to_vec()?.join(separator))
}

/// Replace every `from` with `to` in place; returns the replacement count
/// followed by the updated text.
#[function]
pub fn replace(text: &mut String, from: &str, to: &str) -> usize {
    if from.is_empty() {
        return 0;
    }
    let count = text.matches(from).count();
    *text = text.replace(from, to);
    count
}

pub const TABLE: RegistrationTable = RegistrationTable::new(
    &[
        ("len", entry!(len)),
        ("upper", entry!(upper)),
        ("lower", entry!(lower)),
        ("trim", entry!(trim)),
        ("rep", entry!(rep)),
        ("find", entry!(find)),
        ("split", entry!(split)),
        ("join", entry!(join)),
        ("replace", entry!(replace)),
    ],
    &[],
);

pub fn registry() -> Registry {
    Registry::new()
        .table(&TABLE)
        .function("reverse", |s: String| s.chars().rev().collect::<String>())
        .function_with_defaults(
            "starts_with",
            |s: String, prefix: String| s.starts_with(&prefix),
            ("",),
        )
}

#[cfg(test)]
mod tests {
    use stackbind_core::State;

    use super::*;

    fn state() -> State {
        let mut state = State::new();
        registry().install(&mut state).unwrap();
        state
    }

    fn s(text: &str) -> Value {
        Value::string(text)
    }

    #[test]
    fn len_counts_bytes() {
        let state = state();
        assert_eq!(
            state.call("len", &[Value::string(b"a\0b")]).unwrap(),
            vec![Value::Integer(3)]
        );
    }

    #[test]
    fn borrowed_results() {
        let state = state();
        assert_eq!(state.call("trim", &[s("  hi ")]).unwrap(), vec![s("hi")]);
        assert_eq!(state.call("upper", &[s("abc")]).unwrap(), vec![s("ABC")]);
    }

    #[test]
    fn rep_defaults() {
        let state = state();
        assert_eq!(state.call("rep", &[s("ab")]).unwrap(), vec![s("ab")]);
        assert_eq!(
            state.call("rep", &[s("ab"), Value::Integer(3)]).unwrap(),
            vec![s("ababab")]
        );
        assert_eq!(
            state
                .call("rep", &[s("ab"), Value::Integer(2), s("-")])
                .unwrap(),
            vec![s("ab-ab")]
        );
        assert_eq!(
            state.call("rep", &[s("ab"), Value::Integer(0)]).unwrap(),
            vec![s("")]
        );
    }

    #[test]
    fn rep_rejects_oversized_results() {
        let state = state();
        let err = state
            .call("rep", &[s("x"), Value::Integer(1 << 61)])
            .unwrap_err();
        assert_eq!(err.to_string(), "rep: resulting string too large");

        let just_over = (MAX_STRING_LEN / 2 + 1) as i64;
        assert!(state.call("rep", &[s("ab"), Value::Integer(just_over)]).is_err());
        assert!(
            state
                .call("rep", &[s(""), Value::Integer(i64::MAX), s(",")])
                .is_err()
        );
    }

    #[test]
    fn find_returns_positions_or_nil() {
        let state = state();
        assert_eq!(
            state.call("find", &[s("hello"), s("ll")]).unwrap(),
            vec![Value::Integer(3), Value::Integer(4)]
        );
        assert_eq!(
            state
                .call("find", &[s("abab"), s("ab"), Value::Integer(2)])
                .unwrap(),
            vec![Value::Integer(3), Value::Integer(4)]
        );
        assert_eq!(
            state.call("find", &[s("hello"), s("z")]).unwrap(),
            vec![Value::Nil]
        );
    }

    #[test]
    fn split_and_join() {
        let state = state();
        let parts = state.call("split", &[s("a,b,c")]).unwrap();
        let table = parts[0].as_table().unwrap();
        assert_eq!(table.border(), 3);
        assert_eq!(table.geti(2), s("b"));

        assert_eq!(
            state.call("join", &[parts[0].clone(), s("+")]).unwrap(),
            vec![s("a+b+c")]
        );
        assert_eq!(
            state.call("join", &[parts[0].clone()]).unwrap(),
            vec![s("abc")]
        );

        let mixed = Value::Table(TableRef::from(Table::sequence([
            s("a"),
            Value::Boolean(true),
            s("c"),
        ])));
        let err = state.call("join", &[mixed]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "join: element [2]: string expected, got boolean"
        );
    }

    #[test]
    fn replace_returns_count_then_text() {
        let state = state();
        assert_eq!(
            state
                .call("replace", &[s("a-b-c"), s("-"), s("+")])
                .unwrap(),
            vec![Value::Integer(2), s("a+b+c")]
        );
    }

    #[test]
    fn generic_wrappers() {
        let state = state();
        assert_eq!(state.call("reverse", &[s("abc")]).unwrap(), vec![s("cba")]);
        assert_eq!(
            state.call("starts_with", &[s("abc")]).unwrap(),
            vec![Value::Boolean(true)]
        );
        assert_eq!(
            state.call("starts_with", &[s("abc"), s("b")]).unwrap(),
            vec![Value::Boolean(false)]
        );
    }
}

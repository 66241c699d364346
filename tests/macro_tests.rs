//! Integration tests for the stackbind proc macros.

use stackbind::{
    Embedded, EntryPoint, FromValue, IntoValue, NativeFn, RegistrationTable, Registry, State,
    Table, TableRef, TupleLike, Value, entry, function,
};

fn s(text: &str) -> Value {
    Value::string(text)
}

fn state(table: &RegistrationTable) -> State {
    let mut state = State::new();
    Registry::new().table(table).install(&mut state).unwrap();
    state
}

// =============================================================================
// #[derive(TupleLike)]
// =============================================================================

/// Test `#[derive(TupleLike)]` on a named struct.
#[derive(Debug, Clone, PartialEq, TupleLike)]
struct Rect {
    width: u32,
    height: u32,
    label: String,
}

/// Test `#[derive(TupleLike)]` on a tuple struct.
#[derive(Debug, Clone, Copy, PartialEq, TupleLike)]
struct Span(i64, i64);

#[test]
fn test_derive_tuple_like_arity() {
    assert_eq!(<Rect as TupleLike>::ARITY, 3);
    assert_eq!(<Span as TupleLike>::ARITY, 2);
}

#[test]
fn test_derive_tuple_like_table_mode() {
    let rect = Rect {
        width: 3,
        height: 4,
        label: "box".to_owned(),
    };
    let value = rect.clone().into_value().unwrap();
    let table = value.as_table().unwrap();
    assert_eq!(table.geti(1), Value::Integer(3));
    assert_eq!(table.geti(2), Value::Integer(4));
    assert_eq!(table.geti(3), s("box"));

    assert_eq!(Rect::from_value(&value).unwrap(), rect);
}

#[test]
fn test_derive_tuple_like_reports_element() {
    let value = Value::Table(TableRef::from(Table::sequence([
        Value::Integer(3),
        Value::Integer(-4),
        s("box"),
    ])));
    let err = Rect::from_value(&value).unwrap_err();
    assert_eq!(err.to_string(), "element [2]: value -4 out of range for u32");
}

// =============================================================================
// #[function]
// =============================================================================

#[function]
fn area(rect: &Rect) -> u64 {
    u64::from(rect.width) * u64::from(rect.height)
}

#[function]
fn bounds(span: Span) -> Embedded<Span> {
    Embedded(Span(span.0.min(span.1), span.0.max(span.1)))
}

#[function(defaults("-"))]
fn shout<'a>(word: &'a str, suffix: &str) -> String {
    format!("{}{}", word.to_uppercase(), suffix)
}

/// Doubles `value` in place and reports whether it was positive.
#[function]
fn double(value: &mut i64) -> bool {
    *value *= 2;
    *value > 0
}

/// Adds to `total` when the caller passes one.
#[function]
fn accumulate(amount: i64, total: Option<&mut i64>) -> i64 {
    if let Some(total) = total {
        *total += amount;
    }
    amount
}

#[function(defaults(10))]
fn counter(start: &mut i64) {
    *start += 1;
}

#[function]
fn nothing() {}

const TABLE: RegistrationTable = RegistrationTable::new(
    &[
        ("area", entry!(area)),
        ("bounds", entry!(bounds)),
        ("shout", entry!(shout)),
        ("double", entry!(double)),
        ("accumulate", entry!(accumulate)),
        ("counter", entry!(counter)),
        ("nothing", entry!(nothing)),
    ],
    &[("ANSWER", 42)],
);

#[test]
fn test_entry_is_a_const_entry_point() {
    const AREA: EntryPoint = entry!(area);
    let results = State::call_function(
        &NativeFn::from_entry(AREA),
        &[Rect {
            width: 2,
            height: 5,
            label: String::new(),
        }
        .into_value()
        .unwrap()],
    )
    .unwrap();
    assert_eq!(results, vec![Value::Integer(10)]);
}

#[test]
fn test_embedded_record_result() {
    let state = state(&TABLE);
    let span = Span(9, 2).into_value().unwrap();
    assert_eq!(
        state.call("bounds", &[span]).unwrap(),
        vec![Value::Integer(2), Value::Integer(9)]
    );
}

#[test]
fn test_borrowed_arguments_with_default() {
    let state = state(&TABLE);
    assert_eq!(state.call("shout", &[s("hey")]).unwrap(), vec![s("HEY-")]);
    assert_eq!(
        state.call("shout", &[s("hey"), s("!")]).unwrap(),
        vec![s("HEY!")]
    );
    assert!(state.call("shout", &[Value::Boolean(true)]).is_err());
}

#[test]
fn test_alias_value_follows_result() {
    let state = state(&TABLE);
    assert_eq!(
        state.call("double", &[Value::Integer(21)]).unwrap(),
        vec![Value::Boolean(true), Value::Integer(42)]
    );
    assert!(state.call("double", &[]).is_err());
}

#[test]
fn test_optional_alias_supplied_and_absent() {
    let state = state(&TABLE);
    assert_eq!(
        state.call("accumulate", &[Value::Integer(5), Value::Integer(10)]).unwrap(),
        vec![Value::Integer(5), Value::Integer(15)]
    );
    assert_eq!(
        state.call("accumulate", &[Value::Integer(5)]).unwrap(),
        vec![Value::Integer(5), Value::Nil]
    );
    assert_eq!(
        state.call("accumulate", &[Value::Integer(5), Value::Nil]).unwrap(),
        vec![Value::Integer(5), Value::Nil]
    );
}

#[test]
fn test_alias_with_default() {
    let state = state(&TABLE);
    assert_eq!(state.call("counter", &[]).unwrap(), vec![Value::Integer(11)]);
    assert_eq!(
        state.call("counter", &[Value::Integer(1)]).unwrap(),
        vec![Value::Integer(2)]
    );
}

#[test]
fn test_unit_function_has_no_results() {
    let state = state(&TABLE);
    assert_eq!(state.call("nothing", &[s("ignored")]).unwrap(), Vec::<Value>::new());
    assert_eq!(state.global("ANSWER"), Value::Integer(42));
}

#[test]
fn test_bad_argument_position() {
    let state = state(&TABLE);
    let err = state
        .call("accumulate", &[Value::Integer(1), s("many")])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "accumulate: bad argument #2: number expected, got string"
    );
}

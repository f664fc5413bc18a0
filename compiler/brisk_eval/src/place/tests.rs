use super::*;
use crate::context::{EvalContext, ScopeFlags};
use crate::value::FlatArray;
use pretty_assertions::assert_eq;

fn scope_with(bindings: &[(&str, Value, bool)]) -> ScopeRef {
    let scope = ScopeRef::new(EvalContext::root(ScopeFlags::empty()));
    for (name, value, is_const) in bindings {
        scope
            .borrow_mut()
            .declare(Name::new(name), value.clone(), *is_const);
    }
    scope
}

fn nested() -> Value {
    Value::array([
        Value::Int(1),
        Value::array([Value::Int(2), Value::Int(3)]),
    ])
}

#[test]
fn test_read_nested_element() {
    let scope = scope_with(&[("a", nested(), false)]);
    let place = Place::binding(scope, Name::new("a")).index(1).index(0);
    assert_eq!(place.read().ok(), Some(Value::Int(2)));
}

#[test]
fn test_write_through_shared_aggregate_is_isolated() {
    let shared = nested();
    let scope = scope_with(&[("a", shared.clone(), false), ("b", shared, false)]);

    let place = Place::binding(scope.clone(), Name::new("b")).index(1).index(0);
    assert!(place.put(&scope, Value::Int(9)).is_ok());

    assert_eq!(scope.get("b"), Some(Value::array([
        Value::Int(1),
        Value::array([Value::Int(9), Value::Int(3)]),
    ])));
    assert_eq!(scope.get("a"), Some(nested()));
}

#[test]
fn test_write_const_element_fails() {
    let frozen = Value::Array(FlatArray::from_values([Value::Int(1)], true));
    let scope = scope_with(&[("a", frozen, false)]);
    let place = Place::binding(scope.clone(), Name::new("a")).index(0);

    let err = place.put(&scope, Value::Int(2)).err();
    assert_eq!(err.map(|e| e.exception_name().to_string()).as_deref(), Some("ConstViolation"));
}

#[test]
fn test_write_into_const_binding_fails() {
    let scope = scope_with(&[("a", nested(), true)]);
    let place = Place::binding(scope.clone(), Name::new("a")).index(0);
    assert!(place.put(&scope, Value::Int(2)).is_err());
    assert_eq!(scope.get("a"), Some(nested()));
}

#[test]
fn test_missing_key_read_fails_and_write_inserts() {
    let scope = scope_with(&[("d", Value::dict([]), false)]);
    let place = Place::binding(scope.clone(), Name::new("d")).key(Value::string("k"));

    let read = place.read();
    assert_eq!(read.err().map(|e| e.exception_name().to_string()).as_deref(), Some("RangeError"));

    assert!(place.put(&scope, Value::Int(1)).is_ok());
    assert_eq!(place.read().ok(), Some(Value::Int(1)));
}

#[test]
fn test_index_out_of_range() {
    let scope = scope_with(&[("a", nested(), false)]);
    let place = Place::binding(scope.clone(), Name::new("a")).index(5);
    assert!(place.read().is_err());
    assert!(place.put(&scope, Value::Int(0)).is_err());
}

#[test]
fn test_debug_shows_path() {
    let scope = scope_with(&[("a", nested(), false)]);
    let place = Place::binding(scope, Name::new("a"))
        .index(1)
        .key(Value::string("x"));
    assert_eq!(format!("{place:?}"), "a[1][\"x\"]");
}

#[test]
fn test_keyed_place_travels_as_a_value() {
    let scope = scope_with(&[("d", Value::dict([(Value::string("k"), nested())]), false)]);
    let place = Place::binding(scope, Name::new("d"))
        .key(Value::string("k"))
        .index(1);
    let value = Value::LValue(place.clone());

    assert_eq!(value, Value::LValue(place));
    assert_eq!(
        crate::Interpreter::rvalue(value).ok(),
        Some(Value::array([Value::Int(2), Value::Int(3)]))
    );
}

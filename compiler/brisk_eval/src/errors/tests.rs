use super::*;
use pretty_assertions::assert_eq;

#[test]
fn exception_names_group_range_errors() {
    assert_eq!(index_out_of_bounds(3, 2).exception_name(), "RangeError");
    assert_eq!(key_not_found(&Value::string("k")).exception_name(), "RangeError");
    assert_eq!(invalid_slice("bad").exception_name(), "RangeError");
}

#[test]
fn exception_names_per_kind() {
    let cases = [
        (type_error("x"), "TypeError"),
        (wrong_arg_count("f", 1, 2), "InvalidNumberOfArgs"),
        (undefined_variable("x"), "UnresolvedIdentifier"),
        (cannot_change_const("x"), "ConstViolation"),
        (already_defined("x"), "AlreadyDefined"),
        (cannot_rebind_builtin("len"), "CannotRebindBuiltin"),
        (not_assignable(), "NotAssignable"),
        (division_by_zero(), "DivisionByZero"),
        (integer_overflow("addition"), "IntegerOverflow"),
        (not_callable(&Value::Int(1)), "NotCallable"),
        (recursion_limit_exceeded(10), "StackOverflow"),
        (invalid_control_flow("break"), "InvalidControlFlow"),
        (assertion_failed(), "AssertionFailure"),
    ];
    for (err, name) in cases {
        assert_eq!(err.exception_name(), name, "{err}");
    }
}

#[test]
fn raised_error_uses_exception_name() {
    let exception = FlatValue::new(ExceptionObject::new("MyError", Value::Int(7)));
    let err = raised(exception.share());
    assert_eq!(err.exception_name(), "MyError");
    assert!(FlatValue::ptr_eq(&err.to_exception(), &exception));
}

#[test]
fn builtin_error_converts_to_exception_with_message() {
    let err = division_by_zero();
    let exception = err.to_exception();
    assert_eq!(exception.name.as_str(), "DivisionByZero");
    assert_eq!(exception.data, Value::string("division by zero"));
}

#[test]
fn display_includes_name_message_and_span() {
    let err = wrong_arg_count("split", 2, 1).with_span(Span::new(4, 9));
    assert_eq!(
        err.to_string(),
        "InvalidNumberOfArgs: split expects 2 argument(s), got 1 at 4..9"
    );
}

#[test]
fn with_span_if_missing_keeps_first_real_span() {
    let err = type_error("x")
        .with_span_if_missing(Span::DUMMY)
        .with_span_if_missing(Span::new(1, 2))
        .with_span_if_missing(Span::new(0, 10));
    assert_eq!(err.span, Some(Span::new(1, 2)));
}

#[test]
fn slice_error_becomes_range_error() {
    let err = EvalError::from(SliceError::OutOfRange {
        offset: 2,
        len: 5,
        size: 3,
    });
    assert!(matches!(err.kind, EvalErrorKind::InvalidSlice { .. }));
}

#[test]
fn escaped_signals_become_invalid_control_flow() {
    for (action, signal) in [
        (ControlAction::Break, "break"),
        (ControlAction::Continue, "continue"),
        (ControlAction::Return(Value::None), "return"),
        (ControlAction::Rethrow, "rethrow"),
    ] {
        let err = action.into_error();
        assert_eq!(err.kind, EvalErrorKind::InvalidControlFlow { signal });
    }
}

#[test]
fn control_action_span_only_touches_errors() {
    let action = ControlAction::from(type_error("x")).with_span_if_missing(Span::new(3, 4));
    let ControlAction::Error(err) = action else {
        panic!("expected an error signal");
    };
    assert_eq!(err.span, Some(Span::new(3, 4)));
    assert!(matches!(
        ControlAction::Break.with_span_if_missing(Span::new(3, 4)),
        ControlAction::Break
    ));
}

#[test]
fn backtrace_display_lists_frames() {
    let trace = EvalBacktrace::new(vec![
        BacktraceFrame {
            name: "inner".to_string(),
            span: Span::new(5, 8),
        },
        BacktraceFrame {
            name: "outer".to_string(),
            span: Span::new(0, 3),
        },
    ]);
    assert_eq!(
        trace.to_string(),
        "stack backtrace:\n  0: inner at 5..8\n  1: outer at 0..3\n"
    );
}

//! Conversions, printing and argument checking.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use brisk_ir::build::{array, bin, call, float, ident, int, string, var};
use brisk_ir::{BinaryOp, Span};

use super::harness::{interpreter, ints, run, run_err, run_in};
use crate::Value;

mod printing {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn print_joins_arguments_with_spaces() {
        let mut interp = interpreter();
        let scope = interp.root_scope();
        let (result, output) = run_in(
            &mut interp,
            &scope,
            vec![
                call("print", vec![string("a"), int(1), array(vec![int(1), string("b")])]),
                call("print", vec![]),
            ],
        );
        assert_eq!(result.unwrap(), Value::None);
        assert_eq!(output, "a 1 [1, \"b\"]\n\n");
    }

    #[test]
    fn print_shows_floats_with_a_fraction() {
        let mut interp = interpreter();
        let scope = interp.root_scope();
        let (_, output) = run_in(&mut interp, &scope, vec![call("print", vec![float(2.0)])]);
        assert_eq!(output, "2.0\n");
    }
}

mod conversions {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn int_parses_a_leading_integer() {
        let value = run(vec![array(vec![
            call("int", vec![string("42abc")]),
            call("int", vec![string(" -7")]),
            call("int", vec![float(3.9)]),
            call("int", vec![int(5)]),
        ])]);
        assert_eq!(value, ints(&[42, -7, 3, 5]));
    }

    #[test]
    fn int_parse_failure_is_a_type_error() {
        let err = run_err(vec![call("int", vec![string("abc")])]);
        assert_eq!(err.exception_name(), "TypeError");
    }

    #[test]
    fn str_formats_values() {
        let value = run(vec![array(vec![
            call("str", vec![int(12)]),
            call("str", vec![array(vec![int(1), string("x")])]),
            call("str", vec![float(1.23456), int(2)]),
            call("str", vec![string("same")]),
        ])]);
        assert_eq!(
            value,
            Value::array([
                Value::string("12"),
                Value::string("[1, \"x\"]"),
                Value::string("1.23"),
                Value::string("same"),
            ])
        );
    }

    #[test]
    fn str_precision_is_bounded() {
        let err = run_err(vec![call("str", vec![float(1.0), int(65)])]);
        assert_eq!(err.exception_name(), "TypeError");
    }

    #[test]
    fn float_parses_strings() {
        let value = run(vec![call("float", vec![string("2.5")])]);
        assert_eq!(value, Value::Float(2.5));
    }

    #[test]
    fn len_counts_characters() {
        let value = run(vec![call("len", vec![string("héllo")])]);
        assert_eq!(value, Value::Int(5));
    }

    #[test]
    fn range_builds_int_arrays() {
        let value = run(vec![array(vec![
            call("range", vec![int(3)]),
            call("range", vec![int(1), int(3)]),
        ])]);
        assert_eq!(value, Value::array([ints(&[0, 1, 2]), ints(&[1, 2])]));
    }

    #[test]
    fn range_with_reversed_bounds_is_empty() {
        let value = run(vec![call("range", vec![int(i64::MAX), int(i64::MIN)])]);
        assert_eq!(value, ints(&[]));
    }

    #[test]
    fn oversized_range_is_a_range_error() {
        for args in [vec![int(i64::MAX)], vec![int(i64::MIN), int(i64::MAX)]] {
            let err = run_err(vec![call("range", args)]);
            assert_eq!(err.exception_name(), "RangeError");
        }
    }
}

mod identity {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn copies_share_and_clones_do_not() {
        let value = run(vec![
            var("a", array(vec![int(1)])),
            var("b", ident("a")),
            var("c", call("clone", vec![ident("a")])),
            array(vec![
                bin(call("intptr", vec![ident("a")]), BinaryOp::Eq, call("intptr", vec![ident("b")])),
                bin(call("intptr", vec![ident("a")]), BinaryOp::Eq, call("intptr", vec![ident("c")])),
                bin(ident("a"), BinaryOp::Eq, ident("c")),
            ]),
        ]);
        assert_eq!(value, ints(&[1, 0, 1]));
    }

    #[test]
    fn equal_values_hash_equally() {
        let value = run(vec![bin(
            call("hash", vec![array(vec![int(1), string("x")])]),
            BinaryOp::Eq,
            call("hash", vec![array(vec![int(1), string("x")])]),
        )]);
        assert_eq!(value, Value::Int(1));
    }

    #[test]
    fn defined_does_not_read_its_argument() {
        let value = run(vec![array(vec![
            call("defined", vec![ident("nope")]),
            call("defined", vec![ident("len")]),
        ])]);
        assert_eq!(value, ints(&[0, 1]));
    }

    #[test]
    fn assert_raises_on_false() {
        let err = run_err(vec![call("assert", vec![int(0)])]);
        assert_eq!(err.exception_name(), "AssertionFailure");
        assert!(run(vec![call("assert", vec![int(1)])]) == Value::None);
    }

    #[test]
    fn exception_name_cannot_be_empty() {
        let err = run_err(vec![call("exception", vec![string("")])]);
        assert_eq!(err.exception_name(), "TypeError");
    }
}

mod spans {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn arity_error_points_at_the_call() {
        let err = run_err(vec![call("len", vec![]).with_span(Span::new(0, 5))]);
        assert_eq!(err.exception_name(), "InvalidNumberOfArgs");
        assert_eq!(err.span, Some(Span::new(0, 5)));
    }

    #[test]
    fn type_error_points_at_the_argument() {
        let err = run_err(vec![
            call("len", vec![int(3).with_span(Span::new(4, 5))]).with_span(Span::new(0, 6)),
        ]);
        assert_eq!(err.exception_name(), "TypeError");
        assert_eq!(err.span, Some(Span::new(4, 5)));
    }

    #[test]
    fn operand_error_points_at_the_operand() {
        let err = run_err(vec![bin(
            int(1).with_span(Span::new(0, 1)),
            BinaryOp::Add,
            string("a").with_span(Span::new(4, 7)),
        )
        .with_span(Span::new(0, 7))]);
        assert_eq!(err.exception_name(), "TypeError");
        assert_eq!(err.span, Some(Span::new(4, 7)));
    }

    #[test]
    fn unresolved_identifier_points_at_the_name() {
        let err = run_err(vec![bin(
            int(1),
            BinaryOp::Add,
            ident("missing").with_span(Span::new(4, 11)),
        )]);
        assert_eq!(err.exception_name(), "UnresolvedIdentifier");
        assert_eq!(err.span, Some(Span::new(4, 11)));
    }
}

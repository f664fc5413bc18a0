//! Function values, calls and recursion limits.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use brisk_ir::build::{
    array, assign, assign_op, bin, block, call, call_expr, capturing_lambda, func, ident, if_,
    int, lambda, pure_func, ret, var,
};
use brisk_ir::{AssignOp, BinaryOp, Construct};

use super::harness::{interpreter, ints, run, run_err, run_in};
use crate::{EvalErrorKind, Interpreter, Value};

fn factorial() -> Construct {
    func(
        "fact",
        &["n"],
        block(vec![
            if_(bin(ident("n"), BinaryOp::LtEq, int(1)), ret(int(1)), None),
            ret(bin(
                ident("n"),
                BinaryOp::Mul,
                call("fact", vec![bin(ident("n"), BinaryOp::Sub, int(1))]),
            )),
        ]),
    )
}

mod calls {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn named_function_returns_a_value() {
        let value = run(vec![
            func("add", &["a", "b"], block(vec![ret(bin(ident("a"), BinaryOp::Add, ident("b")))])),
            call("add", vec![int(2), int(3)]),
        ]);
        assert_eq!(value, Value::Int(5));
    }

    #[test]
    fn expression_body_is_the_result() {
        let value = run(vec![
            var("double", lambda(&["x"], bin(ident("x"), BinaryOp::Mul, int(2)))),
            call("double", vec![int(4)]),
        ]);
        assert_eq!(value, Value::Int(8));
    }

    #[test]
    fn block_body_without_return_yields_none() {
        let value = run(vec![
            func("f", &[], block(vec![int(5)])),
            call("f", vec![]),
        ]);
        assert_eq!(value, Value::None);
    }

    #[test]
    fn arguments_are_copies() {
        let value = run(vec![
            func(
                "poke",
                &["a"],
                block(vec![assign(brisk_ir::build::subscript(ident("a"), int(0)), int(9))]),
            ),
            var("a", array(vec![int(1)])),
            call("poke", vec![ident("a")]),
            ident("a"),
        ]);
        assert_eq!(value, ints(&[1]));
    }

    #[test]
    fn recursion() {
        let value = run(vec![factorial(), call("fact", vec![int(10)])]);
        assert_eq!(value, Value::Int(3_628_800));
    }

    #[test]
    fn wrong_argument_count() {
        let err = run_err(vec![
            func("f", &["a"], block(vec![])),
            call("f", vec![]),
        ]);
        assert_eq!(err.exception_name(), "InvalidNumberOfArgs");
    }

    #[test]
    fn calling_a_non_function() {
        let err = run_err(vec![var("x", int(1)), call("x", vec![])]);
        assert_eq!(err.exception_name(), "NotCallable");
    }

    #[test]
    fn redeclaring_a_named_function_is_rejected() {
        let err = run_err(vec![
            func("f", &[], block(vec![])),
            func("f", &[], block(vec![])),
        ]);
        assert_eq!(err.exception_name(), "AlreadyDefined");
    }

    #[test]
    fn immediately_called_lambda() {
        let value = run(vec![call_expr(lambda(&["x"], ident("x")), vec![int(7)])]);
        assert_eq!(value, Value::Int(7));
    }

    #[test]
    fn map_and_filter_call_user_functions() {
        let value = run(vec![
            var("xs", array(vec![int(1), int(2), int(3)])),
            array(vec![
                call(
                    "map",
                    vec![lambda(&["x"], bin(ident("x"), BinaryOp::Mul, int(2))), ident("xs")],
                ),
                call(
                    "filter",
                    vec![lambda(&["x"], bin(ident("x"), BinaryOp::Gt, int(1))), ident("xs")],
                ),
            ]),
        ]);
        assert_eq!(value, Value::array([ints(&[2, 4, 6]), ints(&[2, 3])]));
    }
}

mod closures {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn closure_keeps_its_scope_alive() {
        let value = run(vec![
            func(
                "counter",
                &[],
                block(vec![
                    var("n", int(0)),
                    ret(lambda(
                        &[],
                        block(vec![
                            assign_op(ident("n"), AssignOp::AddAssign, int(1)),
                            ret(ident("n")),
                        ]),
                    )),
                ]),
            ),
            var("c", call("counter", vec![])),
            call("c", vec![]),
            call("c", vec![]),
        ]);
        assert_eq!(value, Value::Int(2));
    }

    #[test]
    fn closure_sees_later_changes_to_captured_scope() {
        let value = run(vec![
            var("x", int(1)),
            var("get", lambda(&[], ident("x"))),
            assign(ident("x"), int(2)),
            call("get", vec![]),
        ]);
        assert_eq!(value, Value::Int(2));
    }

    #[test]
    fn explicit_captures_are_snapshots() {
        let value = run(vec![
            var("a", int(1)),
            var("get", capturing_lambda(&["a"], &[], ident("a"))),
            assign(ident("a"), int(2)),
            call("get", vec![]),
        ]);
        assert_eq!(value, Value::Int(1));
    }

    #[test]
    fn explicit_captures_are_const() {
        let err = run_err(vec![
            var("a", int(1)),
            var(
                "set",
                capturing_lambda(&["a"], &[], block(vec![assign(ident("a"), int(5))])),
            ),
            call("set", vec![]),
        ]);
        assert_eq!(err.exception_name(), "ConstViolation");
    }

    #[test]
    fn explicit_captures_hide_everything_else() {
        let err = run_err(vec![
            var("a", int(1)),
            var("b", int(2)),
            var("get", capturing_lambda(&["a"], &[], ident("b"))),
            call("get", vec![]),
        ]);
        assert_eq!(err.exception_name(), "UnresolvedIdentifier");
    }

    #[test]
    fn capturing_an_unknown_name_fails_at_declaration() {
        let err = run_err(vec![capturing_lambda(&["nope"], &[], int(1))]);
        assert_eq!(err.exception_name(), "UnresolvedIdentifier");
    }
}

mod pure_functions {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pure_function_reads_outer_bindings() {
        let value = run(vec![
            var("g", int(3)),
            pure_func("p", &[], ident("g")),
            call("p", vec![]),
        ]);
        assert_eq!(value, Value::Int(3));
    }

    #[test]
    fn pure_function_cannot_write_outer_bindings() {
        let err = run_err(vec![
            var("g", int(3)),
            pure_func("p", &[], block(vec![assign(ident("g"), int(4))])),
            call("p", vec![]),
        ]);
        assert_eq!(err.exception_name(), "ConstViolation");
    }

    #[test]
    fn pure_function_cannot_print() {
        let err = run_err(vec![
            pure_func("p", &[], block(vec![call("print", vec![int(1)])])),
            call("p", vec![]),
        ]);
        assert_eq!(err.exception_name(), "UnresolvedIdentifier");
    }

    #[test]
    fn pure_function_has_mutable_locals() {
        let value = run(vec![
            pure_func(
                "p",
                &["x"],
                block(vec![
                    var("y", ident("x")),
                    assign_op(ident("y"), AssignOp::MulAssign, int(3)),
                    ret(ident("y")),
                ]),
            ),
            call("p", vec![int(2)]),
        ]);
        assert_eq!(value, Value::Int(6));
    }
}

mod recursion_limit {
    use super::*;
    use pretty_assertions::assert_eq;

    fn runaway() -> Vec<Construct> {
        vec![
            func(
                "down",
                &["n"],
                block(vec![ret(call("down", vec![bin(ident("n"), BinaryOp::Add, int(1))]))]),
            ),
            call("down", vec![int(0)]),
        ]
    }

    #[test]
    fn unbounded_recursion_is_a_stack_overflow() {
        let mut interp = Interpreter::builder().max_call_depth(Some(32)).build();
        let scope = interp.root_scope();
        let (result, _) = run_in(&mut interp, &scope, runaway());
        let err = result.unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::StackOverflow { depth: 32 });
        assert!(err.backtrace.is_some_and(|trace| !trace.is_empty()));
        assert_eq!(interp.call_depth(), 0);
    }

    #[test]
    fn stack_overflow_is_catchable() {
        let mut interp = Interpreter::builder().max_call_depth(Some(16)).build();
        let scope = interp.root_scope();
        let mut program = runaway();
        let overflow = program.pop().unwrap();
        program.push(brisk_ir::build::try_catch(
            block(vec![overflow]),
            vec![brisk_ir::build::catch(&["StackOverflow"], block(vec![int(-1)]))],
            None,
        ));
        let (result, _) = run_in(&mut interp, &scope, program);
        assert_eq!(result.unwrap(), Value::Int(-1));
        assert_eq!(interp.call_depth(), 0);
    }

    #[test]
    fn deep_recursion_within_the_limit() {
        let mut interp = interpreter();
        let scope = interp.root_scope();
        let (result, _) = run_in(
            &mut interp,
            &scope,
            vec![
                func(
                    "sum",
                    &["n"],
                    block(vec![
                        if_(bin(ident("n"), BinaryOp::Eq, int(0)), ret(int(0)), None),
                        ret(bin(
                            ident("n"),
                            BinaryOp::Add,
                            call("sum", vec![bin(ident("n"), BinaryOp::Sub, int(1))]),
                        )),
                    ]),
                ),
                call("sum", vec![int(500)]),
            ],
        );
        assert_eq!(result.unwrap(), Value::Int(125_250));
    }
}

//! Declarations, const rules and assignment targets.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use brisk_ir::build::{
    array, assign, assign_multi, assign_op, block, call, catch_as, const_, func, ident, int,
    string, subscript, throw, try_catch, var, var_multi,
};
use brisk_ir::{AssignOp, Span};

use super::harness::{ints, run, run_err, run_in};
use crate::{buffer_handler, Interpreter, Value};

mod declarations {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn redeclaring_in_the_same_scope_is_rejected() {
        let err = run_err(vec![var("x", int(1)), var("x", int(2))]);
        assert_eq!(err.exception_name(), "AlreadyDefined");
    }

    #[test]
    fn inner_block_shadows_outer_binding() {
        let value = run(vec![
            var("x", int(1)),
            block(vec![var("x", int(2)), assign(ident("x"), int(3))]),
            ident("x"),
        ]);
        assert_eq!(value, Value::Int(1));
    }

    #[test]
    fn inner_block_assigns_outer_binding() {
        let value = run(vec![
            var("x", int(1)),
            block(vec![assign(ident("x"), int(3))]),
            ident("x"),
        ]);
        assert_eq!(value, Value::Int(3));
    }

    #[test]
    fn block_bindings_end_with_the_block() {
        let err = run_err(vec![block(vec![var("inner", int(1))]), ident("inner")]);
        assert_eq!(err.exception_name(), "UnresolvedIdentifier");
    }

    #[test]
    fn user_binding_shadows_a_builtin() {
        let value = run(vec![var("len", int(3)), ident("len")]);
        assert_eq!(value, Value::Int(3));
    }

    #[test]
    fn multiple_targets_destructure_an_array() {
        let value = run(vec![
            var_multi(&["a", "b", "c"], array(vec![int(1), int(2)])),
            array(vec![ident("a"), ident("b"), ident("c")]),
        ]);
        assert_eq!(value, Value::array([Value::Int(1), Value::Int(2), Value::None]));
    }

    #[test]
    fn multiple_targets_share_a_scalar() {
        let value = run(vec![
            var_multi(&["a", "b"], int(5)),
            array(vec![ident("a"), ident("b")]),
        ]);
        assert_eq!(value, ints(&[5, 5]));
    }

    #[test]
    fn swap_through_an_array() {
        let value = run(vec![
            var("a", int(1)),
            var("b", int(2)),
            assign_multi(vec![ident("a"), ident("b")], array(vec![ident("b"), ident("a")])),
            array(vec![ident("a"), ident("b")]),
        ]);
        assert_eq!(value, ints(&[2, 1]));
    }

    #[test]
    fn assignment_evaluates_to_the_stored_value() {
        let value = run(vec![
            var("x", int(1)),
            array(vec![
                assign(ident("x"), int(5)),
                assign_op(ident("x"), AssignOp::AddAssign, int(2)),
                var("y", int(3)),
                var_multi(&["a", "b"], array(vec![int(1), int(2)])),
            ]),
        ]);
        assert_eq!(
            value,
            Value::array([Value::Int(5), Value::Int(7), Value::Int(3), Value::None])
        );
    }

    #[test]
    fn undef_removes_a_binding() {
        let value = run(vec![
            var("x", int(1)),
            var("removed", call("undef", vec![ident("x")])),
            array(vec![ident("removed"), call("defined", vec![ident("x")])]),
        ]);
        assert_eq!(value, ints(&[1, 0]));
    }
}

mod const_rules {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn const_can_be_read() {
        let value = run(vec![const_("c", int(1)), ident("c")]);
        assert_eq!(value, Value::Int(1));
    }

    #[test]
    fn const_cannot_be_assigned() {
        let err = run_err(vec![const_("c", int(1)), assign(ident("c"), int(2))]);
        assert_eq!(err.exception_name(), "ConstViolation");
    }

    #[test]
    fn const_cannot_be_compound_assigned() {
        let err = run_err(vec![
            const_("c", int(1)),
            assign_op(ident("c"), AssignOp::AddAssign, int(2)),
        ]);
        assert_eq!(err.exception_name(), "ConstViolation");
    }

    #[test]
    fn const_root_makes_every_declaration_const() {
        let mut interp = Interpreter::builder().const_root(true).build();
        let scope = interp.root_scope();
        let (result, _) = run_in(
            &mut interp,
            &scope,
            vec![
                var("a", array(vec![int(1)])),
                assign(subscript(ident("a"), int(0)), int(2)),
            ],
        );
        assert_eq!(result.unwrap_err().exception_name(), "ConstViolation");
    }

    #[test]
    fn const_root_hides_impure_builtins() {
        let mut interp = Interpreter::builder()
            .const_root(true)
            .print_handler(buffer_handler())
            .build();
        let scope = interp.root_scope();
        let (result, output) = run_in(&mut interp, &scope, vec![call("print", vec![int(1)])]);
        assert_eq!(result.unwrap_err().exception_name(), "UnresolvedIdentifier");
        assert_eq!(output, "");
    }

    #[test]
    fn caught_exception_is_const_in_a_const_context() {
        let mut interp = Interpreter::builder().const_root(true).build();
        let scope = interp.root_scope();
        let (result, _) = run_in(
            &mut interp,
            &scope,
            vec![try_catch(
                block(vec![throw(call("exception", vec![string("X")]))]),
                vec![catch_as(&[], "e", assign(ident("e"), int(1)))],
                None,
            )],
        );
        assert_eq!(result.unwrap_err().exception_name(), "ConstViolation");
    }

    #[test]
    fn split_pieces_are_const_in_a_const_context() {
        let mut interp = Interpreter::builder().const_root(true).build();
        let scope = interp.root_scope();
        let (result, _) = run_in(
            &mut interp,
            &scope,
            vec![call("split", vec![string("a,b"), string(",")])],
        );
        let Value::Array(pieces) = result.unwrap() else {
            panic!("split should return an array");
        };
        assert_eq!(pieces.len(), 2);
        assert!(pieces.as_slice().iter().all(|cell| cell.is_const()));
    }

    #[test]
    fn parameters_are_const_when_called_from_a_const_context() {
        let mut interp = Interpreter::builder().const_root(true).build();
        let scope = interp.root_scope();
        let (result, _) = run_in(
            &mut interp,
            &scope,
            vec![
                func("f", &["x"], block(vec![assign(ident("x"), int(2))])),
                call("f", vec![int(1)]),
            ],
        );
        assert_eq!(result.unwrap_err().exception_name(), "ConstViolation");
    }
}

mod assignment_targets {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn assigning_an_unknown_name() {
        let err = run_err(vec![assign(ident("y"), int(1))]);
        assert_eq!(err.exception_name(), "UnresolvedIdentifier");
    }

    #[test]
    fn builtins_cannot_be_rebound() {
        let err = run_err(vec![assign(ident("len"), int(1))]);
        assert_eq!(err.exception_name(), "CannotRebindBuiltin");
    }

    #[test]
    fn literals_are_not_assignable() {
        let err = run_err(vec![assign(int(1), int(2))]);
        assert_eq!(err.exception_name(), "NotAssignable");
    }

    #[test]
    fn declaring_a_non_identifier() {
        let mut decl = var("x", int(1));
        if let brisk_ir::ConstructKind::Assign(assignment) = &mut decl.kind {
            assignment.targets = vec![subscript(ident("x"), int(0))];
        }
        let err = run_err(vec![decl]);
        assert_eq!(err.exception_name(), "NotAssignable");
    }

    #[test]
    fn error_carries_the_target_span() {
        let err = run_err(vec![
            const_("c", int(1)),
            assign(ident("c").with_span(Span::new(10, 11)), int(2)),
        ]);
        assert_eq!(err.span, Some(Span::new(10, 11)));
    }
}

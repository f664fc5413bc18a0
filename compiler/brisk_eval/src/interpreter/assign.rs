//! Declarations and assignments.

use brisk_ir::{AssignOp, Assignment, Construct, DeclKind};

use super::Interpreter;
use crate::context::ScopeRef;
use crate::errors::{
    already_defined, cannot_rebind_builtin, not_assignable, undefined_variable, ControlAction,
    EvalError, EvalResult,
};
use crate::lvalue::LValue;
use crate::operators::evaluate_binary;
use crate::value::Value;

/// Spread `value` over `targets` targets.
///
/// A single target takes the value as is. Several targets destructure an
/// array (missing elements become `none`); any other value goes to every
/// target.
fn distribute(targets: usize, value: Value) -> Vec<Value> {
    if targets == 1 {
        return vec![value];
    }
    match &value {
        Value::Array(arr) => (0..targets)
            .map(|i| arr.get(i).map_or(Value::None, LValue::eval))
            .collect(),
        _ => vec![value; targets],
    }
}

impl Interpreter {
    /// `var`/`const` declarations and (compound) assignments.
    ///
    /// With one target this evaluates to the value now stored there (the
    /// combined value for compound operators); with several it is `none`.
    pub(super) fn eval_assign(&mut self, assignment: &Assignment, scope: &ScopeRef) -> EvalResult {
        let value = self.eval_rvalue(&assignment.value, scope)?;
        let single = assignment.targets.len() == 1;
        let values = distribute(assignment.targets.len(), value);

        let mut stored = Value::None;
        for (target, value) in assignment.targets.iter().zip(values) {
            let result = match assignment.decl {
                Some(kind) => Self::declare_target(target, kind, value, scope),
                None => self.assign_target(target, assignment.op, value, scope),
            };
            let value = result.map_err(|err| err.with_span_if_missing(target.span))?;
            if single {
                stored = value;
            }
        }
        Ok(stored)
    }

    /// Bind a new name in the current scope.
    ///
    /// Shadowing an outer binding is fine; a second declaration in the same
    /// scope is not.
    fn declare_target(
        target: &Construct,
        kind: DeclKind,
        value: Value,
        scope: &ScopeRef,
    ) -> Result<Value, EvalError> {
        let Some(name) = target.as_identifier() else {
            return Err(not_assignable());
        };
        let mut ctx = scope.borrow_mut();
        if ctx.is_declared_here(name) {
            return Err(already_defined(name));
        }
        let is_const = kind == DeclKind::Const || ctx.is_const_ctx();
        ctx.declare(name.clone(), value.clone(), is_const);
        Ok(value)
    }

    /// Write `value` (combined with the current value for compound operators)
    /// through the place `target` evaluates to.
    fn assign_target(
        &mut self,
        target: &Construct,
        op: AssignOp,
        value: Value,
        scope: &ScopeRef,
    ) -> Result<Value, EvalError> {
        let place = match self.eval(target, scope).map_err(ControlAction::into_error)? {
            Value::LValue(place) => place,
            Value::UndefinedId(name) => return Err(undefined_variable(&name)),
            Value::Builtin(builtin) => return Err(cannot_rebind_builtin(builtin.name)),
            _ => return Err(not_assignable()),
        };
        let value = match op.binary_op() {
            None => value,
            Some(bin_op) => evaluate_binary(&place.read()?, &value, bin_op)?,
        };
        place.put(scope, value.clone())?;
        Ok(value)
    }
}

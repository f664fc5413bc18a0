//! Blocks, conditionals, loops and exceptions.

use brisk_ir::{CatchClause, Construct, Foreach, TryCatch};

use super::Interpreter;
use crate::context::{AssignError, ScopeRef};
use crate::errors::{
    already_defined, cannot_change_const, cannot_rebind_builtin, invalid_control_flow, raised,
    type_mismatch, undefined_variable, ControlAction, EvalError, EvalResult,
};
use crate::value::Value;

/// One element of a `foreach` container.
enum Item {
    /// Array element or string character.
    Single(Value),
    /// Dictionary entry.
    Entry(Value, Value),
}

/// Values for the loop identifiers of one iteration.
fn loop_values(foreach: &Foreach, position: usize, item: Item) -> Vec<Value> {
    let count = foreach.ids.len();
    let mut values = Vec::with_capacity(count);
    if foreach.indexed {
        values.push(Value::Int(i64::try_from(position).unwrap_or(i64::MAX)));
    }
    let wanted = count.saturating_sub(values.len());
    match item {
        Item::Entry(key, value) => {
            values.push(key);
            values.push(value);
        }
        Item::Single(Value::Array(arr)) if wanted > 1 => values.extend(arr.values().take(wanted)),
        Item::Single(value) => values.push(value),
    }
    values.resize(count, Value::None);
    values
}

#[cold]
fn assign_error(err: AssignError, name: &str) -> EvalError {
    match err {
        AssignError::Const => cannot_change_const(name),
        AssignError::Builtin => cannot_rebind_builtin(name),
        AssignError::Undefined => undefined_variable(name),
    }
}

impl Interpreter {
    /// Statements in a new block scope.
    pub(super) fn eval_block(&mut self, stmts: &[Construct], scope: &ScopeRef) -> EvalResult {
        let inner = scope.block_child();
        self.eval_statements(stmts, &inner)
    }

    pub(super) fn eval_if(
        &mut self,
        cond: &Construct,
        then_branch: &Construct,
        else_branch: Option<&Construct>,
        scope: &ScopeRef,
    ) -> EvalResult {
        if self.eval_rvalue(cond, scope)?.is_truthy() {
            self.eval_statement(then_branch, scope)
        } else if let Some(else_branch) = else_branch {
            self.eval_statement(else_branch, scope)
        } else {
            Ok(Value::None)
        }
    }

    pub(super) fn eval_while(&mut self, cond: &Construct, body: &Construct, scope: &ScopeRef) -> EvalResult {
        while self.eval_rvalue(cond, scope)?.is_truthy() {
            match self.eval_statement(body, scope) {
                Ok(_) | Err(ControlAction::Continue) => {}
                Err(ControlAction::Break) => break,
                Err(other) => return Err(other),
            }
        }
        Ok(Value::None)
    }

    /// Iterate a snapshot of the container: arrays in index order,
    /// dictionaries in key order, strings by character.
    pub(super) fn eval_foreach(&mut self, foreach: &Foreach, scope: &ScopeRef) -> EvalResult {
        let items: Vec<Item> = match self.eval_rvalue(&foreach.container, scope)? {
            Value::Array(arr) => arr.values().map(Item::Single).collect(),
            Value::Dict(dict) => dict
                .iter()
                .map(|(k, v)| Item::Entry(k.clone(), v.eval()))
                .collect(),
            Value::Str(text) => text.chars().map(|c| Item::Single(Value::Str(c))).collect(),
            other => {
                return Err(type_mismatch("foreach", "an array, dict or string", &other)
                    .with_span(foreach.container.span)
                    .into())
            }
        };

        for (position, item) in items.into_iter().enumerate() {
            let loop_scope = scope.block_child();
            let values = loop_values(foreach, position, item);
            Self::bind_loop_ids(foreach, values, &loop_scope)
                .map_err(|err| err.with_span_if_missing(foreach.container.span))?;

            match self.eval_statement(&foreach.body, &loop_scope) {
                Ok(_) | Err(ControlAction::Continue) => {}
                Err(ControlAction::Break) => break,
                Err(other) => return Err(other),
            }
        }
        Ok(Value::None)
    }

    /// Declare the loop identifiers in `loop_scope`, or assign the existing
    /// bindings they resolve to.
    fn bind_loop_ids(
        foreach: &Foreach,
        values: Vec<Value>,
        loop_scope: &ScopeRef,
    ) -> Result<(), EvalError> {
        for (name, value) in foreach.ids.iter().zip(values) {
            if foreach.decl {
                let mut ctx = loop_scope.borrow_mut();
                if ctx.is_declared_here(name) {
                    return Err(already_defined(name));
                }
                let is_const = ctx.is_const_ctx();
                ctx.declare(name.clone(), value, is_const);
            } else {
                loop_scope
                    .assign(name, value)
                    .map_err(|err| assign_error(err, name))?;
            }
        }
        Ok(())
    }

    /// `return [value]`: only valid inside a function.
    pub(super) fn eval_return(&mut self, value: Option<&Construct>, scope: &ScopeRef) -> EvalResult {
        if !scope.within_function() {
            return Err(invalid_control_flow("return").into());
        }
        let value = match value {
            Some(value) => self.eval_rvalue(value, scope)?,
            None => Value::None,
        };
        Err(ControlAction::Return(value))
    }

    /// `throw value`: the value must be an exception.
    pub(super) fn eval_throw(&mut self, value: &Construct, scope: &ScopeRef) -> EvalResult {
        match self.eval_rvalue(value, scope)? {
            Value::Exception(exception) => Err(raised(exception).into()),
            other => Err(type_mismatch("throw", "an exception", &other)
                .with_span(value.span)
                .into()),
        }
    }

    /// `try { } catch ... finally { }`.
    ///
    /// The first clause whose filter matches handles an error. `finally` runs
    /// on every path; if it raises or returns itself, that replaces whatever
    /// was propagating.
    pub(super) fn eval_try_catch(&mut self, try_catch: &TryCatch, scope: &ScopeRef) -> EvalResult {
        let outcome = match self.eval_statement(&try_catch.body, scope) {
            Err(ControlAction::Error(err)) => self.handle_error(*err, &try_catch.catches, scope),
            other => other,
        };
        if let Some(finally) = &try_catch.finally {
            self.eval_statement(finally, scope)?;
        }
        outcome
    }

    fn handle_error(&mut self, err: EvalError, catches: &[CatchClause], scope: &ScopeRef) -> EvalResult {
        let Some(clause) = catches.iter().find(|c| c.matches(err.exception_name())) else {
            return Err(err.into());
        };
        tracing::debug!(exception = err.exception_name(), "caught");

        let catch_scope = scope.block_child();
        if let Some(binding) = &clause.binding {
            let exception = Value::Exception(err.to_exception());
            let is_const = catch_scope.is_const_ctx();
            catch_scope
                .borrow_mut()
                .declare(binding.clone(), exception, is_const);
        }
        match self.eval_statement(&clause.body, &catch_scope) {
            Err(ControlAction::Rethrow) => Err(err.into()),
            other => other,
        }
    }
}

//! Function values and calls.

#![allow(clippy::disallowed_types, reason = "function declarations are shared as Rc<FuncDecl>")]

use std::rc::Rc;

use brisk_ir::{Construct, ConstructKind, ExprList, FuncDecl, Span};

use super::Interpreter;
use crate::context::{EvalContext, ScopeFlags, ScopeRef};
use crate::diagnostics::CallFrame;
use crate::errors::{
    already_defined, not_callable, undefined_variable, wrong_arg_count, ControlAction, EvalResult,
};
use crate::value::{CapturedEnv, FlatValue, FuncObject, Value};

impl Interpreter {
    /// `callee(args...)`.
    ///
    /// Builtins receive the argument constructs; user functions receive the
    /// evaluated arguments.
    pub(super) fn eval_call(
        &mut self,
        callee: &Construct,
        args: &ExprList,
        span: Span,
        scope: &ScopeRef,
    ) -> EvalResult {
        match self.eval_rvalue(callee, scope)? {
            Value::Builtin(builtin) => (builtin.func)(self, scope, args),
            Value::Func(func) => {
                let mut values = Vec::with_capacity(args.len());
                for arg in &args.items {
                    values.push(self.eval_rvalue(arg, scope)?);
                }
                self.call_function(&func, values, span, scope)
            }
            other => Err(not_callable(&other).with_span(callee.span).into()),
        }
    }

    /// Call a user function with evaluated arguments.
    ///
    /// The body runs in a fresh `FUNC` scope holding the parameters, placed
    /// under the environment the function closed over. Pure functions get an
    /// extra `CONST` scope in between, which keeps the body from assigning
    /// anything outside its own scope and from seeing impure builtins.
    #[tracing::instrument(level = "debug", skip_all)]
    pub(crate) fn call_function(
        &mut self,
        func: &FlatValue<FuncObject>,
        args: Vec<Value>,
        call_span: Span,
        caller: &ScopeRef,
    ) -> EvalResult {
        if args.len() != func.arity() {
            return Err(wrong_arg_count(func.display_name(), func.arity(), args.len())
                .with_span(call_span)
                .into());
        }

        // Scopes link to their parents weakly; these locals keep the chain
        // alive for the duration of the call.
        let detached;
        let env = match func.env.innermost() {
            Some(env) => env,
            None => {
                detached = ScopeRef::new(EvalContext::root(ScopeFlags::empty()));
                &detached
            }
        };
        let seal = func.decl.is_pure.then(|| env.child(ScopeFlags::CONST));
        let frame = seal.as_ref().unwrap_or(env).child(ScopeFlags::FUNC);

        let params_const = caller.is_const_ctx();
        {
            let mut ctx = frame.borrow_mut();
            for (param, value) in func.decl.params.iter().zip(args) {
                ctx.declare(param.clone(), value, params_const);
            }
        }

        self.call_stack
            .push(CallFrame {
                name: func.display_name().to_string(),
                call_span,
            })
            .map_err(|err| err.with_span(call_span))?;

        let result = match self.eval_function_body(&func.decl.body, &frame) {
            Ok(value) | Err(ControlAction::Return(value)) => Ok(value),
            Err(ControlAction::Error(err)) => {
                Err(self.call_stack.attach_backtrace(*err).into())
            }
            Err(signal) => Err(signal.into_error().with_span(call_span).into()),
        };
        self.call_stack.pop();
        result
    }

    /// A block body shares the parameter scope and yields `none` unless it
    /// returns. Any other body is an expression whose value is the result.
    fn eval_function_body(&mut self, body: &Construct, frame: &ScopeRef) -> EvalResult {
        match &body.kind {
            ConstructKind::Block(stmts) => self.eval_statements(stmts, frame).map(|_| Value::None),
            _ => self.eval_statement(body, frame),
        }
    }

    /// A function value. A named declaration also binds the name in `scope`.
    ///
    /// Without a capture list the function keeps the whole scope chain alive.
    /// With one it sees const copies of the listed bindings and the builtins.
    pub(super) fn eval_func_decl(decl: &Rc<FuncDecl>, scope: &ScopeRef) -> EvalResult {
        let env = match &decl.captures {
            None => CapturedEnv::capture(scope),
            Some(names) => {
                let captured = ScopeRef::new(EvalContext::root(ScopeFlags::empty()));
                for name in names {
                    let value = scope.get(name).ok_or_else(|| undefined_variable(name))?;
                    captured.borrow_mut().declare(name.clone(), value, true);
                }
                CapturedEnv::detached(captured)
            }
        };
        let value = Value::func(FuncObject::new(decl.clone(), env));

        if let Some(name) = &decl.name {
            let mut ctx = scope.borrow_mut();
            if ctx.is_declared_here(name) {
                return Err(already_defined(name).into());
            }
            let is_const = ctx.is_const_ctx();
            ctx.declare(name.clone(), value.clone(), is_const);
        }
        Ok(value)
    }
}

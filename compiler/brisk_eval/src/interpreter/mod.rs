//! Tree-walking interpreter.
//!
//! # Architecture
//!
//! `Interpreter::eval` dispatches on [`ConstructKind`] and recurses into
//! children, threading the current scope explicitly. Each construct is
//! evaluated under [`ensure_sufficient_stack`] and tags errors that have no
//! location yet with its own span, so the innermost construct wins.
//!
//! Identifiers, member access and subscripts evaluate to addressable
//! `Value::LValue` places (or `Value::UndefinedId` when nothing resolves);
//! every consumer that needs data goes through [`Interpreter::rvalue`].
//!
//! Non-local exits (`break`, `continue`, `return`, `rethrow`, errors) travel
//! as the `Err` side of [`EvalResult`] and are consumed by loops, calls and
//! catch clauses. A signal that reaches [`Interpreter::run`] becomes an
//! `InvalidControlFlow` error.
//!
//! Submodules:
//! - `expr`: literals, names, element access, operators
//! - `assign`: declarations and assignments
//! - `control`: blocks, conditionals, loops, exceptions
//! - `call`: function values and calls

mod assign;
mod builder;
mod call;
mod control;
mod expr;

use brisk_ir::{Construct, ConstructKind};
use brisk_stack::ensure_sufficient_stack;

use crate::context::{EvalContext, ScopeFlags, ScopeRef};
use crate::diagnostics::CallStack;
use crate::errors::{undefined_variable, ControlAction, EvalError, EvalResult};
use crate::print_handler::SharedPrintHandler;
use crate::value::{FlatStr, FlatValue, Value};

pub use builder::InterpreterBuilder;

/// Evaluates syntax trees against scopes.
///
/// An interpreter holds no bindings itself: programs run in a [`ScopeRef`]
/// supplied by the caller (see [`Interpreter::root_scope`]), so several
/// programs can share one global scope.
pub struct Interpreter {
    call_stack: CallStack,
    print_handler: SharedPrintHandler,
    const_root: bool,
}

impl Interpreter {
    /// Interpreter with default configuration.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    /// A fresh outermost scope, const when configured with `const_root`.
    pub fn root_scope(&self) -> ScopeRef {
        let flags = if self.const_root {
            ScopeFlags::CONST
        } else {
            ScopeFlags::empty()
        };
        ScopeRef::new(EvalContext::root(flags))
    }

    #[inline]
    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    /// Number of user-function calls in progress.
    #[inline]
    pub fn call_depth(&self) -> usize {
        self.call_stack.depth()
    }

    /// Run a program in `scope`.
    ///
    /// A top-level block runs directly in `scope`, so its declarations stay
    /// visible to later programs sharing the scope. Returns the value of the
    /// last statement.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(&mut self, program: &Construct, scope: &ScopeRef) -> Result<Value, EvalError> {
        let result = match &program.kind {
            ConstructKind::Block(stmts) => self.eval_statements(stmts, scope),
            _ => self.eval_statement(program, scope),
        };
        result.map_err(|action| action.into_error().with_span_if_missing(program.span))
    }

    /// Evaluate `construct`; the result may be a place or an unresolved name.
    pub fn eval(&mut self, construct: &Construct, scope: &ScopeRef) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(construct, scope))
            .map_err(|action| action.with_span_if_missing(construct.span))
    }

    /// Evaluate `construct` to plain data.
    pub fn eval_rvalue(&mut self, construct: &Construct, scope: &ScopeRef) -> EvalResult {
        let value = self.eval(construct, scope)?;
        Self::rvalue(value).map_err(|err| err.with_span_if_missing(construct.span).into())
    }

    /// Read a place, reject an unresolved name, pass anything else through.
    pub fn rvalue(value: Value) -> Result<Value, EvalError> {
        match value {
            Value::LValue(place) => place.read(),
            Value::UndefinedId(name) => Err(undefined_variable(&name)),
            other => Ok(other),
        }
    }

    /// A statement: its value must exist even when nobody uses it, so a bare
    /// unresolved identifier is an error.
    pub(crate) fn eval_statement(&mut self, stmt: &Construct, scope: &ScopeRef) -> EvalResult {
        self.eval_rvalue(stmt, scope)
    }

    /// Statements in order; the value of the last one, `none` if empty.
    pub(crate) fn eval_statements(&mut self, stmts: &[Construct], scope: &ScopeRef) -> EvalResult {
        let Some((last, leading)) = stmts.split_last() else {
            return Ok(Value::None);
        };
        // Earlier results are dropped at once so they hold no extra share of
        // a payload the next statement writes to.
        for stmt in leading {
            self.eval_statement(stmt, scope)?;
        }
        self.eval_statement(last, scope)
    }

    fn eval_inner(&mut self, construct: &Construct, scope: &ScopeRef) -> EvalResult {
        match &construct.kind {
            // Literals
            ConstructKind::Int(v) => Ok(Value::Int(*v)),
            ConstructKind::Float(v) => Ok(Value::Float(*v)),
            ConstructKind::Str(text) => Ok(Value::Str(FlatStr::from_buffer(FlatValue::from(
                text.clone(),
            )))),
            ConstructKind::None => Ok(Value::None),
            ConstructKind::Array(items) => self.eval_array_literal(items, scope),
            ConstructKind::Dict(pairs) => self.eval_dict_literal(pairs, scope),

            // Names and element access
            ConstructKind::Identifier(name) => Ok(Self::eval_identifier(name, scope)),
            ConstructKind::Member { target, member } => self.eval_member(target, member, scope),
            ConstructKind::Subscript { target, index } => {
                self.eval_subscript(target, index, scope)
            }
            ConstructKind::Slice { target, start, end } => {
                self.eval_slice(target, start.as_deref(), end.as_deref(), scope)
            }

            // Operators and calls
            ConstructKind::Unary { op, operand } => self.eval_unary(*op, operand, scope),
            ConstructKind::BinaryChain { first, rest } => self.eval_binary_chain(first, rest, scope),
            ConstructKind::Call { callee, args } => {
                self.eval_call(callee, args, construct.span, scope)
            }
            ConstructKind::Assign(assignment) => self.eval_assign(assignment, scope),

            // Control flow
            ConstructKind::Block(stmts) => self.eval_block(stmts, scope),
            ConstructKind::If {
                cond,
                then_branch,
                else_branch,
            } => self.eval_if(cond, then_branch, else_branch.as_deref(), scope),
            ConstructKind::While { cond, body } => self.eval_while(cond, body, scope),
            ConstructKind::Foreach(foreach) => self.eval_foreach(foreach, scope),
            ConstructKind::Break => Err(ControlAction::Break),
            ConstructKind::Continue => Err(ControlAction::Continue),
            ConstructKind::Return(value) => self.eval_return(value.as_deref(), scope),
            ConstructKind::Throw(value) => self.eval_throw(value, scope),
            ConstructKind::Rethrow => Err(ControlAction::Rethrow),
            ConstructKind::TryCatch(try_catch) => self.eval_try_catch(try_catch, scope),
            ConstructKind::FuncDecl(decl) => Self::eval_func_decl(decl, scope),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

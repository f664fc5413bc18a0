//! Native functions visible to every script.
//!
//! Two immutable tables anchor name resolution below the outermost scope:
//!
//! - [`const_builtins`]: functions without side effects on the outside world,
//!   visible everywhere (including pure functions and const roots);
//! - [`builtins`]: functions such as `print` and `undef` that are hidden once
//!   resolution has crossed a const context.
//!
//! Both tables are built on first use and never change afterwards. Builtins
//! receive their argument constructs unevaluated together with the calling
//! scope, so each one decides whether an argument is read as a value, as an
//! assignable place, or not evaluated at all.
//!
//! Every builtin checks its arity first, then the kind of each argument it
//! consumes. Arity errors carry the span of the whole argument list; kind
//! errors carry the span of the offending argument.

mod collections;
mod common;
mod strings;

use std::fmt;
use std::ops::RangeInclusive;
use std::sync::OnceLock;

use brisk_ir::{Construct, ExprList, Span};
use rustc_hash::FxHashMap;

use crate::context::ScopeRef;
use crate::errors::{type_error, type_mismatch, wrong_arg_count, ControlAction, EvalError};
use crate::interpreter::Interpreter;
use crate::place::Place;
use crate::value::{Builtin, BuiltinFn, FlatStr, Value};

/// A fixed name → builtin map.
pub struct BuiltinTable {
    entries: FxHashMap<&'static str, Builtin>,
}

impl BuiltinTable {
    fn new(entries: &[(&'static str, BuiltinFn)]) -> Self {
        let mut map = FxHashMap::default();
        map.reserve(entries.len());
        for &(name, func) in entries {
            map.insert(name, Builtin { name, func });
        }
        BuiltinTable { entries: map }
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<Builtin> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for BuiltinTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// Builtins hidden from const contexts.
pub fn builtins() -> &'static BuiltinTable {
    static TABLE: OnceLock<BuiltinTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        BuiltinTable::new(&[
            ("print", common::builtin_print),
            ("undef", common::builtin_undef),
        ])
    })
}

/// Builtins visible everywhere.
pub fn const_builtins() -> &'static BuiltinTable {
    static TABLE: OnceLock<BuiltinTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        BuiltinTable::new(&[
            ("defined", common::builtin_defined),
            ("len", common::builtin_len),
            ("str", common::builtin_str),
            ("int", common::builtin_int),
            ("float", common::builtin_float),
            ("clone", common::builtin_clone),
            ("intptr", common::builtin_intptr),
            ("hash", common::builtin_hash),
            ("assert", common::builtin_assert),
            ("exception", common::builtin_exception),
            ("range", common::builtin_range),
            ("find", collections::builtin_find),
            ("insert", collections::builtin_insert),
            ("erase", collections::builtin_erase),
            ("append", collections::builtin_append),
            ("pop", collections::builtin_pop),
            ("keys", collections::builtin_keys),
            ("values", collections::builtin_values),
            ("kvpairs", collections::builtin_kvpairs),
            ("map", collections::builtin_map),
            ("filter", collections::builtin_filter),
            ("split", strings::builtin_split),
            ("join", strings::builtin_join),
        ])
    })
}

/// Arity-checked view of a builtin's argument list.
struct CallArgs<'a> {
    name: &'static str,
    list: &'a ExprList,
}

impl<'a> CallArgs<'a> {
    fn new(name: &'static str, list: &'a ExprList, arity: RangeInclusive<usize>) -> Result<Self, EvalError> {
        if !arity.contains(&list.len()) {
            let expected = if arity.start() == arity.end() {
                arity.start().to_string()
            } else {
                format!("{} to {}", arity.start(), arity.end())
            };
            return Err(wrong_arg_count(name, expected, list.len()).with_span(list.span));
        }
        Ok(CallArgs { name, list })
    }

    #[inline]
    fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    fn construct(&self, i: usize) -> &'a Construct {
        &self.list.items[i]
    }

    #[inline]
    fn span(&self, i: usize) -> Span {
        self.construct(i).span
    }

    /// Argument `i` as a plain value.
    fn value(&self, interp: &mut Interpreter, scope: &ScopeRef, i: usize) -> Result<Value, ControlAction> {
        interp.eval_rvalue(self.construct(i), scope)
    }

    /// Argument `i` as an assignable location.
    fn place(&self, interp: &mut Interpreter, scope: &ScopeRef, i: usize) -> Result<Place, ControlAction> {
        match interp.eval(self.construct(i), scope)? {
            Value::LValue(place) => Ok(place),
            Value::UndefinedId(name) => {
                Err(crate::errors::undefined_variable(&name).with_span(self.span(i)).into())
            }
            _ => Err(type_error(format!("{} expects an assignable argument", self.name))
                .with_span(self.span(i))
                .into()),
        }
    }

    fn int(&self, interp: &mut Interpreter, scope: &ScopeRef, i: usize) -> Result<i64, ControlAction> {
        match self.value(interp, scope, i)? {
            Value::Int(v) => Ok(v),
            other => Err(self.mismatch(i, "an int", &other)),
        }
    }

    fn string(&self, interp: &mut Interpreter, scope: &ScopeRef, i: usize) -> Result<FlatStr, ControlAction> {
        match self.value(interp, scope, i)? {
            Value::Str(s) => Ok(s),
            other => Err(self.mismatch(i, "a string", &other)),
        }
    }

    /// Kind error for argument `i`.
    #[cold]
    fn mismatch(&self, i: usize, expected: &str, got: &Value) -> ControlAction {
        type_mismatch(self.name, expected, got)
            .with_span(self.span(i))
            .into()
    }

    /// Any other error about argument `i`.
    #[cold]
    fn fail(&self, i: usize, err: EvalError) -> ControlAction {
        err.with_span(self.span(i)).into()
    }
}

/// Position as a script integer.
fn int_of(n: usize) -> Value {
    Value::Int(i64::try_from(n).unwrap_or(i64::MAX))
}

/// Resolve a possibly negative index against `len`; `len` itself is allowed
/// when `allow_end` is set.
fn resolve_index(index: i64, len: usize, allow_end: bool) -> Option<usize> {
    let signed_len = i64::try_from(len).ok()?;
    let resolved = if index < 0 { index + signed_len } else { index };
    let limit = if allow_end { signed_len + 1 } else { signed_len };
    if (0..limit).contains(&resolved) {
        usize::try_from(resolved).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests;

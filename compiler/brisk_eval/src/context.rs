//! Evaluation contexts: lexical scopes and name resolution.
//!
//! Each scope is an [`EvalContext`] behind a [`LocalScope`] handle. Scopes
//! point to their parent through a weak link, so a scope never keeps its
//! ancestors alive on its own: the evaluator holds the active chain on the
//! Rust stack, and function values hold the chain they close over (see
//! [`crate::value::CapturedEnv`]).
//!
//! # Resolution
//!
//! `lookup` walks the scope, then its ancestors, then the `const_builtins`
//! table, then the `builtins` table. The latter is skipped once the walk has
//! passed a const context, which is how pure code loses access to impure
//! builtins such as `print`.
//!
//! # Const contexts
//!
//! A scope flagged [`ScopeFlags::CONST`] makes everything declared in it
//! const, and assignments from inside it may not reach bindings owned by
//! scopes outside it.

// Rc is the intentional implementation detail of LocalScope<T>
#![allow(
    clippy::disallowed_types,
    reason = "Rc is the implementation of LocalScope<T>"
)]

use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use bitflags::bitflags;
use brisk_ir::Name;
use rustc_hash::FxHashMap;

use crate::builtins;
use crate::lvalue::LValue;
use crate::value::{Builtin, Value};

bitflags! {
    /// Properties of a scope.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ScopeFlags: u8 {
        /// Declarations are const; outer bindings may not be reassigned.
        const CONST = 1 << 0;
        /// Function-call scope: the target of `return`.
        const FUNC = 1 << 1;
    }
}

/// A single-threaded scope handle for reference-counted interior mutability.
///
/// Wraps `Rc<RefCell<T>>` so every scope allocation goes through
/// [`LocalScope::new`], and makes the single-threaded nature explicit.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Non-owning link to this scope.
    #[inline]
    pub fn downgrade(&self) -> WeakScope<T> {
        WeakScope(Rc::downgrade(&self.0))
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Identity of the scope, used to order and hash places.
    #[inline]
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0).cast::<()>() as usize
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalScope").field(&self.0).finish()
    }
}

/// Weak counterpart of [`LocalScope`].
pub struct WeakScope<T>(Weak<RefCell<T>>);

impl<T> WeakScope<T> {
    #[inline]
    pub fn upgrade(&self) -> Option<LocalScope<T>> {
        self.0.upgrade().map(LocalScope)
    }
}

impl<T> Clone for WeakScope<T> {
    fn clone(&self) -> Self {
        WeakScope(Weak::clone(&self.0))
    }
}

/// Handle to a scope.
pub type ScopeRef = LocalScope<EvalContext>;

/// Outcome of resolving a name.
#[derive(Debug)]
pub enum Resolution {
    /// Bound in the given scope.
    Binding(ScopeRef),
    Builtin(Builtin),
    Unresolved,
}

/// Why a by-name assignment was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignError {
    /// The binding is const, or lies beyond a const context.
    Const,
    /// The name resolves to a builtin.
    Builtin,
    /// Nothing is bound under the name.
    Undefined,
}

/// One scope frame.
pub struct EvalContext {
    symbols: FxHashMap<Name, LValue>,
    parent: Option<WeakScope<EvalContext>>,
    flags: ScopeFlags,
}

impl EvalContext {
    /// A scope with no parent.
    pub fn root(flags: ScopeFlags) -> Self {
        EvalContext {
            symbols: FxHashMap::default(),
            parent: None,
            flags,
        }
    }

    #[inline]
    pub fn flags(&self) -> ScopeFlags {
        self.flags
    }

    #[inline]
    pub fn is_const_ctx(&self) -> bool {
        self.flags.contains(ScopeFlags::CONST)
    }

    #[inline]
    pub fn is_func_ctx(&self) -> bool {
        self.flags.contains(ScopeFlags::FUNC)
    }

    /// Parent scope, if it is still alive.
    pub fn parent(&self) -> Option<ScopeRef> {
        self.parent.as_ref().and_then(WeakScope::upgrade)
    }

    /// Bind `name` in this scope, replacing any binding of the same name here.
    pub fn declare(&mut self, name: Name, value: Value, is_const: bool) {
        self.symbols.insert(name, LValue::new(value, is_const));
    }

    #[inline]
    pub fn is_declared_here(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    #[inline]
    pub fn binding(&self, name: &str) -> Option<&LValue> {
        self.symbols.get(name)
    }

    #[inline]
    pub(crate) fn binding_mut(&mut self, name: &str) -> Option<&mut LValue> {
        self.symbols.get_mut(name)
    }

    /// Drop a binding of this scope. Returns whether one existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.symbols.remove(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl fmt::Debug for EvalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.symbols.keys().map(Name::as_str).collect();
        names.sort_unstable();
        f.debug_struct("EvalContext")
            .field("symbols", &names)
            .field("flags", &self.flags)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

impl LocalScope<EvalContext> {
    /// New scope under `self`.
    pub fn child(&self, flags: ScopeFlags) -> ScopeRef {
        LocalScope::new(EvalContext {
            symbols: FxHashMap::default(),
            parent: Some(self.downgrade()),
            flags,
        })
    }

    /// New block scope under `self`; constness is inherited.
    pub fn block_child(&self) -> ScopeRef {
        let flags = self.borrow().flags & ScopeFlags::CONST;
        self.child(flags)
    }

    /// This scope followed by its live ancestors.
    pub fn chain(&self) -> impl Iterator<Item = ScopeRef> {
        std::iter::successors(Some(self.clone()), |scope| scope.borrow().parent())
    }

    #[inline]
    pub fn is_const_ctx(&self) -> bool {
        self.borrow().is_const_ctx()
    }

    /// Whether a `return` here has a function call to return from.
    pub fn within_function(&self) -> bool {
        self.chain().any(|scope| scope.borrow().is_func_ctx())
    }

    /// Resolve `name` through the scope chain and the builtin tables.
    pub fn lookup(&self, name: &str) -> Resolution {
        let mut crossed_const = false;
        for scope in self.chain() {
            let (found, is_const) = {
                let ctx = scope.borrow();
                (ctx.is_declared_here(name), ctx.is_const_ctx())
            };
            if found {
                return Resolution::Binding(scope);
            }
            crossed_const |= is_const;
        }
        if let Some(builtin) = builtins::const_builtins().get(name) {
            return Resolution::Builtin(builtin);
        }
        if !crossed_const {
            if let Some(builtin) = builtins::builtins().get(name) {
                return Resolution::Builtin(builtin);
            }
        }
        Resolution::Unresolved
    }

    /// Whether writing a binding owned by `owner` from here passes a const context.
    ///
    /// The owner itself does not count: its own bindings carry the flag.
    pub fn crosses_const_scope(&self, owner: &ScopeRef) -> bool {
        for scope in self.chain() {
            if scope.ptr_eq(owner) {
                return false;
            }
            if scope.is_const_ctx() {
                return true;
            }
        }
        false
    }

    /// Reassign an existing binding by name.
    pub fn assign(&self, name: &str, value: Value) -> Result<(), AssignError> {
        match self.lookup(name) {
            Resolution::Binding(owner) => {
                if self.crosses_const_scope(&owner) {
                    return Err(AssignError::Const);
                }
                let mut ctx = owner.borrow_mut();
                let cell = ctx.binding_mut(name).ok_or(AssignError::Undefined)?;
                if cell.is_const() {
                    return Err(AssignError::Const);
                }
                cell.put(value);
                Ok(())
            }
            Resolution::Builtin(_) => Err(AssignError::Builtin),
            Resolution::Unresolved => Err(AssignError::Undefined),
        }
    }

    /// Current value bound to `name`, if it resolves to a binding or builtin.
    pub fn get(&self, name: &str) -> Option<Value> {
        match self.lookup(name) {
            Resolution::Binding(owner) => owner.borrow().binding(name).map(LValue::eval),
            Resolution::Builtin(builtin) => Some(Value::Builtin(builtin)),
            Resolution::Unresolved => None,
        }
    }
}

#[cfg(test)]
mod tests;

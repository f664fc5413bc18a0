//! Function and builtin values.

#![allow(clippy::disallowed_types, reason = "Rc<FuncDecl> is shared with the syntax tree")]

use std::fmt;
use std::rc::Rc;

use brisk_ir::{ExprList, FuncDecl};

use crate::context::ScopeRef;
use crate::errors::EvalResult;
use crate::interpreter::Interpreter;

/// A user function: its declaration plus the environment it closes over.
pub struct FuncObject {
    pub decl: Rc<FuncDecl>,
    pub env: CapturedEnv,
}

impl FuncObject {
    pub fn new(decl: Rc<FuncDecl>, env: CapturedEnv) -> Self {
        FuncObject { decl, env }
    }

    /// Name for diagnostics.
    pub fn display_name(&self) -> &str {
        self.decl.name.as_ref().map_or("<anonymous>", |n| n.as_str())
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.decl.params.len()
    }
}

impl fmt::Debug for FuncObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuncObject")
            .field("name", &self.display_name())
            .field("params", &self.decl.params)
            .finish_non_exhaustive()
    }
}

/// Scope chain a function value keeps alive.
///
/// Scope parents are weak links, so a closure holds strong handles to every
/// frame of the chain it was created in (innermost first). Calls attach their
/// argument scope below `innermost`.
#[derive(Clone)]
pub struct CapturedEnv {
    frames: Vec<ScopeRef>,
}

impl CapturedEnv {
    /// Capture `scope` and all of its ancestors.
    pub fn capture(scope: &ScopeRef) -> Self {
        CapturedEnv {
            frames: scope.chain().collect(),
        }
    }

    /// A single detached frame (explicit capture lists).
    pub fn detached(scope: ScopeRef) -> Self {
        CapturedEnv {
            frames: vec![scope],
        }
    }

    pub fn innermost(&self) -> Option<&ScopeRef> {
        self.frames.first()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

/// Signature shared by all builtins.
///
/// Builtins get the argument constructs unevaluated so they can ask for an
/// addressable form (`insert`, `undef`) or skip evaluation (`defined`).
pub type BuiltinFn = fn(&mut Interpreter, &ScopeRef, &ExprList) -> EvalResult;

/// A native function registered in one of the builtin tables.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

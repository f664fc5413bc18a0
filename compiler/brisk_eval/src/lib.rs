//! Brisk Eval - values, scopes and the tree-walking interpreter for Brisk.
//!
//! # Architecture
//!
//! - [`Value`]: runtime values. Strings, arrays and dictionaries share their
//!   payloads and copy them on write; slices are zero-copy views.
//! - [`LValue`]: a storage cell with a const flag. Cells never hold the
//!   transient `LValue`/`UndefinedId` evaluation results.
//! - [`EvalContext`]: one lexical scope; [`ScopeRef`] handles link scopes
//!   into chains, with the builtin tables below the outermost scope.
//! - [`Interpreter`]: evaluates [`brisk_ir::Construct`] trees. Errors and
//!   non-local exits travel as [`ControlAction`].
//!
//! ```text
//! let mut interp = Interpreter::new();
//! let scope = interp.root_scope();
//! let value = interp.run(&program, &scope)?;
//! ```

mod builtins;
pub mod context;
mod diagnostics;
pub mod errors;
mod interpreter;
mod lvalue;
pub mod operators;
mod place;
mod print_handler;
pub mod value;

pub use builtins::{builtins, const_builtins, BuiltinTable};
pub use context::{EvalContext, Resolution, ScopeFlags, ScopeRef};
pub use diagnostics::{CallFrame, CallStack};
pub use errors::{
    BacktraceFrame, ControlAction, EvalBacktrace, EvalError, EvalErrorKind, EvalResult,
};
pub use interpreter::{Interpreter, InterpreterBuilder};
pub use lvalue::LValue;
pub use place::{Accessor, Place};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, BufferPrintHandler, PrintHandlerImpl,
    SharedPrintHandler,
};
pub use value::{
    Builtin, ExceptionObject, FlatArray, FlatDict, FlatStr, FlatValue, FuncObject, Value,
};

#[cfg(test)]
mod tests;

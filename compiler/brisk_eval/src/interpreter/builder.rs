//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use super::Interpreter;
use crate::diagnostics::CallStack;
use crate::print_handler::{stdout_handler, SharedPrintHandler};

/// Call depth allowed when the builder is not told otherwise.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;

/// Builder for [`Interpreter`].
///
/// ```text
/// let output = buffer_handler();
/// let mut interp = Interpreter::builder()
///     .max_call_depth(Some(64))
///     .print_handler(output.clone())
///     .build();
/// ```
pub struct InterpreterBuilder {
    max_call_depth: Option<usize>,
    print_handler: Option<SharedPrintHandler>,
    const_root: bool,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        Self {
            max_call_depth: Some(DEFAULT_MAX_CALL_DEPTH),
            print_handler: None,
            const_root: false,
        }
    }

    /// Limit on nested user-function calls; `None` removes the limit.
    ///
    /// Exceeding the limit raises `StackOverflow`.
    #[must_use]
    pub fn max_call_depth(mut self, depth: Option<usize>) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Destination of `print`. Default is stdout.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Make scopes from [`Interpreter::root_scope`] const contexts.
    ///
    /// Programs run in such a scope declare only const bindings and cannot
    /// see the impure builtins.
    #[must_use]
    pub fn const_root(mut self, const_root: bool) -> Self {
        self.const_root = const_root;
        self
    }

    pub fn build(self) -> Interpreter {
        Interpreter {
            call_stack: CallStack::new(self.max_call_depth),
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            const_root: self.const_root,
        }
    }
}

impl Default for InterpreterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

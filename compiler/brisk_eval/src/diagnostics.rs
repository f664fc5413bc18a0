//! Call tracking for the evaluator.
//!
//! `CallStack` records one `CallFrame` per active user-function call. It
//! enforces the configured recursion limit on `push` and snapshots itself
//! into an [`EvalBacktrace`] when an error leaves a function body.

use brisk_ir::Span;

use crate::errors::{recursion_limit_exceeded, BacktraceFrame, EvalBacktrace, EvalError};

/// One active call.
#[derive(Clone, Debug)]
pub struct CallFrame {
    /// Function name, `<anonymous>` for unnamed functions.
    pub name: String,
    /// Where the call was made (not where the function was declared).
    pub call_span: Span,
}

/// Live call stack with an optional depth limit.
///
/// ```text
/// self.call_stack.push(CallFrame { name, call_span })?;
/// let result = self.eval_body(...);
/// self.call_stack.pop();
/// ```
#[derive(Clone, Debug)]
pub struct CallStack {
    frames: Vec<CallFrame>,
    max_depth: Option<usize>,
}

impl CallStack {
    /// `None` means unlimited.
    pub fn new(max_depth: Option<usize>) -> Self {
        Self {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a frame, failing with `StackOverflow` once the limit is reached.
    ///
    /// The frame is not pushed on overflow.
    pub fn push(&mut self, frame: CallFrame) -> Result<(), EvalError> {
        if let Some(max) = self.max_depth {
            if self.frames.len() >= max {
                tracing::debug!(depth = self.frames.len(), function = %frame.name, "call depth limit reached");
                return Err(recursion_limit_exceeded(max));
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop(&mut self) {
        debug_assert!(
            !self.frames.is_empty(),
            "CallStack::pop() called on empty stack"
        );
        self.frames.pop();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Snapshot of the active calls, most recent first.
    pub fn capture(&self) -> EvalBacktrace {
        EvalBacktrace::new(
            self.frames
                .iter()
                .rev()
                .map(|f| BacktraceFrame {
                    name: f.name.clone(),
                    span: f.call_span,
                })
                .collect(),
        )
    }

    /// Attach a backtrace unless the error already carries one.
    pub fn attach_backtrace(&self, err: EvalError) -> EvalError {
        if self.frames.is_empty() || err.backtrace.is_some() {
            return err;
        }
        err.with_backtrace(self.capture())
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new(None)
    }
}

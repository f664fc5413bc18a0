//! Error and control-flow signal types for evaluation.
//!
//! Every evaluation step returns an [`EvalResult`]. The error side is a
//! [`ControlAction`]: either a real [`EvalError`] or one of the non-local
//! signals (`break`, `continue`, `return`, `rethrow`) that travel up the Rust
//! call stack until the construct that consumes them (loop, function call,
//! catch clause).
//!
//! # Structured Error Categories
//!
//! `EvalErrorKind` carries typed data for each failure. Every kind maps to
//! the exception name scripts use to catch it (`catch (TypeError as e)`);
//! see [`EvalErrorKind::exception_name`]. Factory functions (e.g.
//! [`division_by_zero`]) are the public way to build errors.

use std::fmt;

use brisk_ir::Span;

use crate::value::{ExceptionObject, FlatValue, SliceError, Value};

/// Result of evaluating a construct.
pub type EvalResult = Result<Value, ControlAction>;

/// Non-local exits threaded through the evaluator.
#[derive(Clone, Debug)]
pub enum ControlAction {
    /// `break` inside a loop body.
    Break,
    /// `continue` inside a loop body.
    Continue,
    /// `return`, carrying the already evaluated value.
    Return(Value),
    /// `rethrow` inside a catch body; the clause substitutes the caught error.
    Rethrow,
    /// A raised error, propagating until a matching catch clause.
    Error(Box<EvalError>),
}

impl ControlAction {
    /// Convert a signal that escaped every construct able to consume it.
    pub fn into_error(self) -> EvalError {
        match self {
            ControlAction::Break => invalid_control_flow("break"),
            ControlAction::Continue => invalid_control_flow("continue"),
            ControlAction::Return(_) => invalid_control_flow("return"),
            ControlAction::Rethrow => invalid_control_flow("rethrow"),
            ControlAction::Error(err) => *err,
        }
    }

    /// Fill in the span of an error signal that has none yet.
    #[must_use]
    pub fn with_span_if_missing(self, span: Span) -> Self {
        match self {
            ControlAction::Error(err) => {
                ControlAction::Error(Box::new(err.with_span_if_missing(span)))
            }
            other => other,
        }
    }
}

impl From<EvalError> for ControlAction {
    #[inline]
    fn from(err: EvalError) -> Self {
        ControlAction::Error(Box::new(err))
    }
}

/// Typed error category.
#[derive(Clone, Debug, PartialEq)]
pub enum EvalErrorKind {
    // Types
    TypeError {
        message: String,
    },
    InvalidNumberOfArgs {
        name: String,
        expected: String,
        got: usize,
    },

    // Ranges
    IndexOutOfBounds {
        index: i64,
        len: usize,
    },
    KeyNotFound {
        key: String,
    },
    InvalidSlice {
        reason: String,
    },
    RangeTooLarge {
        start: i64,
        end: i64,
    },

    // Bindings
    UndefinedVariable {
        name: String,
    },
    CannotChangeConst {
        name: String,
    },
    AlreadyDefined {
        name: String,
    },
    CannotRebindBuiltin {
        name: String,
    },
    NotAssignable,

    // Arithmetic
    DivisionByZero,
    IntegerOverflow {
        operation: String,
    },

    // Calls
    NotCallable {
        type_name: String,
    },
    StackOverflow {
        depth: usize,
    },
    InvalidControlFlow {
        signal: &'static str,
    },

    AssertionFailed,

    /// A script-level `throw` of an exception value.
    Raised {
        exception: FlatValue<ExceptionObject>,
    },
}

impl EvalErrorKind {
    /// Name matched by catch clause filters.
    pub fn exception_name(&self) -> &str {
        match self {
            Self::TypeError { .. } => "TypeError",
            Self::InvalidNumberOfArgs { .. } => "InvalidNumberOfArgs",
            Self::IndexOutOfBounds { .. }
            | Self::KeyNotFound { .. }
            | Self::InvalidSlice { .. }
            | Self::RangeTooLarge { .. } => "RangeError",
            Self::UndefinedVariable { .. } => "UnresolvedIdentifier",
            Self::CannotChangeConst { .. } => "ConstViolation",
            Self::AlreadyDefined { .. } => "AlreadyDefined",
            Self::CannotRebindBuiltin { .. } => "CannotRebindBuiltin",
            Self::NotAssignable => "NotAssignable",
            Self::DivisionByZero => "DivisionByZero",
            Self::IntegerOverflow { .. } => "IntegerOverflow",
            Self::NotCallable { .. } => "NotCallable",
            Self::StackOverflow { .. } => "StackOverflow",
            Self::InvalidControlFlow { .. } => "InvalidControlFlow",
            Self::AssertionFailed => "AssertionFailure",
            Self::Raised { exception } => exception.name.as_str(),
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeError { message } => write!(f, "type error: {message}"),
            Self::InvalidNumberOfArgs {
                name,
                expected,
                got,
            } => write!(f, "{name} expects {expected} argument(s), got {got}"),

            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
            Self::KeyNotFound { key } => write!(f, "key not found: {key}"),
            Self::InvalidSlice { reason } => write!(f, "invalid slice: {reason}"),
            Self::RangeTooLarge { start, end } => {
                write!(f, "range({start}, {end}) has too many elements")
            }

            Self::UndefinedVariable { name } => write!(f, "undefined variable: {name}"),
            Self::CannotChangeConst { name } => write!(f, "cannot change const binding `{name}`"),
            Self::AlreadyDefined { name } => write!(f, "`{name}` is already defined in this scope"),
            Self::CannotRebindBuiltin { name } => write!(f, "cannot rebind builtin `{name}`"),
            Self::NotAssignable => write!(f, "expression is not assignable"),

            Self::DivisionByZero => write!(f, "division by zero"),
            Self::IntegerOverflow { operation } => write!(f, "integer overflow in {operation}"),

            Self::NotCallable { type_name } => write!(f, "value of type {type_name} is not callable"),
            Self::StackOverflow { depth } => {
                write!(f, "maximum recursion depth exceeded (depth {depth})")
            }
            Self::InvalidControlFlow { signal } => {
                write!(f, "`{signal}` is not valid in this position")
            }

            Self::AssertionFailed => write!(f, "assertion failed"),
            Self::Raised { exception } => {
                write!(f, "unhandled exception {}", exception.name)?;
                if !matches!(exception.data, Value::None) {
                    write!(f, ": {}", exception.data)?;
                }
                Ok(())
            }
        }
    }
}

/// A single frame in an evaluation backtrace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktraceFrame {
    /// Function name, `<anonymous>` for unnamed functions.
    pub name: String,
    /// Call site.
    pub span: Span,
}

/// Snapshot of the call stack taken when an error left a function.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalBacktrace {
    frames: Vec<BacktraceFrame>,
}

impl EvalBacktrace {
    pub fn new(frames: Vec<BacktraceFrame>) -> Self {
        Self { frames }
    }

    /// Most recent call first.
    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            return Ok(());
        }
        writeln!(f, "stack backtrace:")?;
        for (i, frame) in self.frames.iter().enumerate() {
            writeln!(f, "  {i}: {} at {}", frame.name, frame.span)?;
        }
        Ok(())
    }
}

/// Evaluation error.
#[derive(Clone, Debug)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Human-readable message, `kind.to_string()` for factory-built errors.
    pub message: String,
    /// Innermost construct the error was raised from.
    pub span: Option<Span>,
    /// Calls active when the error escaped its first function.
    pub backtrace: Option<EvalBacktrace>,
}

impl EvalError {
    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            span: None,
            backtrace: None,
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Attach `span` unless a real location is already known.
    #[must_use]
    pub fn with_span_if_missing(mut self, span: Span) -> Self {
        if !self.span.is_some_and(|s| !s.is_dummy()) {
            self.span = Some(span);
        }
        self
    }

    #[must_use]
    pub fn with_backtrace(mut self, backtrace: EvalBacktrace) -> Self {
        self.backtrace = Some(backtrace);
        self
    }

    /// Name matched by catch clause filters.
    pub fn exception_name(&self) -> &str {
        self.kind.exception_name()
    }

    /// The exception object a catch clause binds for this error.
    ///
    /// Script exceptions are returned as thrown; built-in errors become an
    /// exception named after their kind, with the message as data.
    pub fn to_exception(&self) -> FlatValue<ExceptionObject> {
        match &self.kind {
            EvalErrorKind::Raised { exception } => exception.share(),
            kind => FlatValue::new(ExceptionObject::new(
                kind.exception_name(),
                Value::string(&self.message),
            )),
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.exception_name(), self.message)?;
        if let Some(span) = self.span {
            write!(f, " at {span}")?;
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {}

impl From<SliceError> for EvalError {
    #[cold]
    fn from(err: SliceError) -> Self {
        EvalError::from_kind(EvalErrorKind::InvalidSlice {
            reason: err.to_string(),
        })
    }
}

// Types

#[cold]
pub fn type_error(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeError {
        message: message.into(),
    })
}

/// `what` expected a value of kind `expected` but got `got`.
#[cold]
pub fn type_mismatch(what: &str, expected: &str, got: &Value) -> EvalError {
    type_error(format!("{what} expects {expected}, got {}", got.type_name()))
}

#[cold]
pub fn wrong_arg_count(name: &str, expected: impl fmt::Display, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidNumberOfArgs {
        name: name.to_string(),
        expected: expected.to_string(),
        got,
    })
}

// Ranges

#[cold]
pub fn index_out_of_bounds(index: i64, len: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfBounds { index, len })
}

#[cold]
pub fn key_not_found(key: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::KeyNotFound {
        key: key.repr(),
    })
}

#[cold]
pub fn invalid_slice(reason: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidSlice {
        reason: reason.into(),
    })
}

#[cold]
pub fn range_too_large(start: i64, end: i64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::RangeTooLarge { start, end })
}

// Bindings

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn cannot_change_const(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::CannotChangeConst {
        name: name.to_string(),
    })
}

#[cold]
pub fn already_defined(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::AlreadyDefined {
        name: name.to_string(),
    })
}

#[cold]
pub fn cannot_rebind_builtin(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::CannotRebindBuiltin {
        name: name.to_string(),
    })
}

#[cold]
pub fn not_assignable() -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotAssignable)
}

// Arithmetic

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

#[cold]
pub fn integer_overflow(operation: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow {
        operation: operation.to_string(),
    })
}

// Calls

#[cold]
pub fn not_callable(value: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable {
        type_name: value.type_name().to_string(),
    })
}

#[cold]
pub fn recursion_limit_exceeded(depth: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StackOverflow { depth })
}

#[cold]
pub fn invalid_control_flow(signal: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidControlFlow { signal })
}

#[cold]
pub fn assertion_failed() -> EvalError {
    EvalError::from_kind(EvalErrorKind::AssertionFailed)
}

/// A script exception raised by `throw`.
#[cold]
pub fn raised(exception: FlatValue<ExceptionObject>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Raised { exception })
}

#[cfg(test)]
mod tests;

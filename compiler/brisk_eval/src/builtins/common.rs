//! Conversions, introspection and other kind-agnostic builtins.

use std::hash::{Hash, Hasher};

use brisk_ir::{ConstructKind, ExprList};
use rustc_hash::FxHasher;

use super::{int_of, CallArgs};
use crate::context::ScopeRef;
use crate::errors::{assertion_failed, range_too_large, type_error, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::{FlatStr, Value};

/// Highest precision accepted by `str(float, precision)`.
const MAX_PRECISION: i64 = 64;

/// `print(args...)`: display forms separated by a space, then a newline.
pub(super) fn builtin_print(interp: &mut Interpreter, scope: &ScopeRef, args: &ExprList) -> EvalResult {
    let args = CallArgs::new("print", args, 0..=usize::MAX)?;
    let mut line = String::new();
    for i in 0..args.len() {
        if i > 0 {
            line.push(' ');
        }
        line.push_str(&args.value(interp, scope, i)?.to_string());
    }
    interp.print_handler().println(&line);
    Ok(Value::None)
}

/// `undef(id)`: drop a binding of the calling scope.
pub(super) fn builtin_undef(_interp: &mut Interpreter, scope: &ScopeRef, args: &ExprList) -> EvalResult {
    let args = CallArgs::new("undef", args, 1..=1)?;
    let ConstructKind::Identifier(name) = &args.construct(0).kind else {
        return Err(args.fail(0, type_error("undef expects an identifier")));
    };
    let removed = scope.borrow_mut().remove(name);
    Ok(Value::bool(removed))
}

/// `defined(x)`: whether `x` resolves. The argument is evaluated but never read.
pub(super) fn builtin_defined(interp: &mut Interpreter, scope: &ScopeRef, args: &ExprList) -> EvalResult {
    let args = CallArgs::new("defined", args, 1..=1)?;
    let value = interp.eval(args.construct(0), scope)?;
    Ok(Value::bool(!matches!(value, Value::UndefinedId(_))))
}

pub(super) fn builtin_len(interp: &mut Interpreter, scope: &ScopeRef, args: &ExprList) -> EvalResult {
    let args = CallArgs::new("len", args, 1..=1)?;
    match args.value(interp, scope, 0)? {
        Value::Str(s) => Ok(int_of(s.char_count())),
        Value::Array(a) => Ok(int_of(a.len())),
        Value::Dict(d) => Ok(int_of(d.len())),
        other => Err(args.mismatch(0, "a string, array or dict", &other)),
    }
}

/// `str(x)` / `str(float, precision)`.
pub(super) fn builtin_str(interp: &mut Interpreter, scope: &ScopeRef, args: &ExprList) -> EvalResult {
    let args = CallArgs::new("str", args, 1..=2)?;
    let value = args.value(interp, scope, 0)?;
    match (&value, args.len()) {
        (Value::Str(s), 1) => Ok(Value::Str(s.clone())),
        (Value::Float(v), 2) => {
            let precision = args.int(interp, scope, 1)?;
            if !(0..=MAX_PRECISION).contains(&precision) {
                return Err(args.fail(
                    1,
                    type_error(format!("str expects a precision in [0, {MAX_PRECISION}]")),
                ));
            }
            let precision = usize::try_from(precision).unwrap_or_default();
            Ok(Value::Str(FlatStr::from(format!("{v:.precision$}"))))
        }
        (_, 1) => Ok(Value::Str(FlatStr::from(value.to_string()))),
        (other, _) => Err(args.mismatch(0, "a float when a precision is given", other)),
    }
}

/// Integer prefix of `text`, after optional leading whitespace and sign.
fn parse_int_prefix(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let digits_from = usize::from(trimmed.starts_with(['+', '-']));
    let digits = trimmed[digits_from..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    trimmed[..digits_from + digits].parse().ok()
}

/// `int(x)`: parse a string, truncate a float.
#[allow(
    clippy::cast_possible_truncation,
    reason = "float to int conversion truncates toward zero and saturates"
)]
pub(super) fn builtin_int(interp: &mut Interpreter, scope: &ScopeRef, args: &ExprList) -> EvalResult {
    let args = CallArgs::new("int", args, 1..=1)?;
    match args.value(interp, scope, 0)? {
        Value::Int(v) => Ok(Value::Int(v)),
        Value::Float(v) => Ok(Value::Int(v as i64)),
        Value::Str(s) => parse_int_prefix(s.as_str()).map(Value::Int).ok_or_else(|| {
            args.fail(0, type_error(format!("int cannot parse {}", Value::Str(s.clone()).repr())))
        }),
        other => Err(args.mismatch(0, "a string or number", &other)),
    }
}

#[allow(
    clippy::cast_precision_loss,
    reason = "int to float conversion is the purpose of float()"
)]
pub(super) fn builtin_float(interp: &mut Interpreter, scope: &ScopeRef, args: &ExprList) -> EvalResult {
    let args = CallArgs::new("float", args, 1..=1)?;
    match args.value(interp, scope, 0)? {
        Value::Int(v) => Ok(Value::Float(v as f64)),
        Value::Float(v) => Ok(Value::Float(v)),
        Value::Str(s) => s.as_str().trim().parse().map(Value::Float).map_err(|_| {
            args.fail(0, type_error(format!("float cannot parse {}", Value::Str(s.clone()).repr())))
        }),
        other => Err(args.mismatch(0, "a string or number", &other)),
    }
}

/// `clone(x)`: same value, private payload.
pub(super) fn builtin_clone(interp: &mut Interpreter, scope: &ScopeRef, args: &ExprList) -> EvalResult {
    let args = CallArgs::new("clone", args, 1..=1)?;
    Ok(match args.value(interp, scope, 0)? {
        Value::Array(a) => Value::Array(a.detached()),
        Value::Dict(d) => Value::Dict(d.detached()),
        Value::Str(s) => Value::string(s.as_str()),
        other => other,
    })
}

/// `intptr(x)`: identity of the payload behind an aggregate or function.
#[allow(
    clippy::cast_possible_wrap,
    reason = "the address is an opaque identity, only compared for equality"
)]
pub(super) fn builtin_intptr(interp: &mut Interpreter, scope: &ScopeRef, args: &ExprList) -> EvalResult {
    let args = CallArgs::new("intptr", args, 1..=1)?;
    let addr = match args.value(interp, scope, 0)? {
        Value::Str(s) => s.buffer_addr(),
        Value::Array(a) => a.buffer_addr(),
        Value::Dict(d) => d.buffer_addr(),
        Value::Func(f) => f.addr(),
        Value::Exception(e) => e.addr(),
        other => return Err(args.mismatch(0, "a value with a shared payload", &other)),
    };
    Ok(Value::Int(addr as i64))
}

#[allow(clippy::cast_possible_wrap, reason = "hash bits are reinterpreted as a signed int")]
pub(super) fn builtin_hash(interp: &mut Interpreter, scope: &ScopeRef, args: &ExprList) -> EvalResult {
    let args = CallArgs::new("hash", args, 1..=1)?;
    let value = args.value(interp, scope, 0)?;
    let mut hasher = FxHasher::default();
    value.hash(&mut hasher);
    Ok(Value::Int(hasher.finish() as i64))
}

pub(super) fn builtin_assert(interp: &mut Interpreter, scope: &ScopeRef, args: &ExprList) -> EvalResult {
    let args = CallArgs::new("assert", args, 1..=1)?;
    if args.value(interp, scope, 0)?.is_truthy() {
        Ok(Value::None)
    } else {
        Err(args.fail(0, assertion_failed()))
    }
}

/// `exception(name[, data])`
pub(super) fn builtin_exception(interp: &mut Interpreter, scope: &ScopeRef, args: &ExprList) -> EvalResult {
    let args = CallArgs::new("exception", args, 1..=2)?;
    let name = args.string(interp, scope, 0)?;
    if name.is_empty() {
        return Err(args.fail(0, type_error("exception name cannot be empty")));
    }
    let data = if args.len() == 2 {
        args.value(interp, scope, 1)?
    } else {
        Value::None
    };
    Ok(Value::exception(name.as_str(), data))
}

/// `range(n)` is `[0, n)`; `range(a, b)` is `[a, b)`. An empty or reversed
/// bound pair gives an empty array; more than `u32::MAX` elements is a
/// RangeError.
pub(super) fn builtin_range(interp: &mut Interpreter, scope: &ScopeRef, args: &ExprList) -> EvalResult {
    let args = CallArgs::new("range", args, 1..=2)?;
    let (start, end) = if args.len() == 1 {
        (0, args.int(interp, scope, 0)?)
    } else {
        (args.int(interp, scope, 0)?, args.int(interp, scope, 1)?)
    };
    // Slice views address elements with `u32`.
    let addressable = end.checked_sub(start).and_then(|len| u32::try_from(len).ok());
    if start < end && addressable.is_none() {
        return Err(args.fail(args.len() - 1, range_too_large(start, end)));
    }
    let is_const = scope.is_const_ctx();
    Ok(Value::Array(crate::value::FlatArray::from_values(
        (start..end).map(Value::Int),
        is_const,
    )))
}

#[cfg(test)]
mod tests {
    use super::parse_int_prefix;

    #[test]
    fn parse_int_prefix_accepts_leading_integer() {
        assert_eq!(parse_int_prefix("42"), Some(42));
        assert_eq!(parse_int_prefix("  -7xyz"), Some(-7));
        assert_eq!(parse_int_prefix("+3"), Some(3));
    }

    #[test]
    fn parse_int_prefix_rejects_non_numbers() {
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix("-"), None);
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("99999999999999999999"), None);
    }
}

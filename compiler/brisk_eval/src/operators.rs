//! Operator semantics on plain values.
//!
//! Direct `match` dispatch over operand kinds. Integer arithmetic is checked
//! (overflow and division by zero are errors); mixing `int` and `float`
//! promotes to `float`, which follows IEEE rules. `+` also concatenates
//! strings and arrays. Comparisons and logical operators yield `1` or `0`.
//!
//! `&&` / `||` short-circuit in the interpreter; by the time they reach this
//! module both operands are known.

use std::cmp::Ordering;

use brisk_ir::{BinaryOp, UnaryOp};

use crate::errors::{division_by_zero, integer_overflow, type_error, EvalError};
use crate::value::{FlatArray, FlatStr, Value};

type OpResult = Result<Value, EvalError>;

#[cold]
fn unsupported(op: BinaryOp, left: &Value, right: &Value) -> EvalError {
    type_error(format!(
        "operator `{op}` cannot be applied to {} and {}",
        left.type_name(),
        right.type_name()
    ))
}

#[inline]
fn checked(result: Option<i64>, op_name: &str) -> OpResult {
    result.map(Value::Int).ok_or_else(|| integer_overflow(op_name))
}

fn compare(ordering: Ordering, op: BinaryOp) -> Option<Value> {
    let result = match op {
        BinaryOp::Lt => ordering == Ordering::Less,
        BinaryOp::Gt => ordering == Ordering::Greater,
        BinaryOp::LtEq => ordering != Ordering::Greater,
        BinaryOp::GtEq => ordering != Ordering::Less,
        _ => return None,
    };
    Some(Value::bool(result))
}

fn eval_int(a: i64, b: i64, op: BinaryOp) -> Option<OpResult> {
    let result = match op {
        BinaryOp::Add => checked(a.checked_add(b), "addition"),
        BinaryOp::Sub => checked(a.checked_sub(b), "subtraction"),
        BinaryOp::Mul => checked(a.checked_mul(b), "multiplication"),
        BinaryOp::Div if b == 0 => Err(division_by_zero()),
        BinaryOp::Div => checked(a.checked_div(b), "division"),
        BinaryOp::Mod if b == 0 => Err(division_by_zero()),
        BinaryOp::Mod => checked(a.checked_rem(b), "remainder"),
        _ => return compare(a.cmp(&b), op).map(Ok),
    };
    Some(result)
}

fn eval_float(a: f64, b: f64, op: BinaryOp) -> Option<OpResult> {
    let value = match op {
        BinaryOp::Add => Value::Float(a + b),
        BinaryOp::Sub => Value::Float(a - b),
        BinaryOp::Mul => Value::Float(a * b),
        BinaryOp::Div => Value::Float(a / b),
        BinaryOp::Mod => Value::Float(a % b),
        _ => return a.partial_cmp(&b).and_then(|o| compare(o, op)).map(Ok),
    };
    Some(Ok(value))
}

fn eval_str(a: &FlatStr, b: &FlatStr, op: BinaryOp) -> Option<OpResult> {
    if op == BinaryOp::Add {
        let mut joined = String::with_capacity(a.len() + b.len());
        joined.push_str(a.as_str());
        joined.push_str(b.as_str());
        return Some(Ok(Value::Str(FlatStr::from(joined))));
    }
    compare(a.as_str().cmp(b.as_str()), op).map(Ok)
}

fn eval_array(a: &FlatArray, b: &FlatArray, op: BinaryOp) -> Option<OpResult> {
    if op != BinaryOp::Add {
        return None;
    }
    let items = a.as_slice().iter().chain(b.as_slice()).cloned().collect();
    Some(Ok(Value::Array(FlatArray::new(items))))
}

/// Apply `op` to two plain values.
#[allow(
    clippy::cast_precision_loss,
    reason = "int operands mixed with floats are promoted like the language specifies"
)]
pub fn evaluate_binary(left: &Value, right: &Value, op: BinaryOp) -> OpResult {
    match op {
        BinaryOp::Eq => return Ok(Value::bool(values_equal(left, right))),
        BinaryOp::NotEq => return Ok(Value::bool(!values_equal(left, right))),
        BinaryOp::And => return Ok(Value::bool(left.is_truthy() && right.is_truthy())),
        BinaryOp::Or => return Ok(Value::bool(left.is_truthy() || right.is_truthy())),
        _ => {}
    }

    let result = match (left, right) {
        (Value::Int(a), Value::Int(b)) => eval_int(*a, *b, op),
        (Value::Float(a), Value::Float(b)) => eval_float(*a, *b, op),
        (Value::Int(a), Value::Float(b)) => eval_float(*a as f64, *b, op),
        (Value::Float(a), Value::Int(b)) => eval_float(*a, *b as f64, op),
        (Value::Str(a), Value::Str(b)) => eval_str(a, b, op),
        (Value::Array(a), Value::Array(b)) => eval_array(a, b, op),
        _ => None,
    };
    result.unwrap_or_else(|| Err(unsupported(op, left, right)))
}

/// Language-level `==`.
///
/// Numbers compare by value across `int` and `float`; aggregates compare
/// element-wise; values of unrelated kinds are never equal.
#[allow(
    clippy::cast_precision_loss,
    reason = "int and float compare numerically"
)]
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Float(a), Value::Float(b)) => a == b,
        (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => *a as f64 == *b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len()
                && a
                    .as_slice()
                    .iter()
                    .zip(b.as_slice())
                    .all(|(x, y)| values_equal(x.get(), y.get()))
        }
        (Value::Dict(a), Value::Dict(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .zip(b.iter())
                    .all(|((ka, va), (kb, vb))| ka == kb && values_equal(va.get(), vb.get()))
        }
        _ => left == right,
    }
}

/// Apply a prefix operator.
pub fn evaluate_unary(op: UnaryOp, operand: &Value) -> OpResult {
    match (op, operand) {
        (UnaryOp::Not, v) => Ok(Value::bool(!v.is_truthy())),
        (UnaryOp::Plus, Value::Int(_) | Value::Float(_)) => Ok(operand.clone()),
        (UnaryOp::Neg, Value::Int(v)) => checked(v.checked_neg(), "negation"),
        (UnaryOp::Neg, Value::Float(v)) => Ok(Value::Float(-v)),
        (op, v) => Err(type_error(format!(
            "unary `{}` cannot be applied to {}",
            op.as_symbol(),
            v.type_name()
        ))),
    }
}

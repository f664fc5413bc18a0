//! Literals, names, element access and operators.

use brisk_ir::{BinaryOp, Construct, Name, UnaryOp};

use super::Interpreter;
use crate::context::{Resolution, ScopeRef};
use crate::errors::{
    index_out_of_bounds, invalid_slice, key_not_found, type_error, type_mismatch, EvalError,
    EvalResult,
};
use crate::lvalue::LValue;
use crate::operators::{evaluate_binary, evaluate_unary};
use crate::place::Place;
use crate::value::{FlatArray, FlatDict, Value};

/// Resolve a subscript against `len`, counting negative indices from the end.
fn normalize_index(index: &Value, len: usize) -> Result<usize, EvalError> {
    let Value::Int(raw) = *index else {
        return Err(type_mismatch("subscript", "an int", index));
    };
    let signed_len = i64::try_from(len).unwrap_or(i64::MAX);
    let resolved = if raw < 0 { raw.saturating_add(signed_len) } else { raw };
    usize::try_from(resolved)
        .ok()
        .filter(|&i| i < len)
        .ok_or_else(|| index_out_of_bounds(raw, len))
}

/// Resolve an optional slice bound; the result lies in `0..=len`.
fn normalize_bound(bound: Option<&Value>, len: usize, default: usize) -> Result<usize, EvalError> {
    let Some(bound) = bound else {
        return Ok(default);
    };
    let Value::Int(raw) = *bound else {
        return Err(type_mismatch("slice", "int bounds", bound));
    };
    let signed_len = i64::try_from(len).unwrap_or(i64::MAX);
    let resolved = if raw < 0 { raw.saturating_add(signed_len) } else { raw };
    usize::try_from(resolved)
        .ok()
        .filter(|&i| i <= len)
        .ok_or_else(|| invalid_slice(format!("bound {raw} out of range for length {len}")))
}

/// Element `index` of a plain (non-place) value.
fn element_of(value: &Value, index: &Value) -> Result<Value, EvalError> {
    match value {
        Value::Array(arr) => {
            let i = normalize_index(index, arr.len())?;
            Ok(arr.get(i).map_or(Value::None, LValue::eval))
        }
        Value::Dict(dict) => dict
            .get(index)
            .map(LValue::eval)
            .ok_or_else(|| key_not_found(index)),
        Value::Str(text) => {
            let i = normalize_index(index, text.char_count())?;
            Ok(Value::Str(text.slice_chars(i, i + 1)?))
        }
        other => Err(type_error(format!("cannot index a value of type {}", other.type_name()))),
    }
}

/// Member `name` of a plain (non-place) value.
fn member_of(value: &Value, name: &Name) -> Result<Value, EvalError> {
    match value {
        Value::Dict(dict) => {
            let key = Value::string(name);
            dict.get(&key).map(LValue::eval).ok_or_else(|| key_not_found(&key))
        }
        Value::Exception(exception) => match name.as_str() {
            "name" => Ok(Value::string(&exception.name)),
            "data" => Ok(exception.data.clone()),
            _ => Err(type_error(format!("exception has no member `{name}`"))),
        },
        other => Err(type_error(format!(
            "value of type {} has no member `{name}`",
            other.type_name()
        ))),
    }
}

impl Interpreter {
    pub(super) fn eval_identifier(name: &Name, scope: &ScopeRef) -> Value {
        match scope.lookup(name) {
            Resolution::Binding(owner) => Value::LValue(Place::binding(owner, name.clone())),
            Resolution::Builtin(builtin) => Value::Builtin(builtin),
            Resolution::Unresolved => Value::UndefinedId(name.clone()),
        }
    }

    /// Elements of a literal created in a const context are const.
    pub(super) fn eval_array_literal(&mut self, items: &[Construct], scope: &ScopeRef) -> EvalResult {
        let mut values = Vec::with_capacity(items.len());
        for item in items {
            values.push(self.eval_rvalue(item, scope)?);
        }
        Ok(Value::Array(FlatArray::from_values(values, scope.is_const_ctx())))
    }

    /// A repeated key keeps the first value; later ones are still evaluated.
    pub(super) fn eval_dict_literal(
        &mut self,
        pairs: &[(Construct, Construct)],
        scope: &ScopeRef,
    ) -> EvalResult {
        let is_const = scope.is_const_ctx();
        let mut dict = FlatDict::new();
        for (key, value) in pairs {
            let key = self.eval_rvalue(key, scope)?;
            let value = self.eval_rvalue(value, scope)?;
            dict.insert_new(key, LValue::new(value, is_const));
        }
        Ok(Value::Dict(dict))
    }

    /// `target.member`: a dictionary entry (as a place when `target` is one)
    /// or an exception field.
    pub(super) fn eval_member(&mut self, target: &Construct, member: &Name, scope: &ScopeRef) -> EvalResult {
        match self.eval(target, scope)? {
            Value::LValue(place) => {
                let current = place.read()?;
                if matches!(current, Value::Dict(_)) {
                    Ok(Value::LValue(place.key(Value::string(member))))
                } else {
                    Ok(member_of(&current, member)?)
                }
            }
            other => Ok(member_of(&Self::rvalue(other)?, member)?),
        }
    }

    /// `target[index]`. Indexing a place yields a deeper place, so the
    /// element can be assigned.
    pub(super) fn eval_subscript(&mut self, target: &Construct, index: &Construct, scope: &ScopeRef) -> EvalResult {
        let base = self.eval(target, scope)?;
        let index_value = self.eval_rvalue(index, scope)?;
        let with_index_span = |err: EvalError| err.with_span_if_missing(index.span);

        match base {
            Value::LValue(place) => match place.read()? {
                Value::Array(arr) => {
                    let i = normalize_index(&index_value, arr.len()).map_err(with_index_span)?;
                    Ok(Value::LValue(place.index(i)))
                }
                Value::Dict(_) => Ok(Value::LValue(place.key(index_value))),
                current => Ok(element_of(&current, &index_value).map_err(with_index_span)?),
            },
            other => Ok(element_of(&Self::rvalue(other)?, &index_value).map_err(with_index_span)?),
        }
    }

    /// `target[start:end]`: a zero-copy view of an array or string.
    pub(super) fn eval_slice(
        &mut self,
        target: &Construct,
        start: Option<&Construct>,
        end: Option<&Construct>,
        scope: &ScopeRef,
    ) -> EvalResult {
        let value = self.eval_rvalue(target, scope)?;
        let start = match start {
            Some(c) => Some(self.eval_rvalue(c, scope)?),
            None => None,
        };
        let end = match end {
            Some(c) => Some(self.eval_rvalue(c, scope)?),
            None => None,
        };

        let len = match &value {
            Value::Array(arr) => arr.len(),
            Value::Str(text) => text.char_count(),
            other => return Err(type_mismatch("slice", "an array or string", other).into()),
        };
        let from = normalize_bound(start.as_ref(), len, 0)?;
        let to = normalize_bound(end.as_ref(), len, len)?;
        if from > to {
            return Err(invalid_slice(format!("start {from} is past end {to}")).into());
        }

        match value {
            Value::Array(arr) => Ok(Value::Array(arr.make_slice(from, to - from).map_err(EvalError::from)?)),
            Value::Str(text) => Ok(Value::Str(text.slice_chars(from, to).map_err(EvalError::from)?)),
            other => Err(type_mismatch("slice", "an array or string", &other).into()),
        }
    }

    pub(super) fn eval_unary(&mut self, op: UnaryOp, operand: &Construct, scope: &ScopeRef) -> EvalResult {
        let value = self.eval_rvalue(operand, scope)?;
        Ok(evaluate_unary(op, &value)?)
    }

    /// Operands are evaluated left to right and folded in order. `&&` and
    /// `||` skip their right operand once the result is decided.
    pub(super) fn eval_binary_chain(
        &mut self,
        first: &Construct,
        rest: &[(BinaryOp, Construct)],
        scope: &ScopeRef,
    ) -> EvalResult {
        let mut acc = self.eval_rvalue(first, scope)?;
        for (op, operand) in rest {
            match op {
                BinaryOp::And | BinaryOp::Or => {
                    let decided = acc.is_truthy() == (*op == BinaryOp::Or);
                    acc = if decided {
                        Value::bool(*op == BinaryOp::Or)
                    } else {
                        Value::bool(self.eval_rvalue(operand, scope)?.is_truthy())
                    };
                }
                _ => {
                    let rhs = self.eval_rvalue(operand, scope)?;
                    acc = evaluate_binary(&acc, &rhs, *op)
                        .map_err(|err| err.with_span_if_missing(operand.span))?;
                }
            }
        }
        Ok(acc)
    }
}

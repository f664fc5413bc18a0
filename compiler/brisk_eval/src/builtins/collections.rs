//! Array and dictionary builtins.
//!
//! Mutating builtins (`insert`, `erase`, `append`, `pop`) take their container
//! as an assignable argument and write through [`Place::write`], so they obey
//! the same const rules as assignment and copy shared payloads before
//! changing them.

use brisk_ir::ExprList;

use super::{int_of, resolve_index, CallArgs};
use crate::context::ScopeRef;
use crate::errors::{index_out_of_bounds, type_mismatch, ControlAction, EvalError, EvalResult};
use crate::interpreter::Interpreter;
use crate::lvalue::LValue;
use crate::operators::values_equal;
use crate::place::Place;
use crate::value::{FlatArray, FlatDict, FlatValue, FuncObject, Value};

/// Run `f` on the array stored at `place`.
fn write_array<R>(
    place: &Place,
    scope: &ScopeRef,
    name: &str,
    f: impl FnOnce(&mut FlatArray) -> Result<R, EvalError>,
) -> Result<R, EvalError> {
    place.write(scope, false, |cell| match cell.get_mut() {
        Value::Array(arr) => f(arr),
        other => Err(type_mismatch(name, "an array", other)),
    })
}

/// Run `f` on the dictionary stored at `place`.
fn write_dict<R>(
    place: &Place,
    scope: &ScopeRef,
    name: &str,
    f: impl FnOnce(&mut FlatDict) -> Result<R, EvalError>,
) -> Result<R, EvalError> {
    place.write(scope, false, |cell| match cell.get_mut() {
        Value::Dict(dict) => f(dict),
        other => Err(type_mismatch(name, "a dict", other)),
    })
}

/// `find(dict, key)` → value or `none`; `find(array, v)` → index or `none`;
/// `find(str, sub)` → character index or `none`.
pub(super) fn builtin_find(interp: &mut Interpreter, scope: &ScopeRef, args: &ExprList) -> EvalResult {
    let args = CallArgs::new("find", args, 2..=2)?;
    let container = args.value(interp, scope, 0)?;
    let needle = args.value(interp, scope, 1)?;
    match &container {
        Value::Dict(dict) => Ok(dict.get(&needle).map_or(Value::None, LValue::eval)),
        Value::Array(arr) => Ok(arr
            .as_slice()
            .iter()
            .position(|cell| values_equal(cell.get(), &needle))
            .map_or(Value::None, int_of)),
        Value::Str(text) => {
            let Value::Str(sub) = &needle else {
                return Err(args.mismatch(1, "a string", &needle));
            };
            let text = text.as_str();
            Ok(text
                .find(sub.as_str())
                .map_or(Value::None, |byte| int_of(text[..byte].chars().count())))
        }
        other => Err(args.mismatch(0, "a dict, array or string", other)),
    }
}

/// Kind of the container stored at a place, read without keeping a handle
/// to its payload so the write that follows can mutate it in place.
enum Container {
    Dict,
    Array { len: usize },
}

fn container_at(args: &CallArgs<'_>, place: &Place) -> Result<Container, ControlAction> {
    match place.read().map_err(|e| args.fail(0, e))? {
        Value::Dict(_) => Ok(Container::Dict),
        Value::Array(arr) => Ok(Container::Array { len: arr.len() }),
        other => Err(args.mismatch(0, "a dict or array", &other)),
    }
}

/// Array position argument `i`, resolved against `len`.
fn position_arg(
    args: &CallArgs<'_>,
    i: usize,
    position: &Value,
    len: usize,
    allow_end: bool,
) -> Result<usize, ControlAction> {
    let Some(index) = position.as_int() else {
        return Err(args.mismatch(i, "an int index", position));
    };
    resolve_index(index, len, allow_end)
        .ok_or_else(|| args.fail(i, index_out_of_bounds(index, len)))
}

/// `insert(dict, key, value)` → whether the key was new; an existing entry is
/// left untouched. `insert(array, index, value)` shifts later elements.
pub(super) fn builtin_insert(interp: &mut Interpreter, scope: &ScopeRef, args: &ExprList) -> EvalResult {
    let args = CallArgs::new("insert", args, 3..=3)?;
    let place = args.place(interp, scope, 0)?;
    let key = args.value(interp, scope, 1)?;
    let value = args.value(interp, scope, 2)?;

    match container_at(&args, &place)? {
        Container::Dict => {
            let inserted = write_dict(&place, scope, "insert", |dict| {
                Ok(dict.insert_new(key, LValue::new(value, false)))
            })
            .map_err(|e| args.fail(0, e))?;
            Ok(Value::bool(inserted))
        }
        Container::Array { len } => {
            let at = position_arg(&args, 1, &key, len, true)?;
            write_array(&place, scope, "insert", |arr| {
                arr.make_mut().insert(at, LValue::new(value, false));
                Ok(())
            })
            .map_err(|e| args.fail(0, e))?;
            Ok(Value::None)
        }
    }
}

/// `erase(dict, key)` → whether a key was removed; `erase(array, index)`
/// → the removed element.
pub(super) fn builtin_erase(interp: &mut Interpreter, scope: &ScopeRef, args: &ExprList) -> EvalResult {
    let args = CallArgs::new("erase", args, 2..=2)?;
    let place = args.place(interp, scope, 0)?;
    let key = args.value(interp, scope, 1)?;

    match container_at(&args, &place)? {
        Container::Dict => {
            let removed = write_dict(&place, scope, "erase", |dict| Ok(dict.remove(&key)))
                .map_err(|e| args.fail(0, e))?;
            Ok(Value::bool(removed))
        }
        Container::Array { len } => {
            let at = position_arg(&args, 1, &key, len, false)?;
            write_array(&place, scope, "erase", |arr| Ok(arr.make_mut().remove(at).eval()))
                .map_err(|e| args.fail(0, e))
        }
    }
}

/// `append(array, value)`
pub(super) fn builtin_append(interp: &mut Interpreter, scope: &ScopeRef, args: &ExprList) -> EvalResult {
    let args = CallArgs::new("append", args, 2..=2)?;
    let place = args.place(interp, scope, 0)?;
    let value = args.value(interp, scope, 1)?;
    write_array(&place, scope, "append", |arr| {
        arr.make_mut().push(LValue::new(value, false));
        Ok(())
    })
    .map_err(|e| args.fail(0, e))?;
    Ok(Value::None)
}

/// `pop(array)` → the removed last element.
pub(super) fn builtin_pop(interp: &mut Interpreter, scope: &ScopeRef, args: &ExprList) -> EvalResult {
    let args = CallArgs::new("pop", args, 1..=1)?;
    let place = args.place(interp, scope, 0)?;
    write_array(&place, scope, "pop", |arr| {
        if arr.is_empty() {
            return Err(index_out_of_bounds(-1, 0));
        }
        Ok(arr.make_mut().pop().map_or(Value::None, |cell| cell.eval()))
    })
    .map_err(|e| args.fail(0, e))
}

fn dict_arg(
    args: &CallArgs<'_>,
    interp: &mut Interpreter,
    scope: &ScopeRef,
) -> Result<FlatDict, ControlAction> {
    match args.value(interp, scope, 0)? {
        Value::Dict(dict) => Ok(dict),
        other => Err(args.mismatch(0, "a dict", &other)),
    }
}

pub(super) fn builtin_keys(interp: &mut Interpreter, scope: &ScopeRef, args: &ExprList) -> EvalResult {
    let args = CallArgs::new("keys", args, 1..=1)?;
    let dict = dict_arg(&args, interp, scope)?;
    Ok(Value::array(dict.iter().map(|(k, _)| k.clone())))
}

pub(super) fn builtin_values(interp: &mut Interpreter, scope: &ScopeRef, args: &ExprList) -> EvalResult {
    let args = CallArgs::new("values", args, 1..=1)?;
    let dict = dict_arg(&args, interp, scope)?;
    Ok(Value::array(dict.iter().map(|(_, v)| v.eval())))
}

/// `kvpairs(dict)` → `[[key, value], ...]` in key order.
pub(super) fn builtin_kvpairs(interp: &mut Interpreter, scope: &ScopeRef, args: &ExprList) -> EvalResult {
    let args = CallArgs::new("kvpairs", args, 1..=1)?;
    let dict = dict_arg(&args, interp, scope)?;
    Ok(Value::array(
        dict.iter()
            .map(|(k, v)| Value::array([k.clone(), v.eval()])),
    ))
}

fn func_arg(
    args: &CallArgs<'_>,
    interp: &mut Interpreter,
    scope: &ScopeRef,
) -> Result<FlatValue<FuncObject>, ControlAction> {
    match args.value(interp, scope, 0)? {
        Value::Func(func) => Ok(func),
        other => Err(args.mismatch(0, "a func", &other)),
    }
}

/// `map(f, array)` → `[f(x), ...]`; `map(f, dict)` → `[f(k, v), ...]`.
pub(super) fn builtin_map(interp: &mut Interpreter, scope: &ScopeRef, args: &ExprList) -> EvalResult {
    let args = CallArgs::new("map", args, 2..=2)?;
    let func = func_arg(&args, interp, scope)?;
    let call_span = args.list.span;
    let mut out = Vec::new();
    match args.value(interp, scope, 1)? {
        Value::Array(arr) => {
            for item in arr.values() {
                out.push(interp.call_function(&func, vec![item], call_span, scope)?);
            }
        }
        Value::Dict(dict) => {
            for (k, v) in dict.iter() {
                out.push(interp.call_function(&func, vec![k.clone(), v.eval()], call_span, scope)?);
            }
        }
        other => return Err(args.mismatch(1, "an array or dict", &other)),
    }
    Ok(Value::Array(FlatArray::from_values(out, scope.is_const_ctx())))
}

/// `filter(f, array)` keeps elements where `f(x)` is truthy; `filter(f, dict)`
/// keeps entries where `f(k, v)` is.
pub(super) fn builtin_filter(interp: &mut Interpreter, scope: &ScopeRef, args: &ExprList) -> EvalResult {
    let args = CallArgs::new("filter", args, 2..=2)?;
    let func = func_arg(&args, interp, scope)?;
    let call_span = args.list.span;
    let is_const = scope.is_const_ctx();
    match args.value(interp, scope, 1)? {
        Value::Array(arr) => {
            let mut kept = Vec::new();
            for item in arr.values() {
                if interp
                    .call_function(&func, vec![item.clone()], call_span, scope)?
                    .is_truthy()
                {
                    kept.push(item);
                }
            }
            Ok(Value::Array(FlatArray::from_values(kept, is_const)))
        }
        Value::Dict(dict) => {
            let mut kept = Vec::new();
            for (k, v) in dict.iter() {
                let value = v.eval();
                if interp
                    .call_function(&func, vec![k.clone(), value.clone()], call_span, scope)?
                    .is_truthy()
                {
                    kept.push((k.clone(), LValue::new(value, is_const)));
                }
            }
            Ok(Value::Dict(FlatDict::from_entries(kept)))
        }
        other => Err(args.mismatch(1, "an array or dict", &other)),
    }
}

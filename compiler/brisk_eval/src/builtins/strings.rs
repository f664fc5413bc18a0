//! String builtins.

use brisk_ir::ExprList;

use super::CallArgs;
use crate::context::ScopeRef;
use crate::errors::{type_error, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::{FlatArray, FlatStr, Value};

/// `split(text, delim)`.
///
/// An empty delimiter yields one string per character. Otherwise the text is
/// cut at every occurrence of `delim`, keeping empty segments (including a
/// trailing one). Every piece is a slice of `text`'s buffer.
pub(super) fn builtin_split(interp: &mut Interpreter, scope: &ScopeRef, args: &ExprList) -> EvalResult {
    let args = CallArgs::new("split", args, 2..=2)?;
    let text = args.string(interp, scope, 0)?;
    let delim = args.string(interp, scope, 1)?;

    let pieces: Vec<FlatStr> = if delim.is_empty() {
        text.chars().collect()
    } else {
        let mut pieces = Vec::new();
        let mut start = 0;
        for (at, _) in text.as_str().match_indices(delim.as_str()) {
            pieces.push(text.make_slice(start, at - start).map_err(|e| args.fail(0, e.into()))?);
            start = at + delim.len();
        }
        pieces.push(text.make_slice(start, text.len() - start).map_err(|e| args.fail(0, e.into()))?);
        pieces
    };

    Ok(Value::Array(FlatArray::from_values(
        pieces.into_iter().map(Value::Str),
        scope.is_const_ctx(),
    )))
}

/// `join(array, delim)`: every element must be a string.
pub(super) fn builtin_join(interp: &mut Interpreter, scope: &ScopeRef, args: &ExprList) -> EvalResult {
    let args = CallArgs::new("join", args, 2..=2)?;
    let items = match args.value(interp, scope, 0)? {
        Value::Array(arr) => arr,
        other => return Err(args.mismatch(0, "an array", &other)),
    };
    let delim = args.string(interp, scope, 1)?;

    let mut joined = String::new();
    for (i, cell) in items.as_slice().iter().enumerate() {
        let Value::Str(piece) = cell.get() else {
            return Err(args.fail(
                0,
                type_error(format!(
                    "join expects an array of strings, element {i} is {}",
                    cell.get().type_name()
                )),
            ));
        };
        if i > 0 {
            joined.push_str(delim.as_str());
        }
        joined.push_str(piece.as_str());
    }
    Ok(Value::Str(FlatStr::from(joined)))
}

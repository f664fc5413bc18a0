//! Runtime values.
//!
//! [`Value`] is the closed set of kinds the evaluator produces. Aggregates
//! (strings, arrays, dictionaries) and functions are handles onto
//! [`FlatValue`] payloads: copying a `Value` copies the handle, and mutation
//! goes through copy-on-write, so every copy behaves as an independent value.
//!
//! Two kinds are transient evaluation results rather than data:
//! - `LValue`: an addressable location, produced by identifiers, member
//!   access and subscripts so assignments can write through it;
//! - `UndefinedId`: an identifier that resolved to nothing.
//!
//! Neither may ever be stored in a cell (see [`crate::LValue`]); callers turn
//! them into plain values with `Interpreter::rvalue` first.
//!
//! Booleans are `Int(1)` / `Int(0)`.

mod array;
mod dict;
mod exception;
mod flat;
mod function;
mod string;
mod view;

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use brisk_ir::{escape, Name};

pub use array::FlatArray;
pub use dict::FlatDict;
pub use exception::ExceptionObject;
pub use flat::FlatValue;
pub use function::{Builtin, BuiltinFn, CapturedEnv, FuncObject};
pub use string::FlatStr;
pub use view::{SliceError, SliceView};

use crate::place::Place;

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    None,
    Str(FlatStr),
    Array(FlatArray),
    Dict(FlatDict),
    Func(FlatValue<FuncObject>),
    Builtin(Builtin),
    Exception(FlatValue<ExceptionObject>),
    /// Addressable location; never stored.
    LValue(Place),
    /// Unresolved identifier; never stored.
    UndefinedId(Name),
}

impl Value {
    #[inline]
    pub fn bool(b: bool) -> Self {
        Value::Int(i64::from(b))
    }

    pub fn string(text: &str) -> Self {
        Value::Str(FlatStr::new(text))
    }

    /// Array of non-const elements.
    pub fn array(values: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(FlatArray::from_values(values, false))
    }

    /// Dictionary of non-const entries.
    pub fn dict(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Value::Dict(FlatDict::from_entries(
            entries
                .into_iter()
                .map(|(k, v)| (k, crate::LValue::new(v, false))),
        ))
    }

    pub fn exception(name: &str, data: Value) -> Self {
        Value::Exception(FlatValue::new(ExceptionObject::new(name, data)))
    }

    pub fn func(func: FuncObject) -> Self {
        Value::Func(FlatValue::new(func))
    }

    /// Kind name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::None => "none",
            Value::Str(_) => "str",
            Value::Array(_) => "array",
            Value::Dict(_) => "dict",
            Value::Func(_) => "func",
            Value::Builtin(_) => "builtin",
            Value::Exception(_) => "exception",
            Value::LValue(_) => "lvalue",
            Value::UndefinedId(_) => "undefined",
        }
    }

    /// Whether this is one of the transient kinds that cells reject.
    #[inline]
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Value::LValue(_) | Value::UndefinedId(_))
    }

    /// Truth value for conditions: zero, empty and `none` are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(v) => *v != 0,
            Value::Float(v) => *v != 0.0,
            Value::None | Value::UndefinedId(_) => false,
            Value::Str(s) => !s.is_empty(),
            Value::Array(a) => !a.is_empty(),
            Value::Dict(d) => !d.is_empty(),
            Value::Func(_) | Value::Builtin(_) | Value::Exception(_) | Value::LValue(_) => true,
        }
    }

    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Display form used inside aggregates: strings are quoted and escaped.
    pub fn repr(&self) -> String {
        match self {
            Value::Str(s) => format!("\"{}\"", escape(s.as_str())),
            other => other.to_string(),
        }
    }

    /// Position of the kind in the cross-kind ordering.
    fn rank(&self) -> u8 {
        match self {
            Value::None => 0,
            Value::Int(_) => 1,
            Value::Float(_) => 2,
            Value::Str(_) => 3,
            Value::Array(_) => 4,
            Value::Dict(_) => 5,
            Value::Func(_) => 6,
            Value::Builtin(_) => 7,
            Value::Exception(_) => 8,
            Value::LValue(_) => 9,
            Value::UndefinedId(_) => 10,
        }
    }
}

fn fmt_float(v: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        write!(f, "{v:.1}")
    } else {
        write!(f, "{v}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => fmt_float(*v, f),
            Value::None => write!(f, "none"),
            Value::Str(s) => f.write_str(s.as_str()),
            Value::Array(a) => {
                f.write_str("[")?;
                for (i, v) in a.as_slice().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(&v.get().repr())?;
                }
                f.write_str("]")
            }
            Value::Dict(d) => {
                f.write_str("{")?;
                for (i, (k, v)) in d.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", k.repr(), v.get().repr())?;
                }
                f.write_str("}")
            }
            Value::Func(func) => write!(f, "<func {}>", func.display_name()),
            Value::Builtin(b) => write!(f, "<builtin {}>", b.name),
            Value::Exception(e) => write!(f, "<exception {}>", e.name),
            Value::LValue(place) => write!(f, "<lvalue {}>", place.name()),
            Value::UndefinedId(name) => write!(f, "<undefined {name}>"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "Int({v})"),
            Value::Float(v) => write!(f, "Float({v:?})"),
            Value::None => write!(f, "None"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Array(a) => write!(f, "Array({a:?})"),
            Value::Dict(d) => write!(f, "Dict({d:?})"),
            Value::Func(func) => write!(f, "Func({})", func.display_name()),
            Value::Builtin(b) => write!(f, "Builtin({})", b.name),
            Value::Exception(e) => write!(f, "Exception({}, {:?})", e.name, e.data),
            Value::LValue(place) => write!(f, "LValue({place:?})"),
            Value::UndefinedId(name) => write!(f, "UndefinedId({name:?})"),
        }
    }
}

/// Total order over all values: by kind first, then by content.
///
/// This is the key order of dictionaries. It is stricter than the language's
/// `==` (`1` and `1.0` are distinct keys); see `operators::values_equal`.
impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::None, Value::None) => Ordering::Equal,
            (Value::Str(a), Value::Str(b)) => a.as_str().cmp(b.as_str()),
            (Value::Array(a), Value::Array(b)) => a
                .as_slice()
                .iter()
                .map(crate::LValue::get)
                .cmp(b.as_slice().iter().map(crate::LValue::get)),
            (Value::Dict(a), Value::Dict(b)) => a
                .iter()
                .map(|(k, v)| (k, v.get()))
                .cmp(b.iter().map(|(k, v)| (k, v.get()))),
            (Value::Func(a), Value::Func(b)) => a.addr().cmp(&b.addr()),
            (Value::Builtin(a), Value::Builtin(b)) => a.name.cmp(b.name),
            (Value::Exception(a), Value::Exception(b)) => {
                a.name.cmp(&b.name).then_with(|| a.data.cmp(&b.data))
            }
            (Value::LValue(a), Value::LValue(b)) => a.cmp(b),
            (Value::UndefinedId(a), Value::UndefinedId(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Int(v) => v.hash(state),
            Value::Float(v) => v.to_bits().hash(state),
            Value::None => {}
            Value::Str(s) => s.as_str().hash(state),
            Value::Array(a) => {
                a.len().hash(state);
                for cell in a.as_slice() {
                    cell.get().hash(state);
                }
            }
            Value::Dict(d) => {
                d.len().hash(state);
                for (k, v) in d.iter() {
                    k.hash(state);
                    v.get().hash(state);
                }
            }
            Value::Func(func) => func.addr().hash(state),
            Value::Builtin(b) => b.name.hash(state),
            Value::Exception(e) => {
                e.name.hash(state);
                e.data.hash(state);
            }
            Value::LValue(place) => place.hash(state),
            Value::UndefinedId(name) => name.hash(state),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::string(text)
    }
}

impl From<FlatStr> for Value {
    fn from(s: FlatStr) -> Self {
        Value::Str(s)
    }
}

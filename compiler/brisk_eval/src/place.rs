//! Addressable locations.
//!
//! Identifiers, member access and subscripts evaluate to a [`Place`]: a named
//! binding plus a path of element accessors into nested aggregates. Reading
//! a place walks the path; writing walks it with copy-on-write so that only
//! the binding being assigned observes the change, however many other values
//! share the aggregates along the way.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use brisk_ir::Name;
use smallvec::SmallVec;

use crate::context::ScopeRef;
use crate::errors::{
    cannot_change_const, index_out_of_bounds, key_not_found, type_error, undefined_variable,
    EvalError,
};
use crate::lvalue::LValue;
use crate::value::Value;

/// One step from an aggregate to one of its element cells.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Accessor {
    /// Array element; already normalized to `0..len`.
    Index(usize),
    /// Dictionary entry. Boxed because a `Place` is itself a `Value`.
    Key(Box<Value>),
}

/// A binding, optionally followed by element accessors.
#[derive(Clone)]
pub struct Place {
    owner: ScopeRef,
    name: Name,
    path: SmallVec<[Accessor; 2]>,
}

fn as_i64(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}

fn step<'a>(cell: &'a LValue, accessor: &Accessor) -> Result<&'a LValue, EvalError> {
    match (cell.get(), accessor) {
        (Value::Array(arr), Accessor::Index(i)) => arr
            .get(*i)
            .ok_or_else(|| index_out_of_bounds(as_i64(*i), arr.len())),
        (Value::Dict(dict), Accessor::Key(key)) => dict.get(key).ok_or_else(|| key_not_found(key)),
        (other, _) => Err(type_error(format!(
            "cannot access elements of {}",
            other.type_name()
        ))),
    }
}

fn step_mut<'a>(
    cell: &'a mut LValue,
    accessor: &Accessor,
    insert_missing: bool,
) -> Result<&'a mut LValue, EvalError> {
    match (cell.get_mut(), accessor) {
        (Value::Array(arr), Accessor::Index(i)) => {
            let len = arr.len();
            arr.get_mut(*i)
                .ok_or_else(|| index_out_of_bounds(as_i64(*i), len))
        }
        (Value::Dict(dict), Accessor::Key(key)) => {
            if insert_missing {
                Ok(dict.entry_mut(Value::clone(key)))
            } else {
                dict.get_mut(key).ok_or_else(|| key_not_found(key))
            }
        }
        (other, _) => Err(type_error(format!(
            "cannot assign elements of {}",
            other.type_name()
        ))),
    }
}

impl Place {
    /// The binding `name` owned by `owner`.
    pub fn binding(owner: ScopeRef, name: Name) -> Self {
        Place {
            owner,
            name,
            path: SmallVec::new(),
        }
    }

    #[inline]
    pub fn owner(&self) -> &ScopeRef {
        &self.owner
    }

    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Whether this is the binding itself rather than an element of it.
    #[inline]
    pub fn is_binding(&self) -> bool {
        self.path.is_empty()
    }

    #[must_use]
    pub fn index(&self, index: usize) -> Place {
        let mut place = self.clone();
        place.path.push(Accessor::Index(index));
        place
    }

    #[must_use]
    pub fn key(&self, key: Value) -> Place {
        let mut place = self.clone();
        place.path.push(Accessor::Key(Box::new(key)));
        place
    }

    /// Current value at this location.
    pub fn read(&self) -> Result<Value, EvalError> {
        let ctx = self.owner.borrow();
        let mut cell = ctx
            .binding(&self.name)
            .ok_or_else(|| undefined_variable(&self.name))?;
        for accessor in &self.path {
            cell = step(cell, accessor)?;
        }
        Ok(cell.eval())
    }

    /// Run `f` on the target cell for a write issued from scope `from`.
    ///
    /// Every cell on the path must be non-const and the owning scope must be
    /// reachable from `from` without crossing a const context. Aggregates
    /// along the path are made private to this binding first. With
    /// `insert_missing`, a missing final dictionary key is created.
    pub fn write<R>(
        &self,
        from: &ScopeRef,
        insert_missing: bool,
        f: impl FnOnce(&mut LValue) -> Result<R, EvalError>,
    ) -> Result<R, EvalError> {
        if from.crosses_const_scope(&self.owner) {
            return Err(cannot_change_const(&self.name));
        }
        let mut ctx = self.owner.borrow_mut();
        let mut cell = ctx
            .binding_mut(&self.name)
            .ok_or_else(|| undefined_variable(&self.name))?;
        let last = self.path.len();
        for (depth, accessor) in self.path.iter().enumerate() {
            if cell.is_const() {
                return Err(cannot_change_const(&self.name));
            }
            cell = step_mut(cell, accessor, insert_missing && depth + 1 == last)?;
        }
        if cell.is_const() {
            return Err(cannot_change_const(&self.name));
        }
        f(cell)
    }

    /// Replace the value at this location.
    pub fn put(&self, from: &ScopeRef, value: Value) -> Result<(), EvalError> {
        self.write(from, true, |cell| {
            cell.put(value);
            Ok(())
        })
    }
}

impl fmt::Debug for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for accessor in &self.path {
            match accessor {
                Accessor::Index(i) => write!(f, "[{i}]")?,
                Accessor::Key(k) => write!(f, "[{}]", k.repr())?,
            }
        }
        Ok(())
    }
}

impl PartialEq for Place {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Place {}

impl Ord for Place {
    fn cmp(&self, other: &Self) -> Ordering {
        self.owner
            .addr()
            .cmp(&other.owner.addr())
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.path.cmp(&other.path))
    }
}

impl PartialOrd for Place {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for Place {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owner.addr().hash(state);
        self.name.hash(state);
        self.path.hash(state);
    }
}

#[cfg(test)]
mod tests;

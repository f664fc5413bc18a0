//! Storage cells.

use crate::value::Value;

/// A storage cell: one value plus an immutable const flag.
///
/// Cells back every named binding and every aggregate element. They only
/// ever hold first-class values; storing an `LValue` or `UndefinedId`
/// sentinel is an evaluator bug and panics immediately.
///
/// The const flag is fixed at construction. The cell itself does not refuse
/// writes to const cells; the assignment paths check [`LValue::is_const`]
/// and report a const violation to the script.
#[derive(Clone, Debug)]
pub struct LValue {
    value: Value,
    is_const: bool,
}

#[inline]
#[track_caller]
fn assert_storable(value: &Value) {
    assert!(
        !value.is_sentinel(),
        "attempted to store a {} sentinel in a storage cell",
        value.type_name()
    );
}

impl LValue {
    #[track_caller]
    pub fn new(value: Value, is_const: bool) -> Self {
        assert_storable(&value);
        LValue { value, is_const }
    }

    /// Replace the stored value.
    #[track_caller]
    pub fn put(&mut self, value: Value) {
        assert_storable(&value);
        self.value = value;
    }

    /// Handle-share of the stored value.
    #[inline]
    pub fn eval(&self) -> Value {
        self.value.clone()
    }

    #[inline]
    pub fn get(&self) -> &Value {
        &self.value
    }

    #[inline]
    pub fn is_const(&self) -> bool {
        self.is_const
    }

    /// In-place access for aggregate mutation (element writes, `insert`, ...).
    ///
    /// Callers mutate the aggregate through its copy-on-write API and never
    /// replace the value wholesale; that goes through [`LValue::put`].
    #[inline]
    pub(crate) fn get_mut(&mut self) -> &mut Value {
        &mut self.value
    }
}

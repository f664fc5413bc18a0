//! Shared arrays.

use std::fmt;

use super::flat::FlatValue;
use super::view::{SliceError, SliceView};
use super::Value;
use crate::lvalue::LValue;

/// Array value: a copy-on-write buffer of element cells plus a slice view.
///
/// Slicing never copies; the slice aliases its parent's buffer until one of
/// them is written, at which point the writer takes a private copy (a slice
/// copies only its visible range).
#[derive(Clone, Default)]
pub struct FlatArray {
    buf: FlatValue<Vec<LValue>>,
    view: SliceView,
}

impl FlatArray {
    pub fn new(items: Vec<LValue>) -> Self {
        FlatArray {
            buf: FlatValue::new(items),
            view: SliceView::WHOLE,
        }
    }

    /// Array whose elements all carry the same const flag.
    pub fn from_values(values: impl IntoIterator<Item = Value>, is_const: bool) -> Self {
        FlatArray::new(
            values
                .into_iter()
                .map(|v| LValue::new(v, is_const))
                .collect(),
        )
    }

    /// Visible element count.
    #[inline]
    pub fn len(&self) -> usize {
        self.view.range(self.buf.len()).len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_slice(&self) -> bool {
        self.view.is_slice()
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.view.offset()
    }

    #[inline]
    pub fn use_count(&self) -> usize {
        self.buf.use_count()
    }

    /// Whether both arrays alias one backing buffer.
    #[inline]
    pub fn shares_buffer(&self, other: &FlatArray) -> bool {
        FlatValue::ptr_eq(&self.buf, &other.buf)
    }

    #[inline]
    pub fn buffer_addr(&self) -> usize {
        self.buf.addr()
    }

    /// The visible elements.
    #[inline]
    pub fn as_slice(&self) -> &[LValue] {
        &self.buf[self.view.range(self.buf.len())]
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&LValue> {
        self.as_slice().get(index)
    }

    /// Element values, sharing their payloads.
    pub fn values(&self) -> impl Iterator<Item = Value> + '_ {
        self.as_slice().iter().map(LValue::eval)
    }

    /// Zero-copy view of `[offset, offset + len)` of the visible elements.
    pub fn make_slice(&self, offset: usize, len: usize) -> Result<FlatArray, SliceError> {
        let view = self.view.narrow(self.buf.len(), offset, len)?;
        Ok(FlatArray {
            buf: self.buf.share(),
            view,
        })
    }

    /// Mutable element buffer, private to this array.
    ///
    /// A slice is first materialized into a buffer holding only its visible
    /// elements; a shared buffer is cloned.
    pub fn make_mut(&mut self) -> &mut Vec<LValue> {
        if self.view.is_slice() {
            tracing::trace!(
                offset = self.view.offset(),
                len = self.len(),
                "materializing array slice"
            );
            let items = self.as_slice().to_vec();
            self.buf = FlatValue::new(items);
            self.view = SliceView::WHOLE;
        }
        self.buf.make_mut()
    }

    /// Mutable access to one element. Out-of-range indices do not trigger a copy.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut LValue> {
        if index >= self.len() {
            return None;
        }
        self.make_mut().get_mut(index)
    }

    /// Copy of the visible elements in a fresh buffer.
    #[must_use]
    pub fn detached(&self) -> FlatArray {
        FlatArray::new(self.as_slice().to_vec())
    }
}

impl fmt::Debug for FlatArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice().iter().map(LValue::get)).finish()
    }
}

//! Shared strings.

use std::fmt;

use super::flat::FlatValue;
use super::view::{SliceError, SliceView};

/// Immutable string value with zero-copy slicing.
///
/// Offsets given to [`FlatStr::make_slice`] are byte offsets and must fall on
/// character boundaries; script-level indexing counts characters and goes
/// through [`FlatStr::slice_chars`].
#[derive(Clone)]
pub struct FlatStr {
    buf: FlatValue<str>,
    view: SliceView,
}

impl FlatStr {
    pub fn new(text: &str) -> Self {
        FlatStr::from_buffer(FlatValue::from(text))
    }

    pub fn from_buffer(buf: FlatValue<str>) -> Self {
        FlatStr {
            buf,
            view: SliceView::WHOLE,
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.buf[self.view.range(self.buf.len())]
    }

    /// Visible length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.view.range(self.buf.len()).len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visible length in characters.
    pub fn char_count(&self) -> usize {
        self.as_str().chars().count()
    }

    #[inline]
    pub fn is_slice(&self) -> bool {
        self.view.is_slice()
    }

    #[inline]
    pub fn use_count(&self) -> usize {
        self.buf.use_count()
    }

    #[inline]
    pub fn shares_buffer(&self, other: &FlatStr) -> bool {
        FlatValue::ptr_eq(&self.buf, &other.buf)
    }

    #[inline]
    pub fn buffer_addr(&self) -> usize {
        self.buf.addr()
    }

    /// Zero-copy view of bytes `[offset, offset + len)` of the visible text.
    pub fn make_slice(&self, offset: usize, len: usize) -> Result<FlatStr, SliceError> {
        let view = self.view.narrow(self.buf.len(), offset, len)?;
        let text = self.as_str();
        for bound in [offset, offset + len] {
            if !text.is_char_boundary(bound) {
                return Err(SliceError::NotCharBoundary(bound));
            }
        }
        Ok(FlatStr {
            buf: self.buf.share(),
            view,
        })
    }

    /// Zero-copy view of characters `[start, end)`.
    pub fn slice_chars(&self, start: usize, end: usize) -> Result<FlatStr, SliceError> {
        let text = self.as_str();
        let out_of_range = || SliceError::OutOfRange {
            offset: start,
            len: end.saturating_sub(start),
            size: self.char_count(),
        };
        if start > end {
            return Err(out_of_range());
        }
        let byte_at = |pos: usize| {
            text.char_indices()
                .map(|(i, _)| i)
                .chain(std::iter::once(text.len()))
                .nth(pos)
        };
        let from = byte_at(start).ok_or_else(out_of_range)?;
        let to = byte_at(end).ok_or_else(out_of_range)?;
        self.make_slice(from, to - from)
    }

    /// Each character as a one-character slice of this string.
    pub fn chars(&self) -> impl Iterator<Item = FlatStr> + '_ {
        self.as_str()
            .char_indices()
            .filter_map(move |(i, c)| self.make_slice(i, c.len_utf8()).ok())
    }
}

impl From<String> for FlatStr {
    fn from(text: String) -> Self {
        FlatStr::from_buffer(FlatValue::from(text))
    }
}

impl fmt::Debug for FlatStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for FlatStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

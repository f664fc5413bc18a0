//! Slice views over shared buffers.

use std::ops::Range;

/// Why a slice could not be taken.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SliceError {
    #[error("range {offset}..{offset}+{len} is outside 0..{size}")]
    OutOfRange { offset: usize, len: usize, size: usize },
    #[error("offset {0} is not on a character boundary")]
    NotCharBoundary(usize),
}

/// Visible window of a backing buffer.
///
/// A non-slice view sees the whole buffer, whatever its current length. A
/// slice sees exactly `[offset, offset + len)`; the buffer may be longer and
/// is shared with the parent value and sibling slices.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SliceView {
    offset: u32,
    len: u32,
    is_slice: bool,
}

impl SliceView {
    /// View of the whole buffer.
    pub const WHOLE: SliceView = SliceView {
        offset: 0,
        len: 0,
        is_slice: false,
    };

    #[inline]
    pub fn is_slice(self) -> bool {
        self.is_slice
    }

    /// Offset into the backing buffer, 0 for non-slices.
    #[inline]
    pub fn offset(self) -> usize {
        self.offset as usize
    }

    /// Visible range given the backing buffer's length.
    #[inline]
    pub fn range(self, backing_len: usize) -> Range<usize> {
        if self.is_slice {
            let start = self.offset as usize;
            start..start + self.len as usize
        } else {
            0..backing_len
        }
    }

    /// Sub-view `[offset, offset + len)` relative to this view.
    pub fn narrow(self, backing_len: usize, offset: usize, len: usize) -> Result<Self, SliceError> {
        let visible = self.range(backing_len);
        let out_of_range = SliceError::OutOfRange {
            offset,
            len,
            size: visible.len(),
        };
        let end = offset.checked_add(len).ok_or(out_of_range.clone())?;
        if end > visible.len() {
            return Err(out_of_range);
        }
        let abs_offset = u32::try_from(visible.start + offset).map_err(|_| out_of_range.clone())?;
        let len = u32::try_from(len).map_err(|_| out_of_range)?;
        Ok(SliceView {
            offset: abs_offset,
            len,
            is_slice: true,
        })
    }
}

//! Source location spans.

use std::fmt;

/// Byte range `[start, end)` in the source text.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[repr(C)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Span for synthesized nodes that have no source text.
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Length of the span in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn is_dummy(&self) -> bool {
        *self == Self::DUMMY
    }

    /// Smallest span covering both `self` and `other`.
    #[inline]
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::Span;
    crate::static_assert_size!(Span, 8);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_len_and_empty() {
        let span = Span::new(4, 9);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
        assert!(Span::DUMMY.is_dummy());
    }

    #[test]
    fn test_span_merge_covers_both() {
        let merged = Span::new(10, 12).merge(Span::new(3, 5));
        assert_eq!(merged, Span::new(3, 12));
    }

    #[test]
    fn test_span_display() {
        assert_eq!(Span::new(1, 7).to_string(), "1..7");
    }
}

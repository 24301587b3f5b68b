//! Spans over subject text.
//!
//! All positions are **character** (not byte) indices into the subject.

use std::fmt;

/// A half-open range `[start, end)` of character positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {start} past end {end}");
        Self { start, end }
    }

    /// An empty span sitting at `pos`.
    pub fn empty_at(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Test whether `other` lies entirely within this span.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Extract the covered text from `subject`.
    pub fn text(&self, subject: &str) -> String {
        subject.chars().skip(self.start).take(self.len()).collect()
    }

    /// Extract the covered characters from an already-split subject.
    pub fn slice<'a>(&self, chars: &'a [char]) -> &'a [char] {
        let end = self.end.min(chars.len());
        &chars[self.start.min(end)..end]
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

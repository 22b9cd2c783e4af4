//! Source location spans.
//!
//! HIR nodes keep line/column/offset on both ends so that diagnostics and the
//! binary cache can reproduce positions without the source text.

use std::fmt;

/// A position in a source file. Lines and columns are 1-based, offsets 0-based.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Debug)]
pub struct Location {
    pub line: u32,
    pub column: u32,
    pub offset: u32,
}

impl Location {
    #[inline]
    pub const fn new(line: u32, column: u32, offset: u32) -> Self {
        Location {
            line,
            column,
            offset,
        }
    }
}

/// Source location span.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Span {
    pub start: Location,
    pub end: Location,
}

impl Span {
    /// Dummy span for synthesized nodes.
    pub const DUMMY: Span = Span {
        start: Location::new(0, 0, 0),
        end: Location::new(0, 0, 0),
    };

    #[inline]
    pub const fn new(start: Location, end: Location) -> Self {
        Span { start, end }
    }

    /// Span covering a single line between two columns.
    #[inline]
    pub const fn on_line(line: u32, start_col: u32, end_col: u32) -> Self {
        Span {
            start: Location::new(line, start_col, 0),
            end: Location::new(line, end_col, 0),
        }
    }

    /// Length of the span in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.offset.saturating_sub(self.start.offset)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Merge two spans to create one covering both.
    #[inline]
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        let start = if other.start.offset < self.start.offset {
            other.start
        } else {
            self.start
        };
        let end = if other.end.offset > self.end.offset {
            other.end
        } else {
            self.end
        };
        Span { start, end }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}..{}:{}",
            self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}

//! Location support.

use std::fmt;

/// Human-facing location in an input: line and column, both starting at 1.
///
/// Columns count characters, not bytes. Tabs still count as a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    /// Finds the location of the byte offset `pos` in `input`.
    ///
    /// Offsets past the end are clamped to the end;
    /// offsets inside a multi-byte character are rounded down to its start.
    pub fn of(input: &str, pos: usize) -> Self {
        let mut end = pos.min(input.len());
        while !input.is_char_boundary(end) {
            end -= 1;
        }
        let before = &input[..end];
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        Location {
            line: before.matches('\n').count() + 1,
            column: before[line_start..].chars().count() + 1,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} column {}", self.line, self.column)
    }
}

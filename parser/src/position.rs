use alloc::sync::Arc;
use core::cmp::Ordering;
use core::fmt;

const TAB_WIDTH: u32 = 8;

/// A line/column cursor into a named source.
///
/// Positions are values: advancing produces a new position and never
/// touches the old one. Two positions compare equal when their line and
/// column agree, whatever their source names are.
#[derive(Debug, Clone)]
pub struct SourcePosition {
    name: Arc<str>,
    line: u32,
    column: u32,
}

impl SourcePosition {
    /// Lines and columns count from 1.
    pub fn new(name: &str, line: u32, column: u32) -> Self {
        debug_assert!(line >= 1 && column >= 1, "positions start at line 1, column 1");
        Self {
            name: Arc::from(name),
            line,
            column,
        }
    }

    /// Line 1, column 1 of `name`.
    pub fn initial(name: &str) -> Self {
        Self::new(name, 1, 1)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    /// The position after `c`.
    ///
    /// A newline moves to the next line and leaves the column alone, a tab
    /// jumps to the next tab stop (every 8 columns), anything else moves one
    /// column right.
    pub fn advance(&self, c: char) -> Self {
        let (line, column) = match c {
            '\n' => (self.line + 1, self.column),
            '\t' => (
                self.line,
                self.column + TAB_WIDTH - ((self.column - 1) % TAB_WIDTH),
            ),
            _ => (self.line, self.column + 1),
        };
        Self {
            name: self.name.clone(),
            line,
            column,
        }
    }

    pub fn advance_str(&self, s: &str) -> Self {
        s.chars().fold(self.clone(), |pos, c| pos.advance(c))
    }
}

impl PartialEq for SourcePosition {
    fn eq(&self, other: &Self) -> bool {
        self.line == other.line && self.column == other.column
    }
}

impl Eq for SourcePosition {}

impl PartialOrd for SourcePosition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SourcePosition {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.line, self.column).cmp(&(other.line, other.column))
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.name.is_empty() {
            write!(f, "{:?} ", self.name())?;
        }
        write!(f, "(line {}, column {})", self.line, self.column)
    }
}

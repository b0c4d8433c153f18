use std::fmt;

/// A position in source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Location {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed, in characters)
    pub column: usize,
    /// Byte offset from start of file
    pub offset: usize,
}

impl Location {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }

    /// Location of the first byte of a file
    pub fn start() -> Self {
        Self { line: 1, column: 1, offset: 0 }
    }

    /// The location `n` single-byte characters further along the same line
    pub fn shifted(self, n: usize) -> Self {
        Self {
            line: self.line,
            column: self.column + n,
            offset: self.offset + n,
        }
    }

    pub fn to(&self, end: Location) -> Span {
        Span::new(*self, end)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open range of source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Start location (inclusive)
    pub start: Location,
    /// End location (exclusive)
    pub end: Location,
}

impl Span {
    pub fn new(start: Location, end: Location) -> Self {
        debug_assert!(start.offset <= end.offset, "span start after end");
        Self { start, end }
    }

    /// An empty span at `location`
    pub fn single(location: Location) -> Self {
        Self { start: location, end: location }
    }

    /// Length of the span in bytes
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    /// Grow the span so that it also covers `other`
    pub fn extend(&mut self, other: Span) {
        if other.start.offset < self.start.offset {
            self.start = other.start;
        }
        if other.end.offset > self.end.offset {
            self.end = other.end;
        }
    }

    /// Smallest span covering both
    pub fn merge(self, other: Span) -> Span {
        let mut merged = self;
        merged.extend(other);
        merged
    }

    pub fn contains(&self, location: Location) -> bool {
        location.offset >= self.start.offset && location.offset < self.end.offset
    }

    /// Whether `other` lies entirely within this span
    pub fn encloses(&self, other: Span) -> bool {
        self.start.offset <= other.start.offset && other.end.offset <= self.end.offset
    }

    /// The slice of `source` this span covers
    pub fn source_text<'a>(&self, source: &'a str) -> &'a str {
        if self.start.offset >= source.len() {
            return "";
        }
        let end_offset = self.end.offset.min(source.len());
        &source[self.start.offset..end_offset]
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            if self.start.column == self.end.column {
                write!(f, "{}:{}", self.start.line, self.start.column)
            } else {
                write!(f, "{}:{}-{}", self.start.line, self.start.column, self.end.column)
            }
        } else {
            write!(f, "{}:{}-{}:{}", self.start.line, self.start.column, self.end.line, self.end.column)
        }
    }
}

/// Anything that occupies a range of source code
pub trait HasSpan {
    fn span(&self) -> Span;
}

impl HasSpan for Span {
    fn span(&self) -> Span {
        *self
    }
}

/// Maps byte offsets to line/column locations.
#[derive(Debug, Clone)]
pub struct LineMap {
    line_starts: Vec<usize>,
}

impl LineMap {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    pub fn location(&self, source: &str, offset: usize) -> Location {
        let line_index = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let line_start = self.line_starts[line_index];
        let end = offset.min(source.len());
        let column = source
            .get(line_start..end)
            .map(|s| s.chars().count())
            .unwrap_or(end - line_start)
            + 1;
        Location::new(line_index + 1, column, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_map_tracks_lines_and_columns() {
        let source = "ab\ncd\n\nef";
        let map = LineMap::new(source);
        assert_eq!(map.location(source, 0), Location::new(1, 1, 0));
        assert_eq!(map.location(source, 4), Location::new(2, 2, 4));
        assert_eq!(map.location(source, 6), Location::new(3, 1, 6));
        assert_eq!(map.location(source, 8), Location::new(4, 2, 8));
    }

    #[test]
    fn merge_covers_both_spans() {
        let a = Span::new(Location::new(1, 1, 0), Location::new(1, 3, 2));
        let b = Span::new(Location::new(1, 5, 4), Location::new(1, 9, 8));
        let merged = a.merge(b);
        assert_eq!(merged.start.offset, 0);
        assert_eq!(merged.end.offset, 8);
        assert!(merged.encloses(a));
        assert!(merged.encloses(b));
        assert!(!a.encloses(merged));
    }
}

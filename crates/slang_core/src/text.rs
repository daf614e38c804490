//! Source text, spans and line positions.
//!
//! Every token, syntax node and diagnostic refers back to the source through
//! a [`TextSpan`] (byte offsets) and, for humans, a [`LinePosition`].

use std::fmt;
use std::ops::Range;
use std::path::Path;

use thiserror::Error;

/// A position in source text, measured as a byte offset from the start.
pub type TextPos = u32;

/// A span in source text, defined by a start position and a length.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct TextSpan {
    /// The byte offset where this span starts.
    pub start: TextPos,
    /// The length of this span in bytes.
    pub length: TextPos,
}

impl TextSpan {
    #[inline]
    pub fn new(start: TextPos, length: TextPos) -> Self {
        Self { start, length }
    }

    /// Create a span from start and end positions.
    #[inline]
    pub fn from_bounds(start: TextPos, end: TextPos) -> Self {
        debug_assert!(end >= start);
        Self {
            start,
            length: end - start,
        }
    }

    /// Create an empty span at a position.
    #[inline]
    pub fn empty(pos: TextPos) -> Self {
        Self {
            start: pos,
            length: 0,
        }
    }

    /// The end position of this span (exclusive).
    #[inline]
    pub fn end(&self) -> TextPos {
        self.start + self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    #[inline]
    pub fn contains(&self, pos: TextPos) -> bool {
        pos >= self.start && pos < self.end()
    }

    /// Convert to a byte range.
    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.start as usize..self.end() as usize
    }

    /// Return a new span covering both this span and the other.
    pub fn union(&self, other: &TextSpan) -> TextSpan {
        let start = self.start.min(other.start);
        let end = self.end().max(other.end());
        TextSpan::from_bounds(start, end)
    }
}

impl fmt::Debug for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}

/// A 0-based line and column. Columns count characters, not bytes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct LinePosition {
    pub line: u32,
    pub column: u32,
}

impl LinePosition {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Renders 1-based, the way editors number lines.
impl fmt::Display for LinePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// Whether `c` terminates a line: CR, LF, NEL, LS or PS.
#[inline]
pub fn is_line_break(c: char) -> bool {
    matches!(c, '\r' | '\n' | '\u{0085}' | '\u{2028}' | '\u{2029}')
}

/// Byte offsets of the start of every line.
///
/// CRLF counts as a single break.
#[derive(Debug, Clone)]
pub struct LineMap {
    line_starts: Vec<TextPos>,
}

impl LineMap {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        let mut chars = text.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            if !is_line_break(c) {
                continue;
            }
            let mut next = i + c.len_utf8();
            if c == '\r' {
                if let Some(&(j, '\n')) = chars.peek() {
                    chars.next();
                    next = j + 1;
                }
            }
            line_starts.push(next as TextPos);
        }
        Self { line_starts }
    }

    /// Get the line number (0-based) for a byte offset.
    pub fn line_of(&self, pos: TextPos) -> u32 {
        match self.line_starts.binary_search(&pos) {
            Ok(line) => line as u32,
            Err(line) => (line - 1) as u32,
        }
    }

    /// Get the byte offset of the start of a line.
    pub fn line_start(&self, line: u32) -> TextPos {
        self.line_starts[line as usize]
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// Errors raised while loading a [`SourceText`] from disk.
#[derive(Debug, Error)]
pub enum SourceTextError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("'{path}' is not valid UTF-8")]
    InvalidUtf8 { path: String },
    #[error("'{path}' looks like a binary file")]
    Binary { path: String },
}

/// Immutable program text together with the name it came from.
///
/// The line map is computed once at construction so that diagnostics can be
/// positioned without rescanning the text.
#[derive(Debug, Clone)]
pub struct SourceText {
    name: String,
    text: String,
    lines: LineMap,
}

impl SourceText {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let lines = LineMap::new(&text);
        Self {
            name: name.into(),
            text,
            lines,
        }
    }

    /// Read a UTF-8 file. Files containing two consecutive NUL characters are
    /// rejected as binary.
    pub fn from_file(path: &Path) -> Result<Self, SourceTextError> {
        let display = path.display().to_string();
        let bytes = std::fs::read(path).map_err(|source| SourceTextError::Io {
            path: display.clone(),
            source,
        })?;
        let text = String::from_utf8(bytes)
            .map_err(|_| SourceTextError::InvalidUtf8 { path: display.clone() })?;
        if text.contains("\0\0") {
            return Err(SourceTextError::Binary { path: display });
        }
        Ok(Self::new(display, text))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The text covered by `span`, clamped to the end of the source.
    pub fn slice(&self, span: TextSpan) -> &str {
        let end = (span.end() as usize).min(self.text.len());
        let start = (span.start as usize).min(end);
        &self.text[start..end]
    }

    pub fn line_position(&self, pos: TextPos) -> LinePosition {
        let pos = pos.min(self.text.len() as TextPos);
        let line = self.lines.line_of(pos);
        let start = self.lines.line_start(line) as usize;
        let column = self.text[start..pos as usize].chars().count() as u32;
        LinePosition { line, column }
    }

    pub fn line_count(&self) -> usize {
        self.lines.line_count()
    }

    /// The text of a 0-based line, without its terminator.
    pub fn line_text(&self, line: u32) -> &str {
        if line as usize >= self.lines.line_count() {
            return "";
        }
        let start = self.lines.line_start(line) as usize;
        let rest = &self.text[start..];
        let end = rest.find(is_line_break).unwrap_or(rest.len());
        &rest[..end]
    }
}

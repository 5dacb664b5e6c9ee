//! Conversion between byte offsets and LSP positions
//!
//! LSP positions count UTF-16 code units within a line. Out-of-range positions
//! are clamped to the end of their line (or of the document) rather than
//! rejected, which matches how editors expect lagging positions to behave.

use tower_lsp::lsp_types::{Position, Range};

use crate::parser::Span;

/// Line start table over a borrowed text
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { text, line_starts }
    }

    /// Byte offset for an LSP position
    pub fn offset(&self, position: Position) -> usize {
        let line = position.line as usize;
        let Some(&line_start) = self.line_starts.get(line) else {
            return self.text.len();
        };
        let line_end = self
            .line_starts
            .get(line + 1)
            .map_or(self.text.len(), |next| next - 1);

        let mut units = 0u32;
        for (i, ch) in self.text[line_start..line_end].char_indices() {
            if units >= position.character {
                return line_start + i;
            }
            units += ch.len_utf16() as u32;
        }
        line_end
    }

    /// LSP position for a byte offset
    pub fn position(&self, offset: usize) -> Position {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }

        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[line];
        let character = self.text[line_start..offset].encode_utf16().count();

        Position {
            line: line as u32,
            character: character as u32,
        }
    }

    pub fn range(&self, span: Span) -> Range {
        Range {
            start: self.position(span.start),
            end: self.position(span.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_to_position() {
        let text = "line1\nline2\nline3";
        let index = LineIndex::new(text);
        assert_eq!(index.position(0), Position::new(0, 0));
        assert_eq!(index.position(5), Position::new(0, 5));
        assert_eq!(index.position(6), Position::new(1, 0));
        assert_eq!(index.position(10), Position::new(1, 4));
        assert_eq!(index.position(100), Position::new(2, 5));
    }

    #[test]
    fn test_position_to_offset() {
        let text = "line1\nline2\nline3";
        let index = LineIndex::new(text);
        assert_eq!(index.offset(Position::new(0, 0)), 0);
        assert_eq!(index.offset(Position::new(1, 4)), 10);
        assert_eq!(index.offset(Position::new(2, 5)), 17);
    }

    #[test]
    fn test_clamps_past_line_end() {
        let text = "ab\ncd";
        let index = LineIndex::new(text);
        assert_eq!(index.offset(Position::new(0, 40)), 2);
        assert_eq!(index.offset(Position::new(9, 0)), text.len());
    }

    #[test]
    fn test_utf16_columns() {
        // 'é' is one UTF-16 unit but two bytes; '😀' is two units and four bytes
        let text = "é😀x";
        let index = LineIndex::new(text);
        assert_eq!(index.offset(Position::new(0, 1)), 2);
        assert_eq!(index.offset(Position::new(0, 3)), 6);
        assert_eq!(index.position(6), Position::new(0, 3));
    }

    #[test]
    fn test_trailing_newline_counts_as_line() {
        let index = LineIndex::new("a\n");
        assert_eq!(index.offset(Position::new(1, 0)), 2);
        assert_eq!(index.position(2), Position::new(1, 0));
    }
}

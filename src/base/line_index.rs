//! Byte offset to line/column conversion.

use text_size::{TextRange, TextSize};

use super::{Position, Span};

/// Maps byte offsets of a source text to 0-indexed line/column positions.
///
/// Columns are counted in bytes from the start of the line, matching the
/// offsets rowan reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Offset of the first byte of every line
    line_starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    /// Offsets are `u32` as in rowan; text past `u32::MAX` bytes is not indexed.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                let Some(start) = text_size(offset + 1) else {
                    break;
                };
                line_starts.push(start);
            }
        }
        Self {
            line_starts,
            len: text_size(text.len()).unwrap_or(TextSize::from(u32::MAX)),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Position of `offset`; offsets past the end clamp to the end of the text.
    pub fn position(&self, offset: TextSize) -> Position {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let column = u32::from(offset - self.line_starts[line]) as usize;
        Position::new(line, column)
    }

    pub fn span(&self, range: TextRange) -> Span {
        Span::new(self.position(range.start()), self.position(range.end()))
    }
}

fn text_size(offset: usize) -> Option<TextSize> {
    TextSize::try_from(offset).ok()
}

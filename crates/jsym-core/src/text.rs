//! Byte ranges and line/column lookup over a source snapshot.

pub use text_size::{TextRange, TextSize};

/// Zero-based line and byte column.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// Line start offsets of one text snapshot.
///
/// `\n`, `\r\n` and a lone `\r` all terminate a line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LineIndex {
    starts: Vec<TextSize>,
    ends: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut starts = vec![TextSize::from(0)];
        let mut ends = Vec::new();

        let mut i = 0;
        while i < bytes.len() {
            let terminator = match bytes[i] {
                b'\n' => 1,
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => 2,
                b'\r' => 1,
                _ => {
                    i += 1;
                    continue;
                }
            };
            ends.push(TextSize::from(i as u32));
            i += terminator;
            starts.push(TextSize::from(i as u32));
        }
        ends.push(TextSize::from(text.len() as u32));

        Self {
            starts,
            ends,
            len: TextSize::from(text.len() as u32),
        }
    }

    #[inline]
    pub fn line_count(&self) -> u32 {
        self.starts.len() as u32
    }

    #[inline]
    pub fn line_start(&self, line: u32) -> Option<TextSize> {
        self.starts.get(line as usize).copied()
    }

    /// Offset of the line terminator (or end of text) of `line`.
    #[inline]
    pub fn line_end(&self, line: u32) -> Option<TextSize> {
        self.ends.get(line as usize).copied()
    }

    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len);
        let line = match self.starts.binary_search(&offset) {
            Ok(line) => line,
            Err(insert) => insert.saturating_sub(1),
        };
        let col = offset.min(self.ends[line]) - self.starts[line];
        LineCol {
            line: line as u32,
            col: u32::from(col),
        }
    }

    /// Byte offset of a line/column pair, `None` when it lies outside the text.
    pub fn offset(&self, line_col: LineCol) -> Option<TextSize> {
        let start = self.line_start(line_col.line)?;
        let end = self.line_end(line_col.line)?;
        let offset = start + TextSize::from(line_col.col);
        (offset <= end).then_some(offset)
    }

    /// Leading whitespace of the line containing `offset`.
    pub fn indentation<'a>(&self, text: &'a str, offset: TextSize) -> &'a str {
        let line = self.line_col(offset).line;
        let start = u32::from(self.starts[line as usize]) as usize;
        let end = u32::from(self.ends[line as usize]) as usize;
        let line_text = &text[start..end];
        let trimmed = line_text.trim_start_matches([' ', '\t']);
        &line_text[..line_text.len() - trimmed.len()]
    }
}

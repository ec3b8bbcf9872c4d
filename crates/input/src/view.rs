//! Render-ready projections of a [`TextBuffer`].

use crate::buffer::TextBuffer;

/// Lines of a buffer clipped to a visible height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferView<'a> {
    /// Visible lines, at most `max_height` of them.
    pub lines: Vec<&'a str>,
    /// Number of lines cut off below the visible region.
    pub hidden_lines: usize,
    /// Zero-based cursor row.
    pub cursor_row: usize,
    /// Zero-based cursor column.
    pub cursor_col: usize,
    /// Total number of lines in the buffer.
    pub total_lines: usize,
    /// Total number of characters in the buffer.
    pub char_count: usize,
}

/// The cursor line split around the cursor cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorLine<'a> {
    pub before: &'a str,
    /// Character under the cursor, or a space past the line end.
    pub at: char,
    pub after: &'a str,
}

impl<'a> BufferView<'a> {
    /// Projects `buffer` onto at most `max_height` visible lines.
    pub fn new(buffer: &'a TextBuffer, max_height: usize) -> Self {
        let all = buffer.lines();
        let total_lines = all.len();
        let hidden_lines = total_lines.saturating_sub(max_height);
        let lines = all.into_iter().take(max_height).collect();
        let (cursor_row, cursor_col) = buffer.cursor_location();
        Self {
            lines,
            hidden_lines,
            cursor_row,
            cursor_col,
            total_lines,
            char_count: buffer.len(),
        }
    }

    /// Returns `true` when the cursor row falls inside the visible lines.
    pub fn cursor_visible(&self) -> bool {
        self.cursor_row < self.lines.len()
    }

    /// Splits the visible cursor line around the cursor cell.
    pub fn cursor_line(&self) -> Option<CursorLine<'a>> {
        let line = *self.lines.get(self.cursor_row)?;
        let split = line
            .char_indices()
            .nth(self.cursor_col)
            .map_or(line.len(), |(i, _)| i);
        let (before, rest) = line.split_at(split);
        let mut rest_chars = rest.chars();
        let at = rest_chars.next().unwrap_or(' ');
        Some(CursorLine {
            before,
            at,
            after: rest_chars.as_str(),
        })
    }

    /// `"... N more lines"` when lines were clipped.
    pub fn overflow_text(&self) -> Option<String> {
        (self.hidden_lines > 0).then(|| format!("... {} more lines", self.hidden_lines))
    }

    /// `"Line r, Col c • n lines • m chars"`; the trailing parts only when relevant.
    pub fn status_text(&self) -> String {
        let mut out = format!("Line {}, Col {}", self.cursor_row + 1, self.cursor_col + 1);
        if self.total_lines > 1 {
            out.push_str(&format!(" • {} lines", self.total_lines));
        }
        if self.char_count > 0 {
            out.push_str(&format!(" • {} chars", self.char_count));
        }
        out
    }
}

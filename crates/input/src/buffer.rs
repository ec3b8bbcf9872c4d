//! Cursor-addressed editable text.
//!
//! Offsets are measured in characters, not bytes; the cursor always satisfies
//! `0 <= cursor <= len()`.

/// Direction for [`TextBuffer::move_vertical`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    Up,
    Down,
}

/// Editable content plus cursor offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    content: String,
    cursor: usize,
    disabled: bool,
}

impl TextBuffer {
    /// Creates an empty buffer with the cursor at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a buffer holding `content` with the cursor clamped into range.
    pub fn with_content(content: impl Into<String>, cursor: usize) -> Self {
        let content = content.into();
        let cursor = cursor.min(content.chars().count());
        Self {
            content,
            cursor,
            disabled: false,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Disabled buffers ignore every mutation.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Returns `true` when the content contains a line break.
    pub fn is_multiline(&self) -> bool {
        self.content.contains('\n')
    }

    /// Splices `text` at the cursor and advances past it.
    pub fn insert(&mut self, text: &str) -> bool {
        if self.disabled || text.is_empty() {
            return false;
        }
        let at = self.byte_offset(self.cursor);
        self.content.insert_str(at, text);
        self.cursor += text.chars().count();
        true
    }

    /// Removes the character before the cursor.
    pub fn delete_backward(&mut self) -> bool {
        if self.disabled || self.cursor == 0 {
            return false;
        }
        let start = self.byte_offset(self.cursor - 1);
        let end = self.byte_offset(self.cursor);
        self.content.replace_range(start..end, "");
        self.cursor -= 1;
        true
    }

    /// Removes the character at the cursor; the cursor stays put.
    pub fn delete_forward(&mut self) -> bool {
        if self.disabled || self.cursor >= self.len() {
            return false;
        }
        let start = self.byte_offset(self.cursor);
        let end = self.byte_offset(self.cursor + 1);
        self.content.replace_range(start..end, "");
        true
    }

    /// Moves the cursor to `target`, clamped to `[0, len]`.
    pub fn move_cursor(&mut self, target: isize) -> bool {
        if self.disabled {
            return false;
        }
        let clamped = usize::try_from(target).unwrap_or(0).min(self.len());
        let moved = clamped != self.cursor;
        self.cursor = clamped;
        moved
    }

    /// Moves the cursor `delta` characters, clamped to the buffer.
    pub fn move_by(&mut self, delta: isize) -> bool {
        let current = isize::try_from(self.cursor).unwrap_or(isize::MAX);
        self.move_cursor(current.saturating_add(delta))
    }

    /// Moves to the adjacent line, keeping the column where the target line
    /// is long enough and clamping to its end otherwise.
    pub fn move_vertical(&mut self, direction: Vertical) -> bool {
        if self.disabled {
            return false;
        }
        let chars: Vec<char> = self.content.chars().collect();
        let len = chars.len();
        let cursor = self.cursor;

        let line_start = chars[..cursor]
            .iter()
            .rposition(|&c| c == '\n')
            .map_or(0, |i| i + 1);
        let line_end = chars[cursor..]
            .iter()
            .position(|&c| c == '\n')
            .map_or(len, |i| cursor + i);
        let column = cursor - line_start;

        let target = match direction {
            Vertical::Up => {
                if line_start == 0 {
                    return false;
                }
                let prev_end = line_start - 1;
                let prev_start = chars[..prev_end]
                    .iter()
                    .rposition(|&c| c == '\n')
                    .map_or(0, |i| i + 1);
                prev_start + column.min(prev_end - prev_start)
            }
            Vertical::Down => {
                if line_end == len {
                    return false;
                }
                let next_start = line_end + 1;
                let next_end = chars[next_start..]
                    .iter()
                    .position(|&c| c == '\n')
                    .map_or(len, |i| next_start + i);
                next_start + column.min(next_end - next_start)
            }
        };

        let moved = target != self.cursor;
        self.cursor = target;
        moved
    }

    /// Emits the trimmed content and clears the buffer; all-whitespace
    /// content is left untouched and nothing is emitted.
    pub fn submit(&mut self) -> Option<String> {
        if self.disabled {
            return None;
        }
        let trimmed = self.content.trim();
        if trimmed.is_empty() {
            return None;
        }
        let submitted = trimmed.to_string();
        self.clear();
        Some(submitted)
    }

    /// Resets content and cursor.
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// `(row, col)` of the cursor, both zero-based.
    pub fn cursor_location(&self) -> (usize, usize) {
        let mut row = 0;
        let mut col = 0;
        for c in self.content.chars().take(self.cursor) {
            if c == '\n' {
                row += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        (row, col)
    }

    /// Content split on line breaks; an empty buffer has one empty line.
    pub fn lines(&self) -> Vec<&str> {
        self.content.split('\n').collect()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map_or(self.content.len(), |(i, _)| i)
    }
}

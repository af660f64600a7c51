//! Multi-line text buffer with a byte-indexed cursor.

#[derive(Debug, Default)]
pub struct InputBuffer {
    content: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the content and move the cursor to the end.
    pub fn set(&mut self, text: &str) {
        self.content = text.to_string();
        self.cursor = self.content.len();
    }

    pub fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.prev_boundary();
            self.content.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.content.len() {
            let next = self.next_boundary();
            self.content.drain(self.cursor..next);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    pub fn move_right(&mut self) {
        self.cursor = self.next_boundary();
    }

    /// Start of the current line.
    pub fn move_home(&mut self) {
        self.cursor = self.line_start();
    }

    /// End of the current line.
    pub fn move_end(&mut self) {
        self.cursor = self.content[self.cursor..]
            .find('\n')
            .map(|i| self.cursor + i)
            .unwrap_or(self.content.len());
    }

    pub fn move_up(&mut self) {
        let (line, col) = self.cursor_line_col();
        if line > 0 {
            self.cursor = self.offset_of(line - 1, col);
        }
    }

    pub fn move_down(&mut self) {
        let (line, col) = self.cursor_line_col();
        if line + 1 < self.line_count() {
            self.cursor = self.offset_of(line + 1, col);
        }
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Take the content out, resetting the buffer.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.content)
    }

    /// Whitespace-only counts as empty.
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn text(&self) -> &str {
        &self.content
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    pub fn line_count(&self) -> usize {
        self.content.split('\n').count()
    }

    /// Zero-based line and column (in chars) of the cursor.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let before = &self.content[..self.cursor];
        let line = before.matches('\n').count();
        let col = before[self.line_start()..].chars().count();
        (line, col)
    }

    fn line_start(&self) -> usize {
        self.content[..self.cursor].rfind('\n').map(|i| i + 1).unwrap_or(0)
    }

    /// Byte offset of `col` on `line`, clamped to the line's length.
    fn offset_of(&self, line: usize, col: usize) -> usize {
        let mut start = 0;
        for (idx, text) in self.content.split('\n').enumerate() {
            if idx == line {
                return start
                    + text
                        .char_indices()
                        .nth(col)
                        .map(|(i, _)| i)
                        .unwrap_or(text.len());
            }
            start += text.len() + 1;
        }
        self.content.len()
    }

    fn prev_boundary(&self) -> usize {
        self.content[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.content[self.cursor..]
            .char_indices()
            .nth(1)
            .map(|(i, _)| self.cursor + i)
            .unwrap_or(self.content.len())
    }
}

/// Editable line buffer with a (row, col) cursor.
///
/// Columns are measured in characters; vertical movement clamps the column
/// to the target line's length.
#[derive(Debug, Clone)]
pub struct EditBuffer {
    lines: Vec<String>,
    row: usize,
    col: usize,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
        }
    }

    /// Load content, resetting the cursor to the top
    pub fn from_content(content: &str) -> Self {
        let mut lines: Vec<String> = content.lines().map(String::from).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self { lines, row: 0, col: 0 }
    }

    /// Rebuild the full text of the buffer
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(|s| s.as_str())
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Get current cursor position as (row, col)
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn current_line(&self) -> &str {
        &self.lines[self.row]
    }

    /// Lines 0..=row joined with newlines: the program as if it ended there
    pub fn prefix_through(&self, row: usize) -> String {
        let end = row.min(self.lines.len() - 1);
        self.lines[..=end].join("\n")
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map(|l| l.chars().count()).unwrap_or(0)
    }

    // Cursor movement methods

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            // Move to end of previous line
            self.row -= 1;
            self.col = self.line_len(self.row);
        }
    }

    pub fn move_right(&mut self) {
        if self.col < self.line_len(self.row) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            // Move to start of next line
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_to_line_start(&mut self) {
        self.col = 0;
    }

    pub fn move_to_line_end(&mut self) {
        self.col = self.line_len(self.row);
    }

    pub fn move_to_top(&mut self) {
        self.row = 0;
        self.col = 0;
    }

    pub fn move_to_bottom(&mut self) {
        self.row = self.lines.len() - 1;
        self.col = 0;
    }

    // Editing methods

    pub fn insert_char(&mut self, c: char) {
        let idx = byte_index(&self.lines[self.row], self.col);
        self.lines[self.row].insert(idx, c);
        self.col += 1;
    }

    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars() {
            self.insert_char(c);
        }
    }

    /// Split the current line at the cursor
    pub fn insert_newline(&mut self) {
        let idx = byte_index(&self.lines[self.row], self.col);
        let rest = self.lines[self.row].split_off(idx);
        self.lines.insert(self.row + 1, rest);
        self.row += 1;
        self.col = 0;
    }

    /// Delete the character before the cursor, joining lines at column 0
    pub fn backspace(&mut self) {
        if self.col > 0 {
            let idx = byte_index(&self.lines[self.row], self.col - 1);
            self.lines[self.row].remove(idx);
            self.col -= 1;
        } else if self.row > 0 {
            let removed = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_len(self.row);
            self.lines[self.row].push_str(&removed);
        }
    }

    /// Delete the character under the cursor, joining lines at line end
    pub fn delete_forward(&mut self) {
        if self.col < self.line_len(self.row) {
            let idx = byte_index(&self.lines[self.row], self.col);
            self.lines[self.row].remove(idx);
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
        }
    }
}

impl Default for EditBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Byte offset of a character column, clamped to the end of the line
fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_movement() {
        let mut buf = EditBuffer::from_content("Hello\nWorld\nTest");

        assert_eq!(buf.cursor(), (0, 0));

        buf.move_down();
        assert_eq!(buf.cursor(), (1, 0));

        buf.move_right();
        buf.move_right();
        assert_eq!(buf.cursor(), (1, 2));

        buf.move_up();
        assert_eq!(buf.cursor(), (0, 2));
    }

    #[test]
    fn test_vertical_move_clamps_column() {
        let mut buf = EditBuffer::from_content("long line here\nhi");
        buf.move_to_line_end();
        assert_eq!(buf.cursor(), (0, 14));

        buf.move_down();
        assert_eq!(buf.cursor(), (1, 2));
    }

    #[test]
    fn test_horizontal_move_wraps_lines() {
        let mut buf = EditBuffer::from_content("ab\ncd");
        buf.move_to_line_end();
        buf.move_right();
        assert_eq!(buf.cursor(), (1, 0));

        buf.move_left();
        assert_eq!(buf.cursor(), (0, 2));
    }

    #[test]
    fn test_insert_and_backspace() {
        let mut buf = EditBuffer::new();
        buf.insert_str("print(x)");
        assert_eq!(buf.content(), "print(x)");
        assert_eq!(buf.cursor(), (0, 8));

        buf.backspace();
        assert_eq!(buf.content(), "print(x");

        buf.insert_char(')');
        assert_eq!(buf.content(), "print(x)");
    }

    #[test]
    fn test_newline_splits_line() {
        let mut buf = EditBuffer::from_content("abcd");
        buf.move_right();
        buf.move_right();
        buf.insert_newline();

        assert_eq!(buf.content(), "ab\ncd");
        assert_eq!(buf.cursor(), (1, 0));
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut buf = EditBuffer::from_content("ab\ncd");
        buf.move_down();
        buf.backspace();

        assert_eq!(buf.content(), "abcd");
        assert_eq!(buf.cursor(), (0, 2));
    }

    #[test]
    fn test_delete_forward_joins_lines() {
        let mut buf = EditBuffer::from_content("ab\ncd");
        buf.move_to_line_end();
        buf.delete_forward();

        assert_eq!(buf.content(), "abcd");
    }

    #[test]
    fn test_prefix_through() {
        let buf = EditBuffer::from_content("x = 1\nprint(x)\nprint(y)");

        assert_eq!(buf.prefix_through(0), "x = 1");
        assert_eq!(buf.prefix_through(1), "x = 1\nprint(x)");
        // Clamped to the last line
        assert_eq!(buf.prefix_through(10), "x = 1\nprint(x)\nprint(y)");
    }

    #[test]
    fn test_empty_content_has_one_line() {
        let buf = EditBuffer::from_content("");
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.current_line(), "");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut buf = EditBuffer::from_content("héllo");
        buf.move_right();
        buf.move_right();
        buf.backspace();
        assert_eq!(buf.content(), "hllo");
    }
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Single-line edit buffer with a cursor counted in characters, not bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn insert(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.text, self.cursor);
        self.text.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Take the text out, leaving the buffer empty
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(s: &str) -> InputBuffer {
        let mut buf = InputBuffer::new();
        for c in s.chars() {
            buf.insert(c);
        }
        buf
    }

    #[test]
    fn test_insert_at_cursor() {
        let mut buf = typed("helo");
        buf.move_left();
        buf.insert('l');
        assert_eq!(buf.as_str(), "hello");
        assert_eq!(buf.cursor(), 4);
    }

    #[test]
    fn test_multibyte_editing() {
        let mut buf = typed("fiebre ñ");
        buf.backspace();
        assert_eq!(buf.as_str(), "fiebre ");
        buf.insert('é');
        buf.move_home();
        buf.delete();
        assert_eq!(buf.as_str(), "iebre é");
        buf.move_end();
        assert_eq!(buf.cursor(), 7);
    }

    #[test]
    fn test_cursor_bounds() {
        let mut buf = typed("ab");
        buf.move_right();
        assert_eq!(buf.cursor(), 2);
        buf.move_home();
        buf.move_left();
        assert_eq!(buf.cursor(), 0);
        buf.backspace();
        assert_eq!(buf.as_str(), "ab");
    }

    #[test]
    fn test_take_resets() {
        let mut buf = typed("question");
        assert_eq!(buf.take(), "question");
        assert_eq!(buf.as_str(), "");
        assert_eq!(buf.cursor(), 0);
    }

    #[test]
    fn test_blank() {
        assert!(typed("  \t").is_blank());
        assert!(!typed(" x ").is_blank());
    }
}

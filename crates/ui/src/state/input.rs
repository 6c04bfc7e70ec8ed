/// Rows the input grows to before it scrolls.
pub const MAX_INPUT_ROWS: u16 = 6;

/// State for the input composer
///
/// The cursor is a char index. Text past `max_len` chars is cut in place and
/// `overflowed` stays set until the buffer is back under the limit.
#[derive(Debug, Clone)]
pub struct InputState {
    pub buffer: String,
    pub cursor: usize,
    max_len: usize,
    overflowed: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(2000)
    }
}

impl InputState {
    pub fn new(max_len: usize) -> Self {
        Self { buffer: String::new(), cursor: 0, max_len, overflowed: false }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// True when the last edit hit the limit.
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// `n/max` shown beside the input.
    pub fn counter_text(&self) -> String {
        format!("{}/{}", self.char_count(), self.max_len)
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.buffer.char_indices().nth(char_index).map(|(i, _)| i).unwrap_or(self.buffer.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
        self.enforce_limit();
    }

    pub fn insert_str(&mut self, text: &str) {
        let at = self.byte_index(self.cursor);
        self.buffer.insert_str(at, text);
        self.cursor += text.chars().count();
        self.enforce_limit();
    }

    pub fn newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.buffer.remove(at);
            self.refresh_overflow();
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_index(self.cursor);
            self.buffer.remove(at);
            self.refresh_overflow();
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.overflowed = false;
    }

    /// Take the buffer, leaving the input empty.
    pub fn take(&mut self) -> String {
        let text = std::mem::take(&mut self.buffer);
        self.clear();
        text
    }

    /// Replace the contents, as when editing an earlier message.
    pub fn load(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.enforce_limit();
        self.move_end();
    }

    /// Append a template, on its own line when the input already has text.
    pub fn insert_template(&mut self, template: &str) {
        self.move_end();
        if !self.buffer.is_empty() {
            self.newline();
        }
        self.insert_str(template);
    }

    /// Wrapped line count at `width`, capped at [`MAX_INPUT_ROWS`].
    pub fn visible_rows(&self, width: u16) -> u16 {
        let width = usize::from(width.max(1));
        let rows: usize = self.buffer.split('\n').map(|line| textwrap::wrap(line, width).len().max(1)).sum();
        (rows.max(1) as u16).min(MAX_INPUT_ROWS)
    }

    fn enforce_limit(&mut self) {
        let count = self.char_count();
        if count > self.max_len {
            let cut = self.byte_index(self.max_len);
            self.buffer.truncate(cut);
            self.cursor = self.cursor.min(self.max_len);
            self.overflowed = true;
            tracing::debug!(dropped = count - self.max_len, "input truncated at limit");
        } else {
            self.overflowed = count == self.max_len && self.overflowed;
        }
    }

    fn refresh_overflow(&mut self) {
        if self.char_count() < self.max_len {
            self.overflowed = false;
        }
    }
}

//! Single-line inline input field used by the entry modes.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::UnicodeWidthChar;

/// Maximum characters accepted by the field.
pub const INPUT_CHAR_LIMIT: usize = 256;

fn char_count(text: &str) -> usize {
    text.chars().count()
}

fn byte_index_at_char(text: &str, char_index: usize) -> usize {
    if char_index == 0 {
        return 0;
    }
    text.char_indices()
        .nth(char_index)
        .map(|(idx, _)| idx)
        .unwrap_or_else(|| text.len())
}

fn remove_char_at(text: &mut String, char_index: usize) -> bool {
    let start = byte_index_at_char(text, char_index);
    let Some(ch) = text[start..].chars().next() else {
        return false;
    };
    text.replace_range(start..start + ch.len_utf8(), "");
    true
}

#[derive(Debug, Clone)]
pub struct TextInput {
    value: String,
    /// Cursor position in chars.
    cursor: usize,
    focused: bool,
    char_limit: usize,
}

impl Default for TextInput {
    fn default() -> Self {
        Self::new()
    }
}

impl TextInput {
    #[must_use]
    pub fn new() -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            focused: false,
            char_limit: INPUT_CHAR_LIMIT,
        }
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[cfg(test)]
    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Replace the contents and park the cursor at the end.
    pub fn set_value(&mut self, value: &str) {
        self.value = value.chars().take(self.char_limit).collect();
        self.cursor = char_count(&self.value);
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn insert_char(&mut self, c: char) {
        if c.is_control() || char_count(&self.value) >= self.char_limit {
            return;
        }
        let cursor = self.cursor.min(char_count(&self.value));
        let byte_index = byte_index_at_char(&self.value, cursor);
        self.value.insert(byte_index, c);
        self.cursor = cursor + 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let target = self.cursor - 1;
        if remove_char_at(&mut self.value, target) {
            self.cursor = target;
        }
    }

    pub fn delete_char_forward(&mut self) {
        remove_char_at(&mut self.value, self.cursor);
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < char_count(&self.value) {
            self.cursor += 1;
        }
    }

    pub fn move_cursor_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = char_count(&self.value);
    }

    pub fn delete_to_start(&mut self) {
        let byte_index = byte_index_at_char(&self.value, self.cursor);
        self.value.replace_range(..byte_index, "");
        self.cursor = 0;
    }

    pub fn delete_to_end(&mut self) {
        let byte_index = byte_index_at_char(&self.value, self.cursor);
        self.value.truncate(byte_index);
    }

    /// Delete the word before the cursor, along with any spaces after it.
    pub fn delete_word_backward(&mut self) {
        let chars: Vec<char> = self.value.chars().collect();
        let mut start = self.cursor.min(chars.len());
        while start > 0 && chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !chars[start - 1].is_whitespace() {
            start -= 1;
        }
        let from = byte_index_at_char(&self.value, start);
        let to = byte_index_at_char(&self.value, self.cursor);
        self.value.replace_range(from..to, "");
        self.cursor = start;
    }

    /// Apply an editing key. Returns whether the key was understood.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('a') if ctrl => self.move_cursor_start(),
            KeyCode::Char('e') if ctrl => self.move_cursor_end(),
            KeyCode::Char('b') if ctrl => self.move_cursor_left(),
            KeyCode::Char('f') if ctrl => self.move_cursor_right(),
            KeyCode::Char('h') if ctrl => self.delete_char(),
            KeyCode::Char('d') if ctrl => self.delete_char_forward(),
            KeyCode::Char('u') if ctrl => self.delete_to_start(),
            KeyCode::Char('k') if ctrl => self.delete_to_end(),
            KeyCode::Char('w') if ctrl => self.delete_word_backward(),
            KeyCode::Char(c)
                if !ctrl
                    && !key.modifiers.contains(KeyModifiers::ALT)
                    && !key.modifiers.contains(KeyModifiers::SUPER) =>
            {
                self.insert_char(c);
            }
            KeyCode::Backspace if key.modifiers.contains(KeyModifiers::ALT) => {
                self.delete_word_backward();
            }
            KeyCode::Backspace => self.delete_char(),
            KeyCode::Delete => self.delete_char_forward(),
            KeyCode::Left => self.move_cursor_left(),
            KeyCode::Right => self.move_cursor_right(),
            KeyCode::Home => self.move_cursor_start(),
            KeyCode::End => self.move_cursor_end(),
            _ => return false,
        }
        true
    }

    /// Slice of the value that fits `width` columns with the cursor visible,
    /// plus the cursor column inside that slice.
    #[must_use]
    pub fn visible_window(&self, width: usize) -> (String, usize) {
        if width == 0 {
            return (String::new(), 0);
        }
        let chars: Vec<char> = self.value.chars().collect();
        let cursor = self.cursor.min(chars.len());
        let char_width = |c: &char| c.width().unwrap_or(0);

        // Walk left from the cursor until the window is full, reserving a cell for it.
        let mut start = cursor;
        let mut used = 1;
        while start > 0 {
            let w = char_width(&chars[start - 1]);
            if used + w > width {
                break;
            }
            used += w;
            start -= 1;
        }

        let mut visible = String::new();
        let mut col = 0;
        let mut cursor_col = 0;
        for (idx, ch) in chars.iter().enumerate().skip(start) {
            if idx == cursor {
                cursor_col = col;
            }
            let w = char_width(ch);
            if col + w > width {
                break;
            }
            visible.push(*ch);
            col += w;
        }
        if cursor == chars.len() {
            cursor_col = col;
        }
        (visible, cursor_col.min(width.saturating_sub(1)))
    }
}

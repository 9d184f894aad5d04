//! The single-line text field an autocomplete is bound to.
//!
//! `Field` is a character buffer with a cursor. It knows nothing about
//! suggestions: it applies editing keys and reports whether the text changed,
//! which is the "input" event the autocomplete listens for. Programmatic
//! writes via [`Field::set_value`] never count as input.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Outcome of feeding a key to [`Field::apply_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEdit {
    /// The text changed.
    Changed,
    /// Only the cursor moved.
    Moved,
    /// The key is not an editing key.
    Ignored,
}

/// Single-line editing buffer.
#[derive(Debug, Clone, Default)]
pub struct Field {
    chars: Vec<char>,
    cursor: usize,
}

impl Field {
    /// Create an empty field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text.
    pub fn value(&self) -> String {
        self.chars.iter().collect()
    }

    /// Replace the text and move the cursor to the end.
    pub fn set_value(&mut self, s: &str) {
        self.chars = s.chars().collect();
        self.cursor = self.chars.len();
    }

    /// The character buffer.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Cursor position as a char index.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Insert a character at the cursor.
    pub fn insert_char(&mut self, c: char) {
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
    }

    /// Insert a string at the cursor. Newlines are dropped; the field is
    /// single-line. Returns `true` if anything was inserted.
    pub fn insert_str(&mut self, s: &str) -> bool {
        let before = self.chars.len();
        for c in s.chars().filter(|c| *c != '\n' && *c != '\r') {
            self.insert_char(c);
        }
        self.chars.len() != before
    }

    /// Backspace. Returns `true` if a character was removed.
    pub fn delete_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.chars.remove(self.cursor);
        true
    }

    /// Delete. Returns `true` if a character was removed.
    pub fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.chars.len() {
            return false;
        }
        self.chars.remove(self.cursor);
        true
    }

    /// Delete the word before the cursor (Ctrl+W).
    pub fn delete_word_back(&mut self) -> bool {
        let start = self.cursor;
        while self.cursor > 0 && self.chars[self.cursor - 1] == ' ' {
            self.cursor -= 1;
        }
        while self.cursor > 0 && self.chars[self.cursor - 1] != ' ' {
            self.cursor -= 1;
        }
        self.chars.drain(self.cursor..start);
        self.cursor != start
    }

    /// Apply an editing key. Navigation keys the autocomplete owns (Up, Down,
    /// Enter, Esc) are reported as [`FieldEdit::Ignored`].
    pub fn apply_key(&mut self, key: KeyEvent) -> FieldEdit {
        let changed = |did: bool| if did { FieldEdit::Changed } else { FieldEdit::Moved };
        match (key.code, key.modifiers) {
            (KeyCode::Char('w'), KeyModifiers::CONTROL) => changed(self.delete_word_back()),
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.insert_char(c);
                FieldEdit::Changed
            }
            (KeyCode::Backspace, _) => changed(self.delete_back()),
            (KeyCode::Delete, _) => changed(self.delete_forward()),
            (KeyCode::Left, _) => {
                self.cursor = self.cursor.saturating_sub(1);
                FieldEdit::Moved
            }
            (KeyCode::Right, _) => {
                self.cursor = (self.cursor + 1).min(self.chars.len());
                FieldEdit::Moved
            }
            (KeyCode::Home, _) => {
                self.cursor = 0;
                FieldEdit::Moved
            }
            (KeyCode::End, _) => {
                self.cursor = self.chars.len();
                FieldEdit::Moved
            }
            _ => FieldEdit::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn typing_inserts_at_cursor() {
        let mut field = Field::new();
        assert_eq!(field.apply_key(key(KeyCode::Char('a'))), FieldEdit::Changed);
        assert_eq!(field.apply_key(key(KeyCode::Char('c'))), FieldEdit::Changed);
        field.apply_key(key(KeyCode::Left));
        field.apply_key(key(KeyCode::Char('b')));
        assert_eq!(field.value(), "abc");
        assert_eq!(field.cursor(), 2);
    }

    #[test]
    fn backspace_at_start_only_moves() {
        let mut field = Field::new();
        assert_eq!(field.apply_key(key(KeyCode::Backspace)), FieldEdit::Moved);
        field.set_value("ab");
        assert_eq!(field.apply_key(key(KeyCode::Backspace)), FieldEdit::Changed);
        assert_eq!(field.value(), "a");
    }

    #[test]
    fn navigation_keys_are_ignored() {
        let mut field = Field::new();
        for code in [KeyCode::Up, KeyCode::Down, KeyCode::Enter, KeyCode::Esc] {
            assert_eq!(field.apply_key(key(code)), FieldEdit::Ignored);
        }
    }

    #[test]
    fn ctrl_w_deletes_previous_word() {
        let mut field = Field::new();
        field.set_value("red, green ");
        let ctrl_w = KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..key(KeyCode::Char('w'))
        };
        assert_eq!(field.apply_key(ctrl_w), FieldEdit::Changed);
        assert_eq!(field.value(), "red, ");
    }

    #[test]
    fn multibyte_text_is_char_indexed() {
        let mut field = Field::new();
        field.set_value("café");
        assert_eq!(field.cursor(), 4);
        field.delete_back();
        assert_eq!(field.value(), "caf");
    }

    #[test]
    fn paste_drops_newlines() {
        let mut field = Field::new();
        assert!(field.insert_str("new\nyork"));
        assert_eq!(field.value(), "newyork");
        assert!(!field.insert_str("\n"));
    }
}

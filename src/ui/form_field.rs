//! Single-line text input used by dialogs

use crossterm::event::KeyCode;

/// Editable single-line value with a cursor
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: String,
    cursor_pos: usize,
    max_length: Option<usize>,
}

impl TextInput {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            cursor_pos: value.chars().count(),
            value,
            max_length: None,
        }
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor_pos(&self) -> usize {
        self.cursor_pos
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor_pos = self.value.chars().count();
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    /// Handle a key event, returns true if the key was consumed
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        let len = self.value.chars().count();
        match key {
            KeyCode::Char(c) => {
                if self.max_length.map(|m| len < m).unwrap_or(true) {
                    let idx = self.byte_index(self.cursor_pos);
                    self.value.insert(idx, c);
                    self.cursor_pos += 1;
                }
                true
            }
            KeyCode::Backspace => {
                if self.cursor_pos > 0 {
                    self.cursor_pos -= 1;
                    let idx = self.byte_index(self.cursor_pos);
                    self.value.remove(idx);
                }
                true
            }
            KeyCode::Delete => {
                if self.cursor_pos < len {
                    let idx = self.byte_index(self.cursor_pos);
                    self.value.remove(idx);
                }
                true
            }
            KeyCode::Left => {
                self.cursor_pos = self.cursor_pos.saturating_sub(1);
                true
            }
            KeyCode::Right => {
                if self.cursor_pos < len {
                    self.cursor_pos += 1;
                }
                true
            }
            KeyCode::Home => {
                self.cursor_pos = 0;
                true
            }
            KeyCode::End => {
                self.cursor_pos = len;
                true
            }
            _ => false,
        }
    }
}

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Topics offered by Tab on the start screen.
pub const TOPIC_SUGGESTIONS: &[&str] = &["水果", "動物", "交通工具", "顏色", "天氣", "家人", "學校"];

/// Longest topic, in characters, that the input accepts.
pub const MAX_TOPIC_CHARS: usize = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Submit,
    Cancel,
}

pub struct LineInput {
    text: String,
    /// Cursor position as a char index (0 = before first char).
    cursor: usize,
    suggestions: &'static [&'static str],
    suggestion_index: Option<usize>,
}

impl LineInput {
    pub fn new(text: &str) -> Self {
        Self::with_suggestions(text, TOPIC_SUGGESTIONS)
    }

    pub fn with_suggestions(text: &str, suggestions: &'static [&'static str]) -> Self {
        let text: String = text.chars().take(MAX_TOPIC_CHARS).collect();
        let cursor = text.chars().count();
        Self {
            text,
            cursor,
            suggestions,
            suggestion_index: None,
        }
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    /// Trimmed value, or `None` when only whitespace was entered.
    pub fn topic(&self) -> Option<&str> {
        let trimmed = self.text.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Returns (before_cursor, cursor_char, after_cursor) for styled rendering.
    /// When cursor is at end of text, cursor_char is None.
    pub fn render_parts(&self) -> (&str, Option<char>, &str) {
        let byte_offset = self.char_to_byte(self.cursor);
        match self.text[byte_offset..].chars().next() {
            Some(ch) => {
                let next_byte = byte_offset + ch.len_utf8();
                (&self.text[..byte_offset], Some(ch), &self.text[next_byte..])
            }
            None => (&self.text, None, ""),
        }
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        match key.code {
            KeyCode::Esc => return InputResult::Cancel,
            KeyCode::Enter => return InputResult::Submit,
            KeyCode::Tab => {
                self.cycle_suggestion(true);
                return InputResult::Continue;
            }
            KeyCode::BackTab => {
                self.cycle_suggestion(false);
                return InputResult::Continue;
            }
            _ => self.suggestion_index = None,
        }

        match key.code {
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.cursor < self.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.len(),
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.remove_at(self.cursor - 1);
                    self.cursor -= 1;
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.len() {
                    self.remove_at(self.cursor);
                }
            }
            KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.cursor = 0;
            }
            KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.cursor = self.len();
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.text.clear();
                self.cursor = 0;
            }
            KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.delete_word_back();
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.len() < MAX_TOPIC_CHARS {
                    let byte_offset = self.char_to_byte(self.cursor);
                    self.text.insert(byte_offset, ch);
                    self.cursor += 1;
                }
            }
            _ => {}
        }
        InputResult::Continue
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Convert char index to byte offset.
    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    fn remove_at(&mut self, char_idx: usize) {
        let start = self.char_to_byte(char_idx);
        let end = self.char_to_byte(char_idx + 1);
        self.text.replace_range(start..end, "");
    }

    /// Delete word before cursor (unix-word-rubout: skip whitespace, then non-whitespace).
    fn delete_word_back(&mut self) {
        let chars: Vec<char> = self.text.chars().collect();
        let mut pos = self.cursor;
        while pos > 0 && chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        while pos > 0 && !chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        let start_byte = self.char_to_byte(pos);
        let end_byte = self.char_to_byte(self.cursor);
        self.text.replace_range(start_byte..end_byte, "");
        self.cursor = pos;
    }

    fn cycle_suggestion(&mut self, forward: bool) {
        let count = self.suggestions.len();
        if count == 0 {
            return;
        }
        let next = match self.suggestion_index {
            None => {
                // Start after the current text when it is itself a suggestion.
                let current = self.suggestions.iter().position(|s| *s == self.text);
                match (current, forward) {
                    (Some(idx), true) => (idx + 1) % count,
                    (Some(idx), false) => (idx + count - 1) % count,
                    (None, true) => 0,
                    (None, false) => count - 1,
                }
            }
            Some(idx) if forward => (idx + 1) % count,
            Some(idx) => (idx + count - 1) % count,
        };
        self.suggestion_index = Some(next);
        self.text = self.suggestions[next].to_string();
        self.cursor = self.len();
    }
}

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::content::spelling::fold;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Submit,
    Cancel,
}

/// Single-line text field with word completion from a fixed vocabulary.
#[derive(Clone, Debug, Default)]
pub struct LineInput {
    text: String,
    /// Cursor position as a char index (0 = before first char).
    cursor: usize,
    vocabulary: Vec<String>,
    completions: Vec<String>,
    completion_index: Option<usize>,
    /// Text before the word being completed, captured on the first Tab.
    completion_stem: String,
}

impl LineInput {
    pub fn new(text: &str) -> Self {
        let cursor = text.chars().count();
        Self {
            text: text.to_string(),
            cursor,
            ..Self::default()
        }
    }

    pub fn with_vocabulary(mut self, words: Vec<String>) -> Self {
        self.vocabulary = words;
        self
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.reset_completion();
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

            KeyCode::Left => {
                self.reset_completion();
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                self.reset_completion();
                let len = self.text.chars().count();
                if self.cursor < len {
                    self.cursor += 1;
                }
            }
            KeyCode::Home => {
                self.reset_completion();
                self.cursor = 0;
            }
            KeyCode::End => {
                self.reset_completion();
                self.cursor = self.text.chars().count();
            }
            KeyCode::Backspace => {
                self.reset_completion();
                if self.cursor > 0 {
                    self.remove_char_at(self.cursor - 1);
                    self.cursor -= 1;
                }
            }
            KeyCode::Delete => {
                self.reset_completion();
                if self.cursor < self.text.chars().count() {
                    self.remove_char_at(self.cursor);
                }
            }
            KeyCode::Tab => self.tab_complete(true),
            KeyCode::BackTab => self.tab_complete(false),
            KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.reset_completion();
                self.cursor = 0;
            }
            KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.reset_completion();
                self.cursor = self.text.chars().count();
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.clear();
            }
            KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.reset_completion();
                self.delete_word_back();
            }
            KeyCode::Char(ch)
                if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.reset_completion();
                let byte_offset = self.char_to_byte(self.cursor);
                self.text.insert(byte_offset, ch);
                self.cursor += 1;
            }
            _ => {}
        }
        InputResult::Continue
    }

    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    fn remove_char_at(&mut self, char_idx: usize) {
        let start = self.char_to_byte(char_idx);
        let end = self.char_to_byte(char_idx + 1);
        self.text.replace_range(start..end, "");
    }

    /// Delete word before cursor (skip whitespace, then non-whitespace).
    fn delete_word_back(&mut self) {
        if self.cursor == 0 {
            return;
        }
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

    fn reset_completion(&mut self) {
        self.completions.clear();
        self.completion_index = None;
        self.completion_stem.clear();
    }

    fn tab_complete(&mut self, forward: bool) {
        // Only complete the word the cursor ends.
        if self.cursor < self.text.chars().count() {
            return;
        }

        match self.completion_index {
            None => {
                let split = self.text.rfind(' ').map(|p| p + 1).unwrap_or(0);
                let partial = fold(&self.text[split..]);
                if partial.is_empty() {
                    return;
                }
                let mut matches: Vec<String> = self
                    .vocabulary
                    .iter()
                    .filter(|w| fold(w).starts_with(&partial))
                    .cloned()
                    .collect();
                matches.sort();
                matches.dedup();
                if matches.is_empty() {
                    return;
                }
                self.completion_stem = self.text[..split].to_string();
                self.completions = matches;
                self.completion_index = Some(0);
                self.apply_completion(0);
            }
            Some(idx) => {
                let count = self.completions.len();
                let next = if forward {
                    (idx + 1) % count
                } else {
                    (idx + count - 1) % count
                };
                self.completion_index = Some(next);
                self.apply_completion(next);
            }
        }
    }

    fn apply_completion(&mut self, idx: usize) {
        self.text = format!("{}{}", self.completion_stem, self.completions[idx]);
        self.cursor = self.text.chars().count();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn words() -> Vec<String> {
        ["munay", "munakuyki", "mama", "wasi"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn insert_at_start_middle_end() {
        let mut input = LineInput::new("ac");
        input.handle(key(KeyCode::Char('d')));
        assert_eq!(input.value(), "acd");

        input.handle(key(KeyCode::Home));
        input.handle(key(KeyCode::Char('z')));
        assert_eq!(input.value(), "zacd");

        input.handle(key(KeyCode::Right));
        input.handle(key(KeyCode::Char('b')));
        assert_eq!(input.value(), "zabcd");
    }

    #[test]
    fn multibyte_editing() {
        let mut input = LineInput::new("ñaña");
        input.handle(key(KeyCode::Backspace));
        assert_eq!(input.value(), "ñañ");
        input.handle(key(KeyCode::Home));
        input.handle(key(KeyCode::Delete));
        assert_eq!(input.value(), "añ");
    }

    #[test]
    fn backspace_at_start_is_noop() {
        let mut input = LineInput::new("abc");
        input.handle(key(KeyCode::Home));
        input.handle(key(KeyCode::Backspace));
        assert_eq!(input.value(), "abc");
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn ctrl_w_word_delete() {
        let mut input = LineInput::new("allillan kachun");
        input.handle(ctrl('w'));
        assert_eq!(input.value(), "allillan ");
        input.handle(ctrl('w'));
        assert_eq!(input.value(), "");
    }

    #[test]
    fn ctrl_u_clears() {
        let mut input = LineInput::new("hello world");
        input.handle(ctrl('u'));
        assert_eq!(input.value(), "");
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn alt_chords_are_not_typed() {
        let mut input = LineInput::new("");
        input.handle(KeyEvent::new(KeyCode::Char('m'), KeyModifiers::ALT));
        assert_eq!(input.value(), "");
    }

    #[test]
    fn render_parts_positions() {
        let mut input = LineInput::new("abc");
        assert_eq!(input.render_parts(), ("abc", None, ""));
        input.cursor = 1;
        assert_eq!(input.render_parts(), ("a", Some('b'), "c"));
        input.cursor = 0;
        assert_eq!(input.render_parts(), ("", Some('a'), "bc"));
    }

    #[test]
    fn submit_and_cancel() {
        let mut input = LineInput::new("test");
        assert_eq!(input.handle(key(KeyCode::Enter)), InputResult::Submit);
        assert_eq!(input.handle(key(KeyCode::Esc)), InputResult::Cancel);
    }

    #[test]
    fn tab_completion_cycles_and_backtab_reverses() {
        let mut input = LineInput::new("te muna").with_vocabulary(words());
        input.handle(key(KeyCode::Tab));
        assert_eq!(input.value(), "te munakuyki");
        input.handle(key(KeyCode::Tab));
        assert_eq!(input.value(), "te munay");
        input.handle(key(KeyCode::Tab));
        assert_eq!(input.value(), "te munakuyki");
        input.handle(key(KeyCode::BackTab));
        assert_eq!(input.value(), "te munay");
    }

    #[test]
    fn tab_without_match_or_midline_is_noop() {
        let mut input = LineInput::new("zz").with_vocabulary(words());
        input.handle(key(KeyCode::Tab));
        assert_eq!(input.value(), "zz");

        let mut input = LineInput::new("muna").with_vocabulary(words());
        input.handle(key(KeyCode::Left));
        input.handle(key(KeyCode::Tab));
        assert_eq!(input.value(), "muna");
    }

    #[test]
    fn typing_resets_completion() {
        let mut input = LineInput::new("ma").with_vocabulary(words());
        input.handle(key(KeyCode::Tab));
        assert_eq!(input.value(), "mama");
        input.handle(key(KeyCode::Char('s')));
        assert!(input.completion_index.is_none());
        assert_eq!(input.value(), "mamas");
    }
}

//! Single-line input buffer for a cell in edit mode
//!
//! Positions are character indices, not byte offsets. The selection is the
//! range between `anchor` and `cursor`; it is empty when both are equal.

use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellInput {
    text: String,
    cursor: usize,
    anchor: usize,
    max_length: Option<usize>,
}

impl CellInput {
    /// Create an input with the caret at the end and the whole value selected
    pub fn new(value: &str, max_length: Option<usize>) -> Self {
        let mut input = Self {
            text: value.to_string(),
            cursor: 0,
            anchor: 0,
            max_length,
        };
        input.move_end(false);
        input.select_all();
        input
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    /// Caret position in characters
    pub fn caret(&self) -> usize {
        self.cursor
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Selected character range (start <= end)
    pub fn selection(&self) -> Range<usize> {
        self.anchor.min(self.cursor)..self.anchor.max(self.cursor)
    }

    pub fn has_selection(&self) -> bool {
        self.anchor != self.cursor
    }

    pub fn selected_text(&self) -> String {
        let range = self.selection();
        self.text
            .chars()
            .skip(range.start)
            .take(range.end - range.start)
            .collect()
    }

    /// Replace the whole value without applying the length limit
    ///
    /// Used for programmatic restores; the caret moves to the end.
    pub fn set_text(&mut self, value: &str) {
        self.text = value.to_string();
        self.move_end(false);
    }

    pub fn select_all(&mut self) {
        self.anchor = 0;
        self.cursor = self.char_count();
    }

    /// Insert a character, replacing the selection
    ///
    /// Returns false when the character is rejected (newline or length limit).
    pub fn insert_char(&mut self, ch: char) -> bool {
        if ch == '\n' || ch == '\r' {
            return false;
        }
        let remaining = self.char_count() - self.selection().len();
        if self.would_exceed(remaining, 1) {
            return false;
        }
        self.replace_selection(&ch.to_string());
        true
    }

    /// Insert text (paste), dropping newlines and truncating to the length limit
    pub fn insert_text(&mut self, text: &str) {
        let filtered: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
        let remaining = self.char_count() - self.selection().len();
        let allowed = match self.max_length {
            Some(max) => max.saturating_sub(remaining),
            None => usize::MAX,
        };
        let clipped: String = filtered.chars().take(allowed).collect();
        self.replace_selection(&clipped);
    }

    pub fn delete_backward(&mut self) {
        if self.has_selection() {
            self.replace_selection("");
            return;
        }
        if self.cursor == 0 {
            return;
        }
        self.anchor = self.cursor - 1;
        self.replace_selection("");
    }

    pub fn delete_forward(&mut self) {
        if self.has_selection() {
            self.replace_selection("");
            return;
        }
        if self.cursor >= self.char_count() {
            return;
        }
        self.anchor = self.cursor + 1;
        self.replace_selection("");
    }

    pub fn move_left(&mut self, extend_selection: bool) {
        if !extend_selection && self.has_selection() {
            let start = self.selection().start;
            self.collapse_to(start);
            return;
        }
        let target = self.cursor.saturating_sub(1);
        self.move_to(target, extend_selection);
    }

    pub fn move_right(&mut self, extend_selection: bool) {
        if !extend_selection && self.has_selection() {
            let end = self.selection().end;
            self.collapse_to(end);
            return;
        }
        let target = (self.cursor + 1).min(self.char_count());
        self.move_to(target, extend_selection);
    }

    pub fn move_home(&mut self, extend_selection: bool) {
        self.move_to(0, extend_selection);
    }

    pub fn move_end(&mut self, extend_selection: bool) {
        let end = self.char_count();
        self.move_to(end, extend_selection);
    }

    fn move_to(&mut self, target: usize, extend_selection: bool) {
        self.cursor = target;
        if !extend_selection {
            self.anchor = target;
        }
    }

    fn collapse_to(&mut self, pos: usize) {
        self.cursor = pos;
        self.anchor = pos;
    }

    fn would_exceed(&self, current_len: usize, insert_len: usize) -> bool {
        match self.max_length {
            Some(max) => current_len + insert_len > max,
            None => false,
        }
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn replace_selection(&mut self, replacement: &str) {
        let range = self.selection();
        let start = self.byte_offset(range.start);
        let end = self.byte_offset(range.end);
        self.text.replace_range(start..end, replacement);
        let caret = range.start + replacement.chars().count();
        self.collapse_to(caret);
    }
}

use std::ops::Deref;
use std::sync::Arc;

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::options::FilterOptions;
use crate::theme::ColorTheme;
use crate::tui::widget::FilterWidget;
use crate::util::str_width;

/// Single-line query field.
///
/// `cursor` is a byte offset into `value` and always sits on a char boundary.
pub struct Input {
    pub prompt: String,
    pub placeholder: String,
    pub value: String,
    cursor: usize,
    pub theme: Arc<ColorTheme>,
}

impl Default for Input {
    fn default() -> Self {
        Self {
            prompt: String::from("> "),
            placeholder: String::new(),
            value: String::new(),
            cursor: 0,
            theme: Arc::new(ColorTheme::default()),
        }
    }
}

/// Check if a character is a word character (alphanumeric only)
fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric()
}

fn is_not_whitespace(ch: char) -> bool {
    !ch.is_whitespace()
}

impl Input {
    /// Replaces the value and puts the cursor at its end
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.len();
    }

    /// Inserts a char at the cursor
    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Inserts pasted text at the cursor, flattened to a single line
    pub fn insert_str(&mut self, s: &str) {
        let flat = s.replace("\r\n", " ").replace(['\n', '\r', '\t'], " ");
        self.value.insert_str(self.cursor, &flat);
        self.cursor += flat.len();
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.value[..self.cursor].char_indices().next_back().map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.value[self.cursor..].chars().next().map(|c| self.cursor + c.len_utf8())
    }

    /// Deletes the char before the cursor
    pub fn delete_backward(&mut self) -> Option<char> {
        let pos = self.prev_boundary()?;
        self.cursor = pos;
        Some(self.value.remove(pos))
    }

    /// Deletes the char under the cursor
    pub fn delete_forward(&mut self) -> Option<char> {
        self.next_boundary()?;
        Some(self.value.remove(self.cursor))
    }

    /// Moves one char left
    pub fn move_left(&mut self) {
        if let Some(pos) = self.prev_boundary() {
            self.cursor = pos;
        }
    }

    /// Moves one char right
    pub fn move_right(&mut self) {
        if let Some(pos) = self.next_boundary() {
            self.cursor = pos;
        }
    }

    /// Home
    pub fn move_to_start(&mut self) {
        self.cursor = 0;
    }

    /// End
    pub fn move_to_end(&mut self) {
        self.cursor = self.value.len();
    }

    /// Start of the word before the cursor: skips non-word chars, then word chars
    fn scan_backward(&self, is_word: fn(char) -> bool) -> usize {
        let mut pos = self.cursor;
        let mut chars = self.value[..self.cursor].char_indices().rev().peekable();
        while let Some((i, _)) = chars.next_if(|&(_, ch)| !is_word(ch)) {
            pos = i;
        }
        while let Some((i, _)) = chars.next_if(|&(_, ch)| is_word(ch)) {
            pos = i;
        }
        pos
    }

    /// End of the word after the cursor: skips non-word chars, then word chars
    fn scan_forward(&self, is_word: fn(char) -> bool) -> usize {
        let mut pos = self.cursor;
        let mut chars = self.value[self.cursor..].chars().peekable();
        while let Some(ch) = chars.next_if(|&ch| !is_word(ch)) {
            pos += ch.len_utf8();
        }
        while let Some(ch) = chars.next_if(|&ch| is_word(ch)) {
            pos += ch.len_utf8();
        }
        pos
    }

    fn drain_range(&mut self, start: usize, end: usize) -> String {
        let deleted: String = self.value.drain(start..end).collect();
        self.cursor = start;
        deleted
    }

    /// Jumps past the next whitespace-delimited word
    pub fn move_cursor_forward_word(&mut self) {
        self.cursor = self.scan_forward(is_not_whitespace);
    }

    /// Jumps back to the start of the previous alphanumeric word
    pub fn move_cursor_backward_word(&mut self) {
        self.cursor = self.scan_backward(is_word_char);
    }

    /// Deletes back to the previous alphanumeric word start
    pub fn delete_backward_word(&mut self) -> String {
        let start = self.scan_backward(is_word_char);
        self.drain_range(start, self.cursor)
    }

    /// Deletes back to the previous whitespace
    pub fn delete_backward_to_whitespace(&mut self) -> String {
        let start = self.scan_backward(is_not_whitespace);
        self.drain_range(start, self.cursor)
    }

    /// Deletes forward to the next alphanumeric word end
    pub fn delete_forward_word(&mut self) -> String {
        let end = self.scan_forward(is_word_char);
        self.drain_range(self.cursor, end)
    }

    /// Deletes everything before the cursor, returning it
    pub fn delete_to_beginning(&mut self) -> String {
        self.drain_range(0, self.cursor)
    }

    /// Deletes everything after the cursor, returning it
    pub fn delete_to_end(&mut self) -> String {
        self.drain_range(self.cursor, self.value.len())
    }

    /// Terminal column of the cursor, prompt included
    pub fn cursor_pos(&self) -> u16 {
        (str_width(&self.prompt) + str_width(&self.value[..self.cursor])).min(u16::MAX as usize) as u16
    }
}

impl FilterWidget for Input {
    fn from_options(options: &FilterOptions, theme: Arc<ColorTheme>) -> Self {
        let mut res = Self {
            prompt: options.prompt.clone(),
            placeholder: options.placeholder.clone(),
            theme,
            ..Default::default()
        };
        res.set_value(options.query.clone().unwrap_or_default());
        res
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let prompt_span = Span::styled(self.prompt.as_str(), self.theme.prompt);
        let value_span = if self.value.is_empty() {
            Span::styled(self.placeholder.as_str(), self.theme.placeholder)
        } else {
            Span::styled(self.value.as_str(), self.theme.query)
        };

        Paragraph::new(Line::from(vec![prompt_span, value_span]))
            .style(self.theme.normal)
            .render(area, buf);
    }
}

impl Deref for Input {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

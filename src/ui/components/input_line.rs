//! Single-line text input with a character cursor

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use super::palette::{TEXT_FAINT, TEXT_MUTED, TEXT_PRIMARY};

#[derive(Debug, Clone, Default)]
pub struct InputLineState {
    text: String,
    /// Cursor position in characters
    cursor: usize,
}

impl InputLineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars().filter(|c| *c != '\n' && *c != '\r') {
            self.insert_char(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Take the current text and leave the input empty
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }
}

/// Renders an [`InputLineState`] with a placeholder and optional disabled look
pub struct InputLine<'a> {
    state: &'a InputLineState,
    placeholder: &'a str,
    enabled: bool,
    focused: bool,
}

impl<'a> InputLine<'a> {
    pub fn new(state: &'a InputLineState) -> Self {
        Self {
            state,
            placeholder: "",
            enabled: true,
            focused: true,
        }
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for InputLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let line = if self.state.is_empty() {
            let color = if self.enabled { TEXT_MUTED } else { TEXT_FAINT };
            Line::from(Span::styled(self.placeholder, Style::default().fg(color)))
        } else {
            Line::from(Span::styled(
                self.state.value(),
                Style::default().fg(TEXT_PRIMARY),
            ))
        };
        Paragraph::new(line).render(area, buf);

        if self.enabled && self.focused {
            let before: String = self.state.value().chars().take(self.state.cursor()).collect();
            let offset = u16::try_from(before.width()).unwrap_or(u16::MAX);
            let x = area.x + offset.min(area.width.saturating_sub(1));
            buf[(x, area.y)].set_style(Style::default().add_modifier(Modifier::REVERSED));
        }
    }
}

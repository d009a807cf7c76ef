use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, StatefulWidget, Widget},
};

use super::palette::{
    ACCENT_PRIMARY, BG_ELEVATED, BORDER_DEFAULT, TEXT_FAINT, TEXT_MUTED, TEXT_PRIMARY,
    TEXT_SECONDARY,
};
use crate::data::{format_short_date, Session};
use crate::util::truncate_to_width;
use crate::workspace::directory::{preview, NO_SESSIONS};

/// Rows used by one entry: name, date, preview and a gap
const ENTRY_ROWS: usize = 4;

#[derive(Debug, Clone, Default)]
pub struct SessionListState {
    selected: usize,
    offset: usize,
}

impl SessionListState {
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keep the selection inside a list that may have shrunk
    pub fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }
}

pub struct SessionList<'a> {
    sessions: &'a [Session],
    loading: bool,
}

impl<'a> SessionList<'a> {
    pub fn new(sessions: &'a [Session]) -> Self {
        Self {
            sessions,
            loading: false,
        }
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }
}

impl StatefulWidget for SessionList<'_> {
    type State = SessionListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(BORDER_DEFAULT))
            .title(Span::styled(" Sessions ", Style::default().fg(TEXT_PRIMARY)));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if self.sessions.is_empty() {
            let text = if self.loading {
                "Loading sessions..."
            } else {
                NO_SESSIONS
            };
            Paragraph::new(Span::styled(text, Style::default().fg(TEXT_MUTED))).render(inner, buf);
            return;
        }

        state.clamp(self.sessions.len());
        let fits = (inner.height as usize / ENTRY_ROWS).max(1);
        if state.selected < state.offset {
            state.offset = state.selected;
        } else if state.selected >= state.offset + fits {
            state.offset = state.selected + 1 - fits;
        }

        let width = inner.width.saturating_sub(2) as usize;
        let mut y = inner.y;
        for (index, session) in self.sessions.iter().enumerate().skip(state.offset).take(fits) {
            let selected = index == state.selected;
            let row_style = if selected {
                Style::default().bg(BG_ELEVATED)
            } else {
                Style::default()
            };
            let marker = if selected { "▌ " } else { "  " };

            let rows = [
                Line::from(vec![
                    Span::styled(marker, row_style.fg(ACCENT_PRIMARY)),
                    Span::styled(
                        truncate_to_width(&session.name, width),
                        row_style.fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(vec![
                    Span::styled(marker, row_style.fg(ACCENT_PRIMARY)),
                    Span::styled(
                        format_short_date(&session.created_at),
                        row_style.fg(TEXT_FAINT),
                    ),
                ]),
                Line::from(vec![
                    Span::styled(marker, row_style.fg(ACCENT_PRIMARY)),
                    Span::styled(
                        truncate_to_width(preview(session), width),
                        row_style.fg(TEXT_SECONDARY),
                    ),
                ]),
            ];

            for row in rows {
                if y >= inner.y + inner.height {
                    return;
                }
                buf.set_style(Rect::new(inner.x, y, inner.width, 1), row_style);
                buf.set_line(inner.x, y, &row, inner.width);
                y += 1;
            }
            y += 1;
        }
    }
}
